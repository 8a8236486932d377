//! Chapter listing extraction from a series detail page.
//!
//! The listing is fully materialized in one page load, so callers report
//! exact pagination counts equal to the result length.

use std::sync::Arc;

use scraper::{Html, Selector};
use url::Url;

use super::element_text;
use crate::catalog::{Chapter, ChapterFields, Manga};
use crate::util::{normalize_url, parse_chapter_heading};

/// Volume numbers are not exposed by this source.
const DEFAULT_VOLUME: f64 = 0.0;
const DEFAULT_LANGUAGE: &str = "en";

/// Parse every chapter row out of a series page. Rows flagged with the
/// theme-colored marker are promotional slots, not chapters, and are
/// skipped.
pub fn from_series(html: &str, manga: &Arc<Manga>, base: &Url) -> Vec<Chapter> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse(r#"a[href*="chapter/"]"#).unwrap();
    let marker_selector = Selector::parse(r#"div[class*="bg-themecolor"]"#).unwrap();
    let heading_selector = Selector::parse("h3").unwrap();

    let mut chapters = Vec::new();
    for anchor in document.select(&anchor_selector) {
        if anchor.select(&marker_selector).next().is_some() {
            continue;
        }

        let href = anchor.value().attr("href").unwrap_or("").to_string();
        let uri = normalize_url(base, &format!("series/{}", href));

        let (number, title) = anchor
            .select(&heading_selector)
            .map(element_text)
            .find(|text| text.contains("Chapter"))
            .map(|text| parse_chapter_heading(&text))
            .unwrap_or((0.0, "Unknown Chapter".to_string()));

        chapters.push(Chapter::from_fields(
            ChapterFields {
                id: href,
                title,
                number,
                volume: DEFAULT_VOLUME,
                uri,
                translated_language: DEFAULT_LANGUAGE.to_string(),
            },
            manga.clone(),
        ));
    }

    chapters
}

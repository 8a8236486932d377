//! Page image extraction from a chapter reader page.

use std::sync::Arc;

use scraper::{Html, Selector};

use crate::catalog::{Chapter, Page};
use crate::util::parse_page_number;

/// Parse every page image out of a chapter page. Only images served from
/// the site's media storage path are chapter content; everything else is
/// chrome.
pub fn from_chapter(html: &str, chapter: &Arc<Chapter>) -> Vec<Page> {
    let document = Html::parse_document(html);
    let image_selector = Selector::parse(r#"img[src*="storage/media/"]"#).unwrap();

    document
        .select(&image_selector)
        .enumerate()
        .map(|(index, img)| {
            let image_url = img.value().attr("src").unwrap_or("").to_string();
            let alt_text = img.value().attr("alt").unwrap_or("");
            let page_number = parse_page_number(alt_text, index + 1);
            Page::new(chapter.clone(), page_number, image_url)
        })
        .collect()
}

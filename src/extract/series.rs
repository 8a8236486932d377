//! Catalog item extraction for the search listing and the series detail
//! page.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::element_text;
use crate::catalog::{Manga, MangaFields, ReleaseStatus};
use crate::util::{last_path_segment, normalize_url, parse_decimal_or_zero};

/// Parse every series card out of a search results page. Website URLs stay
/// as scraped (site-relative); the detail fetch normalizes them.
pub fn from_search(html: &str) -> Vec<Manga> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse(r#"a[href^="series/"]"#).unwrap();

    document
        .select(&anchor_selector)
        .filter(|a| {
            // Chapter deep-links share the series/ prefix; list cards don't.
            !a.value().attr("href").unwrap_or("").contains("chapter/")
        })
        .map(from_list_card)
        .collect()
}

/// A single card in the search listing. Every selector miss falls back to a
/// default so a catalog item is always produced.
fn from_list_card(anchor: ElementRef) -> Manga {
    let href = anchor.value().attr("href").unwrap_or("").to_string();

    let img_selector = Selector::parse("img").unwrap();
    let cover_url = anchor
        .select(&img_selector)
        .next()
        .and_then(|img| img.value().attr("src").or_else(|| img.value().attr("data-src")))
        .unwrap_or("")
        .to_string();

    let title_selector = Selector::parse(r#"span[class*="font-bold"]"#).unwrap();
    let title = anchor
        .select(&title_selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    // Latest chapter from a "Chapter N" label; non-numeric or missing -> 0.
    let span_selector = Selector::parse("span").unwrap();
    let latest_chapter = anchor
        .select(&span_selector)
        .map(element_text)
        .find(|text| text.contains("Chapter"))
        .map(|text| parse_decimal_or_zero(text.replace("Chapter", "").trim()))
        .unwrap_or(0.0);

    // Zero or one themed badge is expected in list view.
    let badge_selector = Selector::parse(r#"div[class*="bg-[#a12e24]"] span"#).unwrap();
    let tags: Vec<String> = anchor
        .select(&badge_selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .into_iter()
        .collect();

    let original_language = if tags.iter().any(|t| t == "MANHWA") {
        Some("Korean".to_string())
    } else {
        None
    };

    Manga::from_fields(MangaFields {
        id: last_path_segment(&href),
        title,
        authors: vec!["Unknown".to_string()],
        cover_url,
        website_url: href,
        original_language,
        latest_chapter_available: latest_chapter,
        ..MangaFields::default()
    })
}

/// Parse the series detail page for a known id.
pub fn from_detail(html: &str, id: &str, base: &Url) -> Manga {
    let document = Html::parse_document(html);

    let cover_selector = Selector::parse(r#"img[class*="rounded"]"#).unwrap();
    let cover_url = document
        .select(&cover_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .unwrap_or("")
        .to_string();

    let title_selector =
        Selector::parse(r#"span[class*="text-xl"][class*="font-bold"]"#).unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty());

    // Description is the sibling node following the "Synopsis" heading.
    let synopsis_selector = Selector::parse(r#"h3[class*="text-[#D9D9D9]"]"#).unwrap();
    let description = document
        .select(&synopsis_selector)
        .find(|h| element_text(*h).contains("Synopsis"))
        .and_then(|h| h.next_siblings().filter_map(ElementRef::wrap).next())
        .map(element_text)
        .filter(|d| !d.is_empty());

    let author_selector = Selector::parse(r#"h3[class*="text-[#A2A2A2]"]"#).unwrap();
    let authors: Vec<String> = document
        .select(&author_selector)
        .next()
        .map(element_text)
        .map(|text| {
            text.split('/')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let genre_selector = Selector::parse(r#"button[class*="bg-[#343434]"]"#).unwrap();
    let tags: Vec<String> = document
        .select(&genre_selector)
        .map(element_text)
        .filter(|g| !g.is_empty())
        .collect();

    let status_selector =
        Selector::parse(r#"div[class*="bg-[#343434]"] h3[class*="capitalize"]"#).unwrap();
    let release_status = document
        .select(&status_selector)
        .next()
        .map(|h| ReleaseStatus::parse(&element_text(h)));

    Manga::from_fields(MangaFields {
        id: id.to_string(),
        title,
        description,
        authors,
        tags,
        cover_url,
        website_url: normalize_url(base, &format!("series/{}", id)),
        release_status,
        ..MangaFields::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_HTML: &str = r##"
        <html><body>
            <a href="series/solo-leveling">
                <div>
                    <img src="https://cdn.x.test/covers/solo.webp" alt="cover">
                    <div class="bg-[#a12e24] rounded"><span>MANHWA</span></div>
                    <span class="block font-bold">Solo Leveling</span>
                    <span class="text-sm">Chapter 179</span>
                </div>
            </a>
            <a href="series/blank-card">
                <div>
                    <span class="block font-bold">Blank Card</span>
                </div>
            </a>
            <a href="series/solo-leveling/chapter/1"><h3>Chapter 1</h3></a>
        </body></html>
    "##;

    #[test]
    fn test_search_extraction() {
        let mangas = from_search(LIST_HTML);
        assert_eq!(mangas.len(), 2);

        let solo = &mangas[0];
        assert_eq!(solo.id, "solo-leveling");
        assert_eq!(solo.title, "Solo Leveling");
        assert_eq!(solo.cover_url, "https://cdn.x.test/covers/solo.webp");
        assert_eq!(solo.cover_file_name, "solo.webp");
        assert_eq!(solo.latest_chapter_available, 179.0);
        assert_eq!(solo.tags, vec!["MANHWA".to_string()]);
        assert_eq!(solo.original_language, "Korean");
        assert!(solo.is_family_safe);
    }

    #[test]
    fn test_search_card_with_missing_fields_defaults() {
        let mangas = from_search(LIST_HTML);
        let blank = &mangas[1];
        assert_eq!(blank.id, "blank-card");
        assert_eq!(blank.latest_chapter_available, 0.0);
        assert_eq!(blank.cover_url, "");
        assert_eq!(blank.description, "No Description Available");
        assert_eq!(blank.original_language, "Unknown");
    }

    #[test]
    fn test_search_skips_chapter_links() {
        let mangas = from_search(LIST_HTML);
        assert!(mangas.iter().all(|m| !m.website_url.contains("chapter/")));
    }

    const DETAIL_HTML: &str = r##"
        <html><body>
            <img class="rounded mx-auto" src="https://cdn.x.test/covers/solo-full.webp">
            <span class="text-xl font-bold">Solo Leveling</span>
            <div class="bg-[#343434] px-2"><h3 class="capitalize">Completed</h3></div>
            <h3 class="text-[#D9D9D9] font-medium">Synopsis</h3>
            <span class="font-medium">Ten years ago, the Gate appeared.</span>
            <h3 class="text-[#A2A2A2]">Chugong / Dubu</h3>
            <button class="bg-[#343434] rounded">Action</button>
            <button class="bg-[#343434] rounded">Ecchi</button>
        </body></html>
    "##;

    #[test]
    fn test_detail_extraction() {
        let base = Url::parse("https://x.test").unwrap();
        let manga = from_detail(DETAIL_HTML, "solo-leveling", &base);

        assert_eq!(manga.id, "solo-leveling");
        assert_eq!(manga.title, "Solo Leveling");
        assert_eq!(manga.description, "Ten years ago, the Gate appeared.");
        assert_eq!(manga.authors, vec!["Chugong".to_string(), "Dubu".to_string()]);
        assert_eq!(manga.tags, vec!["Action".to_string(), "Ecchi".to_string()]);
        assert_eq!(manga.release_status, ReleaseStatus::Completed);
        assert!(!manga.is_family_safe);
        assert_eq!(manga.website_url, "https://x.test/series/solo-leveling");
        assert_eq!(manga.cover_file_name, "solo-full.webp");
    }

    #[test]
    fn test_detail_of_empty_page_still_builds_entity() {
        let base = Url::parse("https://x.test").unwrap();
        let manga = from_detail("<html><body></body></html>", "ghost", &base);

        assert_eq!(manga.id, "ghost");
        assert_eq!(manga.title, "Unknown Title");
        assert_eq!(manga.description, "No Description Available");
        assert!(manga.authors.is_empty());
        assert!(manga.tags.is_empty());
        assert_eq!(manga.release_status, ReleaseStatus::Continuing);
        assert!(manga.is_family_safe);
    }
}

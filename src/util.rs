//! Text and URL heuristics shared by the extraction pipeline.
//!
//! Every function here is total: malformed input falls back to a typed
//! default (0, empty string, scan index) instead of an error, because the
//! source site's markup drifts without notice and partial data beats none.

use regex::Regex;
use url::Url;

/// Keywords marking a genre as not family safe (case-insensitive substring).
const UNSAFE_GENRE_KEYWORDS: [&str; 8] = [
    "adult", "harem", "hentai", "ecchi", "violence", "smut", "shota", "sexual",
];

/// True when a single genre string matches the unsafe-content lexicon.
pub fn is_genre_not_family_safe(genre: &str) -> bool {
    let lower = genre.to_lowercase();
    UNSAFE_GENRE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// A title is family safe iff no tag matches the unsafe-genre lexicon.
pub fn is_family_safe<S: AsRef<str>>(tags: &[S]) -> bool {
    !tags.iter().any(|t| is_genre_not_family_safe(t.as_ref()))
}

/// Resolve a scraped URL against the configured origin.
///
/// Blank input stays empty. An already-absolute URL passes through
/// unchanged. A root-based or relative path resolves against the origin.
pub fn normalize_url(base: &Url, raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    if !raw.starts_with('/') {
        if let Ok(absolute) = Url::parse(raw) {
            return absolute.to_string();
        }
    }

    base.join(raw).map(|u| u.to_string()).unwrap_or_default()
}

/// Last path segment of an href, used to derive slugs and file names.
pub fn last_path_segment(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string()
}

/// File name component of a cover URL, empty when the URL is unparsable.
pub fn url_file_name(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => last_path_segment(url.path()),
        Err(_) => String::new(),
    }
}

/// Extract a chapter number and canonical title from heading text like
/// `"Chapter 124"`. No numeral means number 0 and an "Unknown Chapter"
/// title.
pub fn parse_chapter_heading(text: &str) -> (f64, String) {
    let re = Regex::new(r"Chapter\s+(\d+)").unwrap();
    if let Some(caps) = re.captures(text) {
        if let Ok(number) = caps[1].parse::<f64>() {
            return (number, format!("Chapter {}", number));
        }
    }
    (0.0, "Unknown Chapter".to_string())
}

/// Page number from an image's alt text like `"chapter page 6"`. Missing or
/// unparsable alt text falls back to the 1-based scan position.
pub fn parse_page_number(alt_text: &str, scan_index: usize) -> u32 {
    let re = Regex::new(r"(?i)page\s+(\d+)").unwrap();
    if let Some(caps) = re.captures(alt_text) {
        if let Ok(number) = caps[1].parse::<u32>() {
            return number;
        }
    }
    scan_index as u32
}

/// Numeric chapter/volume label parsing, non-numeric text becoming 0.
pub fn parse_decimal_or_zero(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsafe_genre_lexicon() {
        assert!(is_genre_not_family_safe("Ecchi"));
        assert!(is_genre_not_family_safe("ADULT"));
        assert!(is_genre_not_family_safe("Sexual Content"));
        assert!(!is_genre_not_family_safe("Romance"));
        assert!(!is_genre_not_family_safe(""));
    }

    #[test]
    fn test_family_safe_iff_no_lexicon_match() {
        assert!(!is_family_safe(&["Romance", "Ecchi"]));
        assert!(is_family_safe(&["Romance", "Drama"]));
        assert!(is_family_safe(&[] as &[&str]));
    }

    #[test]
    fn test_normalize_absolute_is_idempotent() {
        let base = Url::parse("https://x.test").unwrap();
        let absolute = "https://cdn.example.com/covers/abc.webp";
        assert_eq!(normalize_url(&base, absolute), absolute);
    }

    #[test]
    fn test_normalize_relative_resolves_against_origin() {
        let base = Url::parse("https://x.test").unwrap();
        assert_eq!(normalize_url(&base, "series/abc"), "https://x.test/series/abc");
        assert_eq!(normalize_url(&base, "/series/abc"), "https://x.test/series/abc");
    }

    #[test]
    fn test_normalize_blank_stays_empty() {
        let base = Url::parse("https://x.test").unwrap();
        assert_eq!(normalize_url(&base, ""), "");
        assert_eq!(normalize_url(&base, "   "), "");
    }

    #[test]
    fn test_chapter_heading_with_number() {
        let (number, title) = parse_chapter_heading("Chapter 124");
        assert_eq!(number, 124.0);
        assert_eq!(title, "Chapter 124");
    }

    #[test]
    fn test_chapter_heading_without_numeral() {
        let (number, title) = parse_chapter_heading("Bonus content!");
        assert_eq!(number, 0.0);
        assert_eq!(title, "Unknown Chapter");
    }

    #[test]
    fn test_chapter_heading_embedded() {
        let (number, title) = parse_chapter_heading("  Chapter 7 - The Tower  ");
        assert_eq!(number, 7.0);
        assert_eq!(title, "Chapter 7");
    }

    #[test]
    fn test_page_number_from_alt() {
        assert_eq!(parse_page_number("chapter page 6", 1), 6);
        assert_eq!(parse_page_number("Page 12", 1), 12);
    }

    #[test]
    fn test_page_number_fallback_to_scan_index() {
        assert_eq!(parse_page_number("", 3), 3);
        assert_eq!(parse_page_number("decorative banner", 3), 3);
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("series/solo-leveling"), "solo-leveling");
        assert_eq!(last_path_segment("/series/abc/"), "abc");
        assert_eq!(last_path_segment(""), "");
    }

    #[test]
    fn test_url_file_name() {
        assert_eq!(url_file_name("https://cdn.x.test/covers/abc.webp"), "abc.webp");
        assert_eq!(url_file_name("not a url"), "");
    }

    #[test]
    fn test_parse_decimal_or_zero() {
        assert_eq!(parse_decimal_or_zero("124"), 124.0);
        assert_eq!(parse_decimal_or_zero("12.5"), 12.5);
        assert_eq!(parse_decimal_or_zero("n/a"), 0.0);
    }
}

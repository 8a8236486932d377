//! Domain entities produced by the extraction pipeline.
//!
//! Entities are assembled from field-set structs by validating constructors
//! and are immutable once built. Every field has a deterministic default so
//! an entity can always be produced from a partially extracted field set.

use std::sync::Arc;

use crate::util::is_family_safe;

/// Publication status of a series. Anything the source renders that is not
/// recognized maps to `Continuing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseStatus {
    #[default]
    Continuing,
    Completed,
    OnHiatus,
    Cancelled,
}

impl ReleaseStatus {
    /// Total, case-insensitive mapping from the site's status label.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "completed" => ReleaseStatus::Completed,
            "hiatus" => ReleaseStatus::OnHiatus,
            "cancelled" => ReleaseStatus::Cancelled,
            _ => ReleaseStatus::Continuing,
        }
    }
}

/// Extracted fields for a catalog item, all optional or defaultable.
#[derive(Debug, Default)]
pub struct MangaFields {
    pub id: String,
    pub title: Option<String>,
    pub alternative_titles: Vec<String>,
    pub description: Option<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub cover_url: String,
    pub website_url: String,
    pub original_language: Option<String>,
    pub release_status: Option<ReleaseStatus>,
    pub latest_chapter_available: f64,
    pub last_volume_available: f64,
}

/// A series record returned by search or fetch-by-id.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Manga {
    /// Slug derived from the source URL path, never empty when derivable.
    pub id: String,
    pub title: String,
    /// Ordered index -> text mapping preserving scan order.
    pub alternative_titles: Vec<(String, String)>,
    pub description: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub cover_url: String,
    pub cover_file_name: String,
    pub website_url: String,
    pub original_language: String,
    /// Always the negation of "any tag matches the unsafe-genre lexicon";
    /// derived at construction, never stored independently of the tags.
    pub is_family_safe: bool,
    pub release_status: ReleaseStatus,
    pub latest_chapter_available: f64,
    pub last_volume_available: f64,
}

impl Manga {
    pub fn from_fields(fields: MangaFields) -> Self {
        let cover_file_name = crate::util::url_file_name(&fields.cover_url);
        let is_family_safe = is_family_safe(&fields.tags);
        Self {
            id: fields.id,
            title: fields.title.unwrap_or_else(|| "Unknown Title".to_string()),
            alternative_titles: fields
                .alternative_titles
                .into_iter()
                .enumerate()
                .map(|(i, t)| (i.to_string(), t))
                .collect(),
            description: fields
                .description
                .unwrap_or_else(|| "No Description Available".to_string()),
            authors: fields.authors,
            tags: fields.tags,
            cover_url: fields.cover_url,
            cover_file_name,
            website_url: fields.website_url,
            original_language: fields
                .original_language
                .unwrap_or_else(|| "Unknown".to_string()),
            is_family_safe,
            release_status: fields.release_status.unwrap_or_default(),
            latest_chapter_available: fields.latest_chapter_available.max(0.0),
            last_volume_available: fields.last_volume_available.max(0.0),
        }
    }
}

/// Extracted fields for a chapter.
#[derive(Debug)]
pub struct ChapterFields {
    pub id: String,
    pub title: String,
    pub number: f64,
    pub volume: f64,
    pub uri: String,
    pub translated_language: String,
}

/// A single chapter of a series. Holds a shared back-reference to the
/// owning catalog item without managing its lifetime.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Chapter {
    /// Site-relative path fragment identifying the chapter.
    pub id: String,
    pub title: String,
    pub number: f64,
    pub volume: f64,
    /// Absolute, normalized chapter URL.
    pub uri: String,
    pub translated_language: String,
    pub manga: Arc<Manga>,
}

impl Chapter {
    pub fn from_fields(fields: ChapterFields, manga: Arc<Manga>) -> Self {
        Self {
            id: fields.id,
            title: fields.title,
            number: fields.number.max(0.0),
            volume: fields.volume.max(0.0),
            uri: fields.uri,
            translated_language: fields.translated_language,
            manga,
        }
    }
}

/// A single page image inside a chapter.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Page {
    /// `{chapter_id}-page-{n}`.
    pub id: String,
    pub chapter_id: String,
    /// Positive; falls back to the 1-based scan order when the markup gives
    /// nothing usable.
    pub page_number: u32,
    pub image_url: String,
    pub chapter: Arc<Chapter>,
}

impl Page {
    pub fn new(chapter: Arc<Chapter>, page_number: u32, image_url: String) -> Self {
        let page_number = page_number.max(1);
        Self {
            id: format!("{}-page-{}", chapter.id, page_number),
            chapter_id: chapter.id.clone(),
            page_number,
            image_url,
            chapter,
        }
    }
}

/// Opaque pagination cursor plus optional exact counts when the listing is
/// fully materialized in one page load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationOptions {
    /// For this source always a decimal page-number string. Absent or blank
    /// means "first page".
    pub continuation_token: Option<String>,
    pub total: Option<usize>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl PaginationOptions {
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            continuation_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Exact counts for a listing materialized in a single page.
    pub fn exact(total: usize, page: usize, page_size: usize) -> Self {
        Self {
            continuation_token: None,
            total: Some(total),
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Current page number encoded in the continuation token. Absent, blank
    /// or non-numeric tokens mean the first page.
    pub fn page_number(&self) -> u32 {
        self.continuation_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .and_then(|t| t.parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

/// A page of results with the pagination metadata needed to continue.
#[derive(Debug, Clone)]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    pub pagination: PaginationOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manga_with_tags(tags: &[&str]) -> Manga {
        Manga::from_fields(MangaFields {
            id: "solo-leveling".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..MangaFields::default()
        })
    }

    #[test]
    fn test_release_status_mapping_is_case_insensitive_and_total() {
        assert_eq!(ReleaseStatus::parse("Completed"), ReleaseStatus::Completed);
        assert_eq!(ReleaseStatus::parse("completed"), ReleaseStatus::Completed);
        assert_eq!(ReleaseStatus::parse("COMPLETED "), ReleaseStatus::Completed);
        assert_eq!(ReleaseStatus::parse("Hiatus"), ReleaseStatus::OnHiatus);
        assert_eq!(ReleaseStatus::parse("cancelled"), ReleaseStatus::Cancelled);
        assert_eq!(ReleaseStatus::parse("Season End"), ReleaseStatus::Continuing);
        assert_eq!(ReleaseStatus::parse(""), ReleaseStatus::Continuing);
    }

    #[test]
    fn test_family_safe_derived_from_tags() {
        assert!(!manga_with_tags(&["Romance", "Ecchi"]).is_family_safe);
        assert!(manga_with_tags(&["Romance", "Drama"]).is_family_safe);
        assert!(manga_with_tags(&[]).is_family_safe);
    }

    #[test]
    fn test_manga_defaults() {
        let manga = Manga::from_fields(MangaFields {
            id: "abc".to_string(),
            ..MangaFields::default()
        });
        assert_eq!(manga.title, "Unknown Title");
        assert_eq!(manga.description, "No Description Available");
        assert_eq!(manga.original_language, "Unknown");
        assert_eq!(manga.release_status, ReleaseStatus::Continuing);
        assert_eq!(manga.latest_chapter_available, 0.0);
        assert_eq!(manga.cover_file_name, "");
    }

    #[test]
    fn test_alternative_titles_keep_scan_order() {
        let manga = Manga::from_fields(MangaFields {
            id: "abc".to_string(),
            alternative_titles: vec!["나 혼자".to_string(), "Ore dake".to_string()],
            ..MangaFields::default()
        });
        assert_eq!(manga.alternative_titles[0], ("0".to_string(), "나 혼자".to_string()));
        assert_eq!(manga.alternative_titles[1], ("1".to_string(), "Ore dake".to_string()));
    }

    #[test]
    fn test_page_id_format_and_floor() {
        let manga = Arc::new(manga_with_tags(&[]));
        let chapter = Arc::new(Chapter::from_fields(
            ChapterFields {
                id: "solo-leveling/chapter/1".to_string(),
                title: "Chapter 1".to_string(),
                number: 1.0,
                volume: 0.0,
                uri: "https://x.test/series/solo-leveling/chapter/1".to_string(),
                translated_language: "en".to_string(),
            },
            manga,
        ));

        let page = Page::new(chapter.clone(), 6, "https://cdn.x.test/p6.webp".to_string());
        assert_eq!(page.id, "solo-leveling/chapter/1-page-6");
        assert_eq!(page.chapter_id, chapter.id);

        let floored = Page::new(chapter, 0, String::new());
        assert_eq!(floored.page_number, 1);
    }

    #[test]
    fn test_pagination_token_parsing() {
        assert_eq!(PaginationOptions::default().page_number(), 1);
        assert_eq!(PaginationOptions::from_token("").page_number(), 1);
        assert_eq!(PaginationOptions::from_token("  ").page_number(), 1);
        assert_eq!(PaginationOptions::from_token("7").page_number(), 7);
        assert_eq!(PaginationOptions::from_token("seven").page_number(), 1);
        assert_eq!(PaginationOptions::from_token("0").page_number(), 1);
    }

    #[test]
    fn test_exact_pagination() {
        let p = PaginationOptions::exact(42, 42, 42);
        assert_eq!(p.total, Some(42));
        assert_eq!(p.continuation_token, None);
    }
}

//! DOM-to-domain-model extraction.
//!
//! Each entity kind is extracted by a fixed, ordered sequence of selector
//! attempts with explicit fallback values. The source's markup is version
//! fragile; a selector miss degrades the field to its default instead of
//! failing the call.

pub mod chapter;
pub mod page;
pub mod series;

use scraper::ElementRef;

/// Concatenated, trimmed text content of an element.
pub(crate) fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

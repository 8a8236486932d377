//! Crawler agent for asuracomic.net.
//!
//! Drives a shared headless Chrome instance through stealth-prepared tabs,
//! captures the JavaScript-rendered DOM and extracts catalog items,
//! chapters and page images with selector fallback chains tolerant of
//! markup drift.

pub mod agent;
pub mod browser;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod options;
pub mod util;

pub use agent::{AsuraAgent, CrawlerAgent};
pub use catalog::{
    Chapter, ChapterFields, Manga, MangaFields, Page, PagedResult, PaginationOptions,
    ReleaseStatus,
};
pub use error::AgentError;
pub use options::AgentOptions;

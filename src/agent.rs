//! The crawler agent surface consumed by the host runtime.
//!
//! Every operation opens its own tab against the shared browser, prepares
//! it for stealth navigation, captures the rendered HTML and hands it to
//! the extraction pipeline. Tabs are scoped: they are closed on every exit
//! path. Operations may run concurrently; the browser is the only shared
//! state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::browser::{BrowserConfig, BrowserManager, Navigator};
use crate::browser::stealth::prepare_tab;
use crate::catalog::{Chapter, Manga, PagedResult, Page, PaginationOptions};
use crate::error::AgentError;
use crate::extract;
use crate::options::AgentOptions;

const FAVICON_PATH: &str = "images/logo.webp";

/// Capability contract the host crawler runtime drives polymorphically.
#[async_trait]
pub trait CrawlerAgent: Send + Sync {
    /// Search the catalog by title. The continuation token is always
    /// "current page + 1"; the source never signals a true end of results,
    /// so callers terminate on an empty page.
    async fn search(
        &self,
        title: &str,
        pagination: &PaginationOptions,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<Manga>, AgentError>;

    /// Fetch a single catalog item by its slug.
    async fn get_by_id(&self, id: &str, cancel: &CancellationToken) -> Result<Manga, AgentError>;

    /// List all chapters of a catalog item. The listing materializes in one
    /// page load, so pagination metadata reports exact counts.
    async fn get_chapters(
        &self,
        manga: &Arc<Manga>,
        pagination: &PaginationOptions,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<Chapter>, AgentError>;

    /// List the page images of a chapter in reading order.
    async fn get_chapter_pages(
        &self,
        chapter: &Arc<Chapter>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Page>, AgentError>;

    async fn get_favicon(&self, cancel: &CancellationToken) -> Result<Url, AgentError>;
}

/// Crawler agent for asuracomic.net.
pub struct AsuraAgent {
    base_url: Url,
    browser: BrowserManager,
}

impl AsuraAgent {
    pub fn new(options: AgentOptions) -> Result<Self, AgentError> {
        let base_url = options.base_url()?;
        let browser = BrowserManager::new(BrowserConfig::from(&options.browser));
        Ok(Self { base_url, browser })
    }

    /// Build from the host-supplied option map (`Mirror` overrides the
    /// default origin).
    pub fn from_options_map(options: &HashMap<String, String>) -> Result<Self, AgentError> {
        Self::new(AgentOptions::from_map(options))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Release the shared browser. Idempotent; safe when no browser was
    /// ever launched.
    pub async fn close(&self) {
        self.browser.close().await;
    }

    /// Open, prepare and navigate a scoped tab, returning the rendered
    /// HTML. The tab guard must stay alive until capture is done.
    async fn fetch_page(
        &self,
        url: &Url,
        scroll: bool,
        cancel: &CancellationToken,
    ) -> Result<String, AgentError> {
        if cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        let tab = self.browser.new_tab().await?;
        prepare_tab(tab.tab(), self.browser.config());

        let navigator = Navigator::new(tab.tab().clone(), self.browser.config().timeout());
        navigator.goto(url.as_str(), cancel).await?;
        if scroll {
            navigator.auto_scroll(cancel).await?;
        }
        navigator.content()
    }

    fn search_url(&self, title: &str, page: u32) -> Result<Url, AgentError> {
        let mut url = self
            .base_url
            .join("series")
            .map_err(|e| AgentError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("name", title);
        Ok(url)
    }

    fn series_url(&self, id: &str) -> Result<Url, AgentError> {
        self.base_url
            .join(&format!("series/{}", id))
            .map_err(|e| AgentError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl CrawlerAgent for AsuraAgent {
    async fn search(
        &self,
        title: &str,
        pagination: &PaginationOptions,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<Manga>, AgentError> {
        let page_number = pagination.page_number();
        let url = self.search_url(title, page_number)?;
        let html = self.fetch_page(&url, false, cancel).await?;

        let mangas = extract::series::from_search(&html);
        log::debug!("Search '{}' page {} found {} items", title, page_number, mangas.len());

        Ok(PagedResult {
            data: mangas,
            pagination: PaginationOptions::from_token((page_number + 1).to_string()),
        })
    }

    async fn get_by_id(&self, id: &str, cancel: &CancellationToken) -> Result<Manga, AgentError> {
        let url = self.series_url(id)?;
        let html = self.fetch_page(&url, false, cancel).await?;
        Ok(extract::series::from_detail(&html, id, &self.base_url))
    }

    async fn get_chapters(
        &self,
        manga: &Arc<Manga>,
        _pagination: &PaginationOptions,
        cancel: &CancellationToken,
    ) -> Result<PagedResult<Chapter>, AgentError> {
        let url = self.series_url(&manga.id)?;
        let html = self.fetch_page(&url, false, cancel).await?;

        let chapters = extract::chapter::from_series(&html, manga, &self.base_url);
        let count = chapters.len();
        log::debug!("Series '{}' listed {} chapters", manga.id, count);

        Ok(PagedResult {
            data: chapters,
            pagination: PaginationOptions::exact(count, count, count),
        })
    }

    async fn get_chapter_pages(
        &self,
        chapter: &Arc<Chapter>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Page>, AgentError> {
        let url = Url::parse(&chapter.uri)
            .map_err(|e| AgentError::InvalidUrl(format!("{}: {}", chapter.uri, e)))?;
        // Page images lazy-load; scroll the full document before capture.
        let html = self.fetch_page(&url, true, cancel).await?;
        Ok(extract::page::from_chapter(&html, chapter))
    }

    async fn get_favicon(&self, _cancel: &CancellationToken) -> Result<Url, AgentError> {
        self.base_url
            .join(FAVICON_PATH)
            .map_err(|e| AgentError::InvalidUrl(e.to_string()))
    }
}

//! Navigation and lazy-content triggering for a prepared tab.

use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::Tab;
use tokio_util::sync::CancellationToken;

use crate::error::AgentError;

/// Scrolls by a fixed increment on a fixed interval until the full document
/// height has been covered, forcing lazy-loaded images to materialize.
const AUTO_SCROLL_SCRIPT: &str = r#"
    (async () => {
        await new Promise(resolve => {
            let totalHeight = 0;
            const distance = 500;
            const timer = setInterval(() => {
                window.scrollBy(0, distance);
                totalHeight += distance;

                if (totalHeight >= document.body.scrollHeight) {
                    clearInterval(timer);
                    resolve();
                }
            }, 200);
        });
    })()
"#;

const SCROLL_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Drives a single prepared tab through navigation, scrolling and capture.
pub struct Navigator {
    tab: Arc<Tab>,
    timeout: Duration,
}

impl Navigator {
    pub fn new(tab: Arc<Tab>, timeout: Duration) -> Self {
        Self { tab, timeout }
    }

    /// Navigate and wait until both DOM-ready and full-load fire, then sit
    /// out any interstitial challenge page. Timeout is fatal and not
    /// retried here; retries are the host's responsibility.
    pub async fn goto(&self, url: &str, cancel: &CancellationToken) -> Result<(), AgentError> {
        if cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        log::info!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| AgentError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        self.wait_for_challenge(url, cancel).await?;
        self.log_cookies();
        Ok(())
    }

    /// Interstitial "Just a moment" pages resolve on their own once the
    /// stealth preparation holds; poll the title until they do.
    async fn wait_for_challenge(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<(), AgentError> {
        let start = Instant::now();
        loop {
            match self.tab.get_title() {
                Ok(title) if title.to_lowercase().contains("just a moment") => {
                    if start.elapsed() > self.timeout {
                        return Err(AgentError::Navigation {
                            url: url.to_string(),
                            reason: "challenge page did not clear".to_string(),
                        });
                    }
                    log::debug!("Challenge page detected, waiting");
                }
                _ => return Ok(()),
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(AgentError::Cancelled),
                _ = tokio::time::sleep(Duration::from_millis(500)) => {}
            }
        }
    }

    /// Trigger lazy-loaded content with a scripted auto-scroll followed by
    /// a fixed settle delay.
    pub async fn auto_scroll(&self, cancel: &CancellationToken) -> Result<(), AgentError> {
        if cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        }

        self.tab
            .evaluate(AUTO_SCROLL_SCRIPT, true)
            .map_err(|e| AgentError::JavaScript(format!("Auto-scroll failed: {}", e)))?;

        tokio::select! {
            _ = cancel.cancelled() => Err(AgentError::Cancelled),
            _ = tokio::time::sleep(SCROLL_SETTLE_DELAY) => Ok(()),
        }
    }

    /// Captured page HTML.
    pub fn content(&self) -> Result<String, AgentError> {
        self.tab
            .get_content()
            .map_err(|e| AgentError::HtmlExtraction(e.to_string()))
    }

    fn log_cookies(&self) {
        if let Ok(cookies) = self.tab.get_cookies() {
            for cookie in cookies {
                log::debug!(
                    "{}={}; Domain={}; Path={}",
                    cookie.name,
                    cookie.value,
                    cookie.domain,
                    cookie.path
                );
            }
        }
    }
}

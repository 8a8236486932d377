use std::ffi::OsStr;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use tokio::sync::Mutex;

use super::config::BrowserConfig;
use crate::error::AgentError;

/// Owns at most one browser process, launched lazily on first use.
///
/// Concurrent first callers serialize on the slot lock, so exactly one
/// process is launched and all of them observe the same handle. A launch
/// failure leaves the slot empty and a later call retries creation.
pub struct BrowserManager {
    config: BrowserConfig,
    slot: Mutex<Option<Arc<Browser>>>,
}

impl BrowserManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Get the shared browser, launching it on first call.
    pub async fn browser(&self) -> Result<Arc<Browser>, AgentError> {
        let mut slot = self.slot.lock().await;
        if let Some(browser) = slot.as_ref() {
            return Ok(browser.clone());
        }

        log::info!("Launching shared browser instance");
        let browser = Arc::new(launch(&self.config)?);
        *slot = Some(browser.clone());
        Ok(browser)
    }

    /// Open a fresh tab against the shared browser. The returned guard
    /// closes the tab when dropped, on every exit path.
    pub async fn new_tab(&self) -> Result<ScopedTab, AgentError> {
        let browser = self.browser().await?;
        let tab = browser
            .new_tab()
            .map_err(|e| AgentError::TabCreation(e.to_string()))?;
        tab.set_default_timeout(self.config.timeout());
        Ok(ScopedTab { tab })
    }

    /// Release the browser if one was ever launched. Safe to call any
    /// number of times; close failures are logged, never propagated.
    pub async fn close(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(browser) = slot.take() {
            // Dropping the handle asks the process to shut down; tabs still
            // held elsewhere keep it alive until they are released.
            drop(browser);
            log::debug!("Browser instance released");
        }
    }
}

fn launch(config: &BrowserConfig) -> Result<Browser, AgentError> {
    // Owned flag strings must outlive the &OsStr args slice.
    let flags: Vec<String> = if config.chrome_flags.is_empty() {
        BrowserConfig::stealth_flags()
    } else {
        config.chrome_flags.clone()
    };
    let args: Vec<&OsStr> = flags.iter().map(OsStr::new).collect();

    let launch_options = LaunchOptions::default_builder()
        .headless(config.headless)
        .window_size(Some(config.window_size))
        // The browser is shared across operations; don't let the driver
        // reap it during quiet periods.
        .idle_browser_timeout(Duration::from_secs(3600))
        .args(args)
        .build()
        .map_err(|e| AgentError::Configuration(e.to_string()))?;

    Browser::new(launch_options).map_err(|e| AgentError::BrowserLaunch(e.to_string()))
}

/// Scoped tab handle: deterministic release without relying on process
/// teardown to reap per-operation tabs.
pub struct ScopedTab {
    tab: Arc<Tab>,
}

impl ScopedTab {
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }
}

impl Deref for ScopedTab {
    type Target = Tab;

    fn deref(&self) -> &Tab {
        &self.tab
    }
}

impl Drop for ScopedTab {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            log::debug!("Tab close failed: {}", e);
        }
    }
}

//! Host-supplied agent configuration.
//!
//! The host hands the agent a string key/value map; the only recognized key
//! is `Mirror`, which overrides the default origin so every relative path
//! resolves against the mirror instead. An optional `agent.toml` next to the
//! working directory can override the browser settings.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::AgentError;

pub const DEFAULT_ORIGIN: &str = "https://asuracomic.net";

/// Option key recognized in the host-supplied map.
pub const MIRROR_OPTION: &str = "Mirror";

#[derive(Debug, Deserialize, Clone)]
pub struct AgentOptions {
    /// Origin all relative paths resolve against.
    #[serde(default = "default_mirror")]
    pub mirror: String,

    #[serde(default)]
    pub browser: BrowserSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserSettings {
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Navigation timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Custom user agent; unset picks a realistic one.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_true() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_window_width() -> u32 {
    1920
}
fn default_window_height() -> u32 {
    1080
}
fn default_mirror() -> String {
    DEFAULT_ORIGIN.to_string()
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 30,
            window_width: 1920,
            window_height: 1080,
            user_agent: None,
        }
    }
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            mirror: default_mirror(),
            browser: BrowserSettings::default(),
        }
    }
}

impl AgentOptions {
    /// Build options from the host's key/value map, starting from the
    /// on-disk defaults. Unrecognized keys are ignored.
    pub fn from_map(options: &HashMap<String, String>) -> Self {
        let mut resolved = Self::load();
        let mirror = options.get(MIRROR_OPTION).or_else(|| {
            options
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(MIRROR_OPTION))
                .map(|(_, v)| v)
        });
        if let Some(mirror) = mirror {
            if !mirror.trim().is_empty() {
                resolved.mirror = mirror.trim().to_string();
            }
        }
        resolved
    }

    /// Read `agent.toml` when present, falling back to defaults.
    pub fn load() -> Self {
        let path = Path::new("agent.toml");
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(options) = toml::from_str::<AgentOptions>(&content) {
                    return options;
                }
            }
        }
        Self::default()
    }

    /// The configured origin as a validated URL.
    pub fn base_url(&self) -> Result<Url, AgentError> {
        Url::parse(&self.mirror).map_err(|e| AgentError::InvalidUrl(format!("{}: {}", self.mirror, e)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.browser.timeout_secs)
    }
}

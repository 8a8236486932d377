//! Browser automation: shared session management, per-tab stealth
//! preparation and navigation.

pub mod config;
pub mod manager;
pub mod navigate;
pub mod stealth;

pub use config::BrowserConfig;
pub use manager::{BrowserManager, ScopedTab};
pub use navigate::Navigator;

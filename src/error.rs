/// Errors surfaced by agent operations.
///
/// Only infrastructure failures are errors: browser launch, tab creation,
/// navigation (including timeouts) and cancellation. A selector that finds
/// nothing is never an error; extraction resolves misses with per-field
/// defaults so a best-effort entity is always produced once navigation
/// succeeds.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Browser launch failed: {0}")]
    BrowserLaunch(String),

    #[error("Browser configuration error: {0}")]
    Configuration(String),

    #[error("Tab creation failed: {0}")]
    TabCreation(String),

    #[error("Navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("JavaScript execution error: {0}")]
    JavaScript(String),

    #[error("HTML extraction error: {0}")]
    HtmlExtraction(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Operation cancelled")]
    Cancelled,
}

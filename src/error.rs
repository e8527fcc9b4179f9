use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Session-level and output-level failures. Everything per-item or
/// per-field stays contained inside the extractor and is only logged.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to launch rendering session: {0}")]
    Startup(String),

    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("scroll step failed: {0}")]
    Scroll(String),

    #[error("scraping {0} is disallowed by robots.txt")]
    RobotsDisallowed(String),

    #[error("failed to write output to {path}: {message}")]
    OutputWrite { path: String, message: String },
}

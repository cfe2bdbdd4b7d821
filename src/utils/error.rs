//! Error handling for recu-scraper

use thiserror::Error;

/// Main error type for recu-scraper
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Download was requested for a record that has no `video_url`.
    #[error("No video URL found in video info")]
    MissingVideoUrl,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status} for {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Login failed: {0}")]
    Login(String),
}

impl ScrapeError {
    /// True for failures raised before any I/O was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(self, ScrapeError::MissingVideoUrl | ScrapeError::InvalidUrl(_))
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

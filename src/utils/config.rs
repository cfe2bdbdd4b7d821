//! Application configuration

use crate::utils::error::{Result, ScrapeError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Static browser-like User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Site root, used to resolve the login endpoint
    pub base_url: String,

    /// User-Agent header for page and media requests
    pub user_agent: String,

    /// Download location (relative paths resolve against the working directory)
    pub download_dir: PathBuf,

    /// Chunk size for streaming (bytes)
    pub chunk_size: usize,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Path of the login form endpoint under `base_url`
    pub login_path: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: "https://recu.me".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            download_dir: PathBuf::from("downloads"),
            chunk_size: 8192, // 8KB
            request_timeout_secs: 30,
            login_path: "/login".to_string(),
        }
    }
}

impl AppSettings {
    /// Default settings file: `<config dir>/recu-scraper/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("recu-scraper").join("settings.json"))
    }

    /// Load settings from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)?;
        let settings: AppSettings = serde_json::from_str(&raw)
            .map_err(|e| ScrapeError::Config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings.validated())
    }

    /// Enforce sane minimums
    pub fn validated(mut self) -> Self {
        if self.chunk_size == 0 {
            self.chunk_size = 1;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = 1;
        }
        self
    }

    /// Absolute URL of the login endpoint
    pub fn login_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.login_path.trim_start_matches('/')
        )
    }
}

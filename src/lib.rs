//! recu-scraper library
//!
//! Scrapes metadata from recu.me video pages and streams the referenced
//! video to disk with progress reporting.

pub mod downloader;
pub mod extractor;
pub mod gui;
pub mod session;
pub mod utils;

// Re-export main types for easier use
pub use downloader::{DownloadProgress, DownloadReport, DownloadedFile, Downloader};
pub use extractor::{Extractor, RecuMeExtractor, Report, VideoRecord};
pub use session::{Fetcher, MediaStream, Session};
pub use utils::{AppSettings, ScrapeError};

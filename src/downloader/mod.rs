//! Download engine module

pub mod engine;
pub mod progress;

// Re-export for convenience
pub use engine::{derive_filename, DownloadReport, DownloadedFile, Downloader};
pub use progress::{format_bytes, DownloadProgress};

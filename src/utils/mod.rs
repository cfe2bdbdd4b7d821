//! Utility modules for error handling, configuration and persistence

pub mod config;
pub mod error;
pub mod persistence;

// Re-export for convenience
pub use config::AppSettings;
pub use error::ScrapeError;
pub use persistence::{default_output_path, load_record, save_record};

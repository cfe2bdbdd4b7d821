use crate::extractor::models::VideoRecord;
use crate::session::Fetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use tracing::{info, warn};

/// Core trait for page extractors
///
/// Parsing is split from fetching so the field extraction can run on any
/// markup, while `extract_info` gives callers the fetch-then-parse operation
/// with a single error boundary.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns a unique identifier for this extractor (e.g., "recume")
    fn id(&self) -> &'static str;

    /// Checks if this extractor recognises the given URL
    fn supports(&self, url: &str) -> bool;

    /// Builds a record from raw page markup. Never fails: fields that
    /// cannot be found are left absent.
    fn parse(&self, markup: &str, source_url: &str) -> VideoRecord;

    /// Fetches `url` through `fetcher` and parses the page.
    ///
    /// Only the fetch can fail; per-field problems never surface here.
    async fn extract_info(&self, fetcher: &dyn Fetcher, url: &str) -> Result<VideoRecord> {
        if !self.supports(url) {
            warn!("{} does not recognise {}, parsing anyway", self.id(), url);
        }

        info!("Scraping URL: {}", url);
        let markup = fetcher.fetch(url).await?;
        Ok(self.parse(&markup, url))
    }
}

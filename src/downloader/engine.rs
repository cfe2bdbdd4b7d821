//! Streaming download of a scraped video to local storage

use crate::downloader::progress::DownloadProgress;
use crate::extractor::VideoRecord;
use crate::session::Fetcher;
use crate::utils::config::AppSettings;
use crate::utils::error::{Result, ScrapeError};
use chrono::{Local, NaiveDate};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// A completed download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedFile {
    pub filepath: PathBuf,
    pub filename: String,
    /// Length declared by the server at the start of the transfer (0 if none)
    pub size: u64,
}

/// Download outcome in its persisted shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DownloadReport {
    Failed {
        error: String,
    },
    Success {
        success: bool,
        filepath: PathBuf,
        filename: String,
        size: u64,
    },
}

impl From<Result<DownloadedFile>> for DownloadReport {
    fn from(result: Result<DownloadedFile>) -> Self {
        match result {
            Ok(file) => DownloadReport::Success {
                success: true,
                filepath: file.filepath,
                filename: file.filename,
                size: file.size,
            },
            Err(e) => DownloadReport::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// Streams video files into a fixed download directory
///
/// Two downloads that derive the same filename write to the same path;
/// running them concurrently on one directory races on that file.
#[derive(Clone)]
pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    download_dir: PathBuf,
    chunk_size: usize,
}

impl Downloader {
    /// Create the downloader, making sure the download directory exists
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: &AppSettings) -> Result<Self> {
        let download_dir = settings.download_dir.clone();
        if !download_dir.exists() {
            debug!("Creating download directory {:?}", download_dir);
        }
        std::fs::create_dir_all(&download_dir)?;

        Ok(Self {
            fetcher,
            download_dir,
            chunk_size: settings.chunk_size.max(1),
        })
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Download the record's `video_url`, calling `on_progress` after every
    /// written chunk.
    ///
    /// An existing file with the derived name is overwritten. On failure any
    /// bytes already written stay on disk.
    pub async fn download<F>(&self, record: &VideoRecord, mut on_progress: F) -> Result<DownloadedFile>
    where
        F: FnMut(DownloadProgress) + Send,
    {
        let video_url = record
            .video_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ScrapeError::MissingVideoUrl)?;

        let filename = derive_filename(record, Local::now().date_naive());
        let filepath = self.download_dir.join(&filename);
        info!("Downloading {} -> {:?}", video_url, filepath);

        let stream = self.fetcher.fetch_stream(video_url).await?;
        let total_size = stream.total_size;
        let mut chunks = stream.chunks;

        let mut file = File::create(&filepath).await?;
        let mut downloaded = 0u64;

        while let Some(chunk_result) = chunks.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(e) => {
                    error!("Transfer aborted after {} bytes: {}", downloaded, e);
                    if let Err(flush_err) = file.flush().await {
                        warn!("Could not flush partial file {:?}: {}", filepath, flush_err);
                    }
                    return Err(e);
                }
            };

            for piece in chunk.chunks(self.chunk_size) {
                file.write_all(piece).await?;
                downloaded += piece.len() as u64;
                on_progress(DownloadProgress::new(downloaded, total_size));
            }
        }

        // Ensure file is flushed
        file.flush().await?;

        info!("Download complete: {} ({} bytes written)", filename, downloaded);
        Ok(DownloadedFile {
            filepath,
            filename,
            size: total_size,
        })
    }
}

/// `<performer>_<date digits>.mp4`
///
/// The performer falls back to `unknown`; characters that cannot appear in
/// a filename are replaced with `_`. Every non-digit is stripped from the
/// date, and `today` stands in when the record has no date.
pub fn derive_filename(record: &VideoRecord, today: NaiveDate) -> String {
    let performer = record
        .performer
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(sanitize_filename)
        .unwrap_or_else(|| "unknown".to_string());

    let date = match record.date.as_deref() {
        Some(date) => date.chars().filter(char::is_ascii_digit).collect(),
        None => today.format("%Y%m%d").to_string(),
    };

    format!("{}_{}.mp4", performer, date)
}

/// Sanitize filename for filesystem
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect()
}

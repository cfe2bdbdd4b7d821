//! Progress tracking for downloads

use std::fmt;

/// Snapshot handed to the progress callback after each written chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    pub downloaded_bytes: u64,
    /// Length declared by the server, 0 when unknown
    pub total_bytes: u64,
}

impl DownloadProgress {
    pub fn new(downloaded_bytes: u64, total_bytes: u64) -> Self {
        Self {
            downloaded_bytes,
            total_bytes,
        }
    }

    /// Progress percentage (0.0 to 100.0), or `None` when the total size
    /// is unknown and no meaningful percentage exists.
    pub fn percentage(&self) -> Option<f64> {
        if self.total_bytes == 0 {
            return None;
        }
        let pct = self.downloaded_bytes as f64 / self.total_bytes as f64 * 100.0;
        Some(pct.min(100.0))
    }

    pub fn is_indeterminate(&self) -> bool {
        self.total_bytes == 0
    }
}

impl fmt::Display for DownloadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percentage() {
            Some(pct) => write!(f, "Downloading: {:.1}%", pct),
            None => write!(f, "Downloading: {} received", format_bytes(self.downloaded_bytes)),
        }
    }
}

/// Format byte count as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GB", b / GB)
    } else if b >= MB {
        format!("{:.2} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

//! JSON persistence for scraped records

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

/// `scraped_data_<YYYYMMDD_HHMMSS>.json` in the working directory
pub fn default_output_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("scraped_data_{}.json", now.format("%Y%m%d_%H%M%S")))
}

/// Pretty-print `value` as JSON with 4-space indentation. Non-ASCII text is
/// written as-is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let json = to_pretty_json(value).context("Failed to serialize record")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .context("Failed to create output directory")?;
    }

    let mut file = fs::File::create(path)
        .await
        .context("Failed to create output file")?;
    file.write_all(json.as_bytes())
        .await
        .context("Failed to write output file")?;
    file.flush().await?;
    Ok(())
}

/// Save `value` to `path`. Failures are logged and reported as `false`.
pub async fn save_record<T: Serialize + ?Sized>(value: &T, path: &Path) -> bool {
    match write_json(value, path).await {
        Ok(()) => {
            debug!("Saved record to {:?}", path);
            true
        }
        Err(e) => {
            error!("Failed to save record to {:?}: {:#}", path, e);
            false
        }
    }
}

/// Read a record previously written by [`save_record`]
pub async fn load_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = fs::read_to_string(path)
        .await
        .context("Failed to read record file")?;
    serde_json::from_str(&json).context("Failed to deserialize record")
}

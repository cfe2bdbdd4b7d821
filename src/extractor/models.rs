//! Data structures for scraped video information

use serde::{Deserialize, Serialize};

/// Metadata scraped from a single video page.
///
/// Every content field is optional: a missing page element leaves the field
/// `None`, which is skipped on serialization. Absence means "unknown", not
/// failure. `timestamp` and `url` are always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Display text as shown on the page, e.g. "87%"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// ISO-8601 extraction instant
    pub timestamp: String,
    /// Page URL the record was scraped from
    pub url: String,
}

impl VideoRecord {
    /// Empty record carrying only the always-present metadata
    pub fn new(url: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timestamp: timestamp.into(),
            ..Default::default()
        }
    }

    pub fn has_video_url(&self) -> bool {
        self.video_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Outcome of an operation in its persisted shape: either the payload
/// itself or `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report<T> {
    Failed { error: String },
    Completed(T),
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Report<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Report::Completed(value),
            Err(e) => Report::Failed {
                error: e.to_string(),
            },
        }
    }
}

impl<T> Report<T> {
    pub fn error(&self) -> Option<&str> {
        match self {
            Report::Failed { error } => Some(error),
            Report::Completed(_) => None,
        }
    }
}

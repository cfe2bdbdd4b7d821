//! HTTP session: page fetches, media streams and optional login

use crate::utils::config::AppSettings;
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Streamed response body plus the length the server declared up front
pub struct MediaStream {
    /// `Content-Length` of the response, 0 when not declared
    pub total_size: u64,
    pub chunks: BoxStream<'static, Result<Bytes>>,
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("total_size", &self.total_size)
            .finish_non_exhaustive()
    }
}

/// Network access consumed by the extractor and downloader
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page body as text. Non-2xx statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Open a streamed GET. Non-2xx statuses are errors.
    async fn fetch_stream(&self, url: &str) -> Result<MediaStream>;
}

/// Cookie-carrying HTTP session with a static browser User-Agent
#[derive(Clone)]
pub struct Session {
    client: Client,
    login_url: String,
    login_path: String,
}

impl Session {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            login_url: settings.login_url(),
            login_path: settings.login_path.clone(),
        })
    }

    /// Submit credentials to the login form.
    ///
    /// Returns `Ok(true)` when the server accepted them, i.e. answered 2xx
    /// and redirected away from the login page. Cookies set by the response
    /// are kept for later fetches on this session.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool> {
        info!("Logging in as {} at {}", username, self.login_url);

        let response = self
            .client
            .post(&self.login_url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        let still_on_login = response.url().path() == self.login_path;
        debug!(
            "Login response: status={} final_url={}",
            status,
            response.url()
        );

        if status.is_success() && !still_on_login {
            info!("Login succeeded");
            Ok(true)
        } else {
            warn!("Login rejected (status {})", status);
            Ok(false)
        }
    }

    async fn get_checked(&self, url: &str) -> Result<Response> {
        let parsed = Url::parse(url).map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", url, e)))?;
        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Fetcher for Session {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.get_checked(url).await?;
        Ok(response.text().await?)
    }

    async fn fetch_stream(&self, url: &str) -> Result<MediaStream> {
        debug!("Streaming GET {}", url);
        let response = self.get_checked(url).await?;
        let total_size = response.content_length().unwrap_or(0);
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ScrapeError::from))
            .boxed();

        Ok(MediaStream { total_size, chunks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_builds_from_defaults() {
        let session = Session::new(&AppSettings::default()).unwrap();
        assert_eq!(session.login_url, "https://recu.me/login");
        assert_eq!(session.login_path, "/login");
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_is_rejected_before_sending() {
        let session = Session::new(&AppSettings::default()).unwrap();
        let err = session.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl(_)));
        assert!(err.is_validation());

        let err = session.fetch_stream("").await.unwrap_err();
        assert!(err.is_validation());
    }
}

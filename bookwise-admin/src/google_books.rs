//! Google Books volumes client for cover lookup
//!
//! Only the first search hit is used. Requests are spaced by a fixed pause
//! to stay well under the public quota.

use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

pub const GOOGLE_BOOKS_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const USER_AGENT: &str = concat!("bookwise-admin/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 5;
const PAUSE_MS: u64 = 300;

#[derive(Debug, Error)]
pub enum GBError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(rename = "totalItems", default)]
    total_items: u32,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(rename = "imageLinks")]
    image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageLinks {
    #[serde(rename = "extraLarge")]
    extra_large: Option<String>,
    large: Option<String>,
    medium: Option<String>,
    thumbnail: Option<String>,
}

impl ImageLinks {
    /// Largest size available
    fn largest(self) -> Option<String> {
        self.extra_large
            .or(self.large)
            .or(self.medium)
            .or(self.thumbnail)
    }
}

/// Upgrade Google's plain-http thumbnail links and request the larger zoom
pub fn normalize_cover_url(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest).replace("&zoom=1", "&zoom=2"),
        None => url.to_string(),
    }
}

/// Minimum spacing between requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

pub struct GoogleBooksClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl GoogleBooksClient {
    pub fn new() -> Result<Self, GBError> {
        Self::with_base_url(GOOGLE_BOOKS_BASE_URL, Duration::from_millis(PAUSE_MS))
    }

    /// Client against another volumes endpoint, e.g. a local stub
    pub fn with_base_url(base_url: &str, pause: Duration) -> Result<Self, GBError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GBError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::new(pause)),
        })
    }

    /// Cover URL of the first volume matching title and author
    ///
    /// `Ok(None)` when there are no hits or the first hit has no image.
    pub async fn find_cover(&self, title: &str, author: &str) -> Result<Option<String>, GBError> {
        self.rate_limiter.wait().await;

        let url = format!("{}/volumes", self.base_url);
        let query = format!("{} {}", title, author);
        tracing::debug!(title = %title, author = %author, "Querying Google Books");

        let response = self
            .http_client
            .get(&url)
            .query(&[("q", query.as_str()), ("maxResults", "1")])
            .send()
            .await
            .map_err(|e| GBError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GBError::ApiError(status.as_u16(), error_text));
        }

        let volumes: VolumesResponse = response
            .json()
            .await
            .map_err(|e| GBError::ParseError(e.to_string()))?;

        if volumes.total_items == 0 {
            return Ok(None);
        }

        Ok(volumes
            .items
            .into_iter()
            .next()
            .and_then(|volume| volume.volume_info.image_links)
            .and_then(ImageLinks::largest)
            .map(|url| normalize_cover_url(&url)))
    }
}

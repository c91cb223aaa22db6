//! HTTP client for the post-metadata API.
//!
//! Wraps `reqwest` with typed error handling for the statuses the API is
//! known to return. The credential travels in an explicit
//! [`MetadataApiConfig`] rather than ambient state, so tests and callers
//! decide where it comes from.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::retry::retry_with_backoff;

/// Production base URL for the metadata API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.barkhub.example.com/";

/// Connection settings for [`MetadataClient`].
pub struct MetadataApiConfig {
    pub base_url: String,
    pub api_token: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_secs * 2^attempt`.
    pub backoff_base_secs: u64,
    /// Upper bound on in-flight per-post requests.
    pub max_concurrency: usize,
}

// Credentials must never reach logs, so Debug is written by hand.
impl std::fmt::Debug for MetadataApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataApiConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[redacted]")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}

/// Builds the shared `reqwest` client with timeout and `User-Agent`
/// applied. Also used for the unauthenticated predictions download.
///
/// # Errors
///
/// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
/// cannot be constructed (e.g., invalid TLS config).
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, FetchError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

/// Client for the per-post metadata endpoint.
///
/// Point `base_url` at a mock server in tests; the production default is
/// [`DEFAULT_API_BASE_URL`].
pub struct MetadataClient {
    client: Client,
    base_url: String,
    host: String,
    api_token: String,
    max_retries: u32,
    backoff_base_secs: u64,
    max_concurrency: usize,
}

impl MetadataClient {
    /// Creates a client from the given connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(config: MetadataApiConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config.timeout_secs, &config.user_agent)?;

        // Normalize to exactly one trailing slash so path concatenation
        // lands under the root rather than replacing the last segment.
        let base_url = format!("{}/", config.base_url.trim_end_matches('/'));
        let parsed = Url::parse(&base_url).map_err(|e| FetchError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let host = parsed
            .host_str()
            .map_or_else(|| base_url.clone(), str::to_owned);

        Ok(Self {
            client,
            base_url,
            host,
            api_token: config.api_token,
            max_retries: config.max_retries,
            backoff_base_secs: config.backoff_base_secs,
            max_concurrency: config.max_concurrency,
        })
    }

    /// Upper bound on in-flight per-post requests, as configured.
    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetches the extended metadata payload for one post, with automatic
    /// retry on transient errors.
    ///
    /// The payload is returned as parsed JSON rather than a typed struct:
    /// the fetch stage archives what the API said, and only the wrangle
    /// stage decides which fields matter.
    ///
    /// # Errors
    ///
    /// - [`FetchError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`FetchError::NotFound`]: HTTP 404 (not retried).
    /// - [`FetchError::UnexpectedStatus`]: any other non-2xx status (not retried).
    /// - [`FetchError::Http`]: network failure after all retries exhausted.
    /// - [`FetchError::Deserialize`]: response body is not valid JSON (not retried).
    pub async fn fetch_post(&self, post_id: i64) -> Result<serde_json::Value, FetchError> {
        let url = format!("{}posts/{post_id}", self.base_url);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .query(&[("detail", "extended")])
                    .bearer_auth(&self.api_token)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(FetchError::RateLimited {
                        host: self.host.clone(),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(FetchError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(FetchError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
                    FetchError::Deserialize {
                        context: format!("metadata for post {post_id}"),
                        source: e,
                    }
                })
            }
        })
        .await
    }
}

/// Extracts the hostname from a URL for use in error messages. Falls back
/// to the full URL string if parsing fails.
pub(crate) fn host_of(url: &str) -> String {
    Url::parse(url).map_or_else(
        |_| url.to_owned(),
        |u| u.host_str().map_or_else(|| url.to_owned(), str::to_owned),
    )
}

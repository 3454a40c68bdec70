//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building the session HTTP client with bounded timeouts
//! - Choosing the User-Agent (fixed identity or rotated browser identity)
//! - Bounded retry with linear backoff for transient failures
//! - Error classification

use crate::config::{Config, HttpConfig};
use rand::seq::IndexedRandom;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Browser identities rotated through when politeness is disabled
const BROWSER_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:123.0) Gecko/20100101 Firefox/123.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7; rv:123.0) Gecko/20100101 Firefox/123.0",
    "Mozilla/5.0 (X11; Linux x86_64; rv:123.0) Gecko/20100101 Firefox/123.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 Edg/123.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Version/17.0 Safari/537.36",
    "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_3 like Mac OS X) AppleWebKit/537.36 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/537.36",
];

/// Picks a random browser User-Agent
pub fn random_user_agent() -> &'static str {
    BROWSER_USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(BROWSER_USER_AGENTS[0])
}

/// A successfully fetched response
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
    /// Decoded response body
    pub body: String,
}

impl FetchedPage {
    /// True when the response is HTML or carries no Content-Type at all
    pub fn is_html(&self) -> bool {
        self.content_type.is_empty() || self.content_type.to_ascii_lowercase().contains("html")
    }
}

/// Reasons a single fetch failed
///
/// Every variant is non-fatal below the session boundary: it prunes the
/// affected branch or link only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read body: {0}")]
    Body(String),
}

impl FetchError {
    /// Timeouts, connection failures, and server errors are worth another attempt
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Connect(_) => true,
            FetchError::Status(code) => *code >= 500,
            FetchError::Network(_) | FetchError::Body(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Result of a fetch operation
pub type FetchResult = Result<FetchedPage, FetchError>;

/// Builds the session HTTP client
///
/// The configured identity is the default User-Agent; individual requests may
/// override it.
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.identity.clone())
        .timeout(Duration::from_secs(config.http.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// HTTP GET with bounded retry, shared by every component of a session
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_backoff: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, config: &HttpConfig) -> Self {
        Self {
            client,
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    /// Builds the client from configuration and wraps it
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?, &config.http))
    }

    /// Fetches a URL, retrying transient failures up to `max_retries` times
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Success |
    /// | 4xx | Immediate failure |
    /// | 5xx, timeout, connect error | Retry with `n * backoff` delay |
    /// | Other network / body errors | Immediate failure |
    pub async fn fetch(&self, url: &str, user_agent: &str) -> FetchResult {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url, user_agent).await {
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!("Retrying {} after {} (attempt {})", url, e, attempt);
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                result => return result,
            }
        }
    }

    async fn fetch_once(&self, url: &str, user_agent: &str) -> FetchResult {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }
}

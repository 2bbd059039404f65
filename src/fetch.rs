//! Page fetching
//!
//! The extraction pipeline only ever sees HTML text. This module retrieves
//! that text over HTTP and classifies failures (forbidden, rate-limited,
//! timeout, other HTTP errors) so callers can explain them to users.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::redirect::Policy;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;

/// Desktop browser user agent; many recipe sites block obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept header sent with every page request
pub const HTML_ACCEPT: &str = "text/html,application/xhtml+xml";

/// Options for page fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout in milliseconds (default: 10000)
    pub timeout_ms: u64,
    /// Maximum redirects to follow (default: 5)
    pub max_redirects: usize,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Something that can turn a URL into HTML text
pub trait HtmlFetcher: Send + Sync {
    /// Fetch the page body at `url`
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>>;
}

/// `reqwest`-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpFetcher {
    /// Build a fetcher from configuration
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FetchError::Network(format!("invalid user agent: {}", e)))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            client,
            timeout_ms: config.timeout_ms,
        })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            return FetchError::Timeout(self.timeout_ms);
        }
        if let Some(error) = err.status().and_then(|s| FetchError::from_status(s.as_u16())) {
            return error;
        }
        FetchError::Network(err.to_string())
    }

    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        if let Some(error) = FetchError::from_status(status) {
            warn!("Fetch of {} failed with HTTP {}", url, status);
            return Err(error);
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

impl HtmlFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, FetchError>> {
        Box::pin(self.get(url))
    }
}

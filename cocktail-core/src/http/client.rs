//! HTTP client trait and implementations.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;

use super::host_of;
use super::rate_limiter::RateLimiter;

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch a response body as text.
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// Configuration for [`ReqwestClient`].
#[derive(Clone)]
pub struct ReqwestClientBuilder {
    rate_limit_ms: u64,
    timeout: Duration,
    user_agent: String,
}

impl Default for ReqwestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClientBuilder {
    /// Create a builder with defaults, overridden by the environment.
    ///
    /// Environment variables:
    /// - `COCKTAIL_RATE_LIMIT_MS`: delay between requests to one host (default 200)
    /// - `COCKTAIL_HTTP_TIMEOUT_SECS`: request timeout (default 30)
    pub fn new() -> Self {
        let rate_limit_ms = std::env::var("COCKTAIL_RATE_LIMIT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(200);

        let timeout_secs = std::env::var("COCKTAIL_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Self {
            rate_limit_ms,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: concat!("cocktail-sheets/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the rate limit delay in milliseconds. 0 disables rate limiting.
    pub fn rate_limit_ms(mut self, ms: u64) -> Self {
        self.rate_limit_ms = ms;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn build(self) -> Result<ReqwestClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(ReqwestClient {
            inner,
            rate_limiter: RateLimiter::new(Duration::from_millis(self.rate_limit_ms)),
        })
    }
}

/// Production client: reqwest with per-host rate limiting. No caching.
pub struct ReqwestClient {
    inner: reqwest::Client,
    rate_limiter: RateLimiter,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        ReqwestClientBuilder::new().build()
    }

    pub fn builder() -> ReqwestClientBuilder {
        ReqwestClientBuilder::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        if let Some(host) = host_of(url) {
            self.rate_limiter.wait(&host).await;
        }

        tracing::debug!(url, "network: fetching");
        let response = self.inner.get(parsed).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(url, status = %status, "network: request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        tracing::debug!(url, status = %status, bytes = body.len(), "network: fetched");
        Ok(body)
    }
}

/// Mock response for testing.
#[derive(Clone)]
pub enum MockResponse {
    Text(String),
    Status(u16),
    Error(String),
}

/// Mock HTTP client for testing. Remembers every URL it was asked for.
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn with_text(self, url: &str, body: &str) -> Self {
        self.with_response(url, MockResponse::Text(body.to_string()))
    }

    pub fn with_json(self, url: &str, body: &serde_json::Value) -> Self {
        self.with_response(url, MockResponse::Text(body.to_string()))
    }

    pub fn with_error(self, url: &str, error: &str) -> Self {
        self.with_response(url, MockResponse::Error(error.to_string()))
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        match self.responses.get(url) {
            Some(MockResponse::Text(body)) => Ok(body.clone()),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            Some(MockResponse::Error(e)) => Err(FetchError::InvalidUrl(e.clone())),
            None => Err(FetchError::InvalidUrl(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}

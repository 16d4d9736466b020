//! HTTP client with rate-limit backoff
//!
//! Performs one logical request-with-retry cycle against the upstream origin:
//! - Basic authentication derived from the credential
//! - Transparent retry on 429, waiting for `Retry-After` (or 60s)
//! - Non-2xx failures surfaced with status and raw body text
//! - JSON decoding of successful bodies

use super::endpoint::Endpoint;
use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::sleep::{Sleeper, TokioSleeper};
use crate::auth::Credential;
use crate::error::{Error, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Production origin of the admin and analytics API
pub const DEFAULT_BASE_URL: &str = "https://api.cursor.com";

/// Wait used when a 429 carries no usable `Retry-After`
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Limits on rate-limit retries.
///
/// `None` means unbounded, which is what the upstream contract asks for:
/// keep waiting as long as the service keeps answering 429.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of re-issued requests after a 429
    pub max_retries: Option<u32>,
    /// Maximum cumulative backoff across one call
    pub max_total_wait: Option<Duration>,
    /// Wait applied when the server gives no hint
    pub default_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl RetryPolicy {
    /// Retry forever
    pub fn unbounded() -> Self {
        Self {
            max_retries: None,
            max_total_wait: None,
            default_wait: DEFAULT_RETRY_AFTER,
        }
    }

    /// Cap the number of retries
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Cap the cumulative wait
    #[must_use]
    pub fn with_max_total_wait(mut self, wait: Duration) -> Self {
        self.max_total_wait = Some(wait);
        self
    }

    /// Whether retry number `retry` (1-based), bringing the total wait to
    /// `total_wait`, is still allowed
    pub fn allows(&self, retry: u32, total_wait: Duration) -> bool {
        let within_count = self.max_retries.map_or(true, |max| retry <= max);
        let within_wait = self.max_total_wait.map_or(true, |max| total_wait <= max);
        within_count && within_wait
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Origin every endpoint path is appended to
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Rate-limit retry limits
    pub retry: RetryPolicy,
    /// Client-side throttle
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::unbounded(),
            rate_limit: None,
            user_agent: format!("cursor-usage/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the origin
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the rate-limit retry policy
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Enable client-side throttling
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Authenticated client bound to one origin.
///
/// Holds no per-call state; concurrent calls on one client are independent.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    credential: Credential,
    rate_limiter: Option<RateLimiter>,
    sleeper: Arc<dyn Sleeper>,
}

impl HttpClient {
    /// Create a client against the production origin
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_config(HttpClientConfig::default(), credential)
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpClientConfig, credential: Credential) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            credential,
            rate_limiter,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used for rate-limit waits
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if client-side throttling is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Send the request, retrying on 429, and return the successful response
    pub async fn execute(&self, endpoint: &Endpoint) -> Result<Response> {
        let url = self.build_url(endpoint);
        let policy = self.config.retry;

        let mut retries: u32 = 0;
        let mut waited = Duration::ZERO;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self.client.request(endpoint.method.into(), &url);
            req = self.credential.apply(req);
            if let Some(ref body) = endpoint.body {
                req = req.json(body);
            }

            debug!("{} {}", endpoint.method, endpoint.path);
            let response = req.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let wait = extract_retry_after(&response).unwrap_or(policy.default_wait);
                retries += 1;

                if !policy.allows(retries, waited.saturating_add(wait)) {
                    warn!(
                        "Rate limited on {}, giving up after {} attempts",
                        endpoint.path, retries
                    );
                    return Err(Error::RetryBudgetExceeded {
                        attempts: retries,
                        waited_secs: waited.as_secs(),
                    });
                }

                warn!(
                    "Rate limited (429) on {}, retry {}, waiting {}s",
                    endpoint.path,
                    retries,
                    wait.as_secs()
                );
                self.sleeper.sleep(wait).await;
                waited = waited.saturating_add(wait);
                continue;
            }

            if !status.is_success() {
                let body = response.text().await?;
                debug!("Request failed: {} {} -> {}", endpoint.method, endpoint.path, status);
                return Err(Error::http_status(status.as_u16(), body));
            }

            debug!(
                "Request succeeded: {} {} -> {}",
                endpoint.method, endpoint.path, status
            );
            return Ok(response);
        }
    }

    /// Send the request and decode the body as JSON
    pub async fn send_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let response = self.execute(endpoint).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send the request and discard the body
    pub async fn send(&self, endpoint: &Endpoint) -> Result<()> {
        self.execute(endpoint).await.map(drop)
    }

    /// Origin plus endpoint path and query
    pub fn build_url(&self, endpoint: &Endpoint) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}{}", endpoint.path_and_query())
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("credential", &self.credential)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract the `Retry-After` hint in whole seconds
fn extract_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after)
}

pub(crate) fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

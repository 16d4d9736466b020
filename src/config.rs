//! Runtime settings
//!
//! Settings are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. An optional YAML file (`--config`)
//! 3. Environment variables (`CURSOR_API_KEY`, `CURSOR_API_BASE_URL`)
//!
//! A missing API key is fatal before any request is made.

use crate::api::CursorApi;
use crate::auth::{Credential, API_KEY_VAR};
use crate::error::{Error, Result, ResultExt};
use crate::http::{
    HttpClient, HttpClientConfig, RateLimiterConfig, RetryPolicy, DEFAULT_BASE_URL,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the API origin
pub const BASE_URL_VAR: &str = "CURSOR_API_BASE_URL";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// File Layer
// ============================================================================

/// Settings as written in the YAML file; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// API key (the environment takes precedence)
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Cap on 429 retries per call; absent means retry forever
    pub max_rate_limit_retries: Option<u32>,
    /// Cap on cumulative 429 backoff per call
    pub max_total_backoff_secs: Option<u64>,
    /// Cap on pages per listing sweep
    pub max_pages: Option<u32>,
    /// Client-side request throttle
    pub requests_per_second: Option<u32>,
}

impl SettingsFile {
    /// Parse settings from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml(&content)
    }
}

// ============================================================================
// Resolved Settings
// ============================================================================

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub credential: Credential,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_rate_limit_retries: Option<u32>,
    pub max_total_backoff_secs: Option<u64>,
    pub max_pages: Option<u32>,
    pub requests_per_second: Option<u32>,
}

impl Settings {
    /// Settings with defaults for everything but the key
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_rate_limit_retries: None,
            max_total_backoff_secs: None,
            max_pages: None,
            requests_per_second: None,
        }
    }

    /// Resolve settings from an optional file and an environment lookup
    pub fn from_sources<F>(file: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match file {
            Some(path) => SettingsFile::load(path)?,
            None => SettingsFile::default(),
        };
        Self::resolve(file, env)
    }

    /// Resolve settings from an optional file and the process environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    fn resolve<F>(file: SettingsFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |v: String| (!v.trim().is_empty()).then_some(v);

        let api_key = env(API_KEY_VAR)
            .and_then(non_blank)
            .or_else(|| file.api_key.clone().and_then(non_blank))
            .ok_or_else(|| Error::missing_field(API_KEY_VAR))?;

        let base_url = env(BASE_URL_VAR)
            .and_then(non_blank)
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url)?;

        let timeout_secs = file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        if file.requests_per_second == Some(0) {
            return Err(Error::config(
                "requests_per_second must be greater than zero",
            ));
        }

        Ok(Self {
            credential: Credential::new(api_key)?,
            base_url,
            timeout_secs,
            max_rate_limit_retries: file.max_rate_limit_retries,
            max_total_backoff_secs: file.max_total_backoff_secs,
            max_pages: file.max_pages,
            requests_per_second: file.requests_per_second,
        })
    }

    /// Retry limits for the transport
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::unbounded();
        if let Some(max) = self.max_rate_limit_retries {
            policy = policy.with_max_retries(max);
        }
        if let Some(secs) = self.max_total_backoff_secs {
            policy = policy.with_max_total_wait(Duration::from_secs(secs));
        }
        policy
    }

    /// Transport configuration
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .retry(self.retry_policy());
        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        builder.build()
    }

    /// Authenticated transport
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::with_config(self.http_config(), self.credential.clone())
    }

    /// Resource client over a fresh transport
    pub fn api(&self) -> Result<CursorApi> {
        Ok(CursorApi::new(self.http_client()?).with_max_pages(self.max_pages))
    }
}

//! HTTP transport module
//!
//! Provides the authenticated client for the upstream API.
//!
//! # Features
//!
//! - **Endpoint descriptors**: verb, path, ordered query and JSON body
//! - **Rate-limit backoff**: 429 responses are retried after `Retry-After`
//! - **Retry budget**: optional caps on retries and cumulative wait
//! - **Injectable sleeper**: waits go through a trait so tests use a fake clock
//! - **Throttling**: optional token bucket using governor

mod client;
mod endpoint;
mod rate_limit;
mod sleep;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RetryPolicy, DEFAULT_BASE_URL,
    DEFAULT_RETRY_AFTER,
};
pub use endpoint::Endpoint;
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use sleep::{RecordingSleeper, Sleeper, TokioSleeper};

// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Cursor Usage
//!
//! Typed access to the Cursor team admin and analytics API, with a command
//! line and a JSON-RPC tool server on top.
//!
//! ## Features
//!
//! - **Basic Auth**: the API key is sent as the Basic username with an empty password
//! - **Rate-Limit Backoff**: 429 responses are retried after `Retry-After` (or 60s)
//! - **Pagination**: `all_*` calls follow `hasNextPage` or `totalPages` to the end
//! - **Analytics Queries**: one date/user filter shared by nine breakdowns
//! - **Reports**: plain-text summaries and concurrent composite views
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cursor_usage::{api::CursorApi, auth::Credential, http::HttpClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let credential = Credential::new(std::env::var("CURSOR_API_KEY").unwrap_or_default())?;
//!     let api = CursorApi::new(HttpClient::new(credential)?);
//!
//!     let spend = api.all_spending().await?;
//!     println!("{} members, cycle started {}", spend.members.len(), spend.cycle_start);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │          cli (commands, runner, stdio tool server)           │
//! └──────────────────────────────────────────────────────────────┘
//!                │                              │
//! ┌──────────────┴─────────────┐  ┌─────────────┴────────────────┐
//! │ report (text, composites)  │  │ config (defaults, YAML, env) │
//! └──────────────┬─────────────┘  └─────────────┬────────────────┘
//! ┌──────────────┴──────────────────────────────┴────────────────┐
//! │          api (resources, analytics query, models)            │
//! └──────────────────────────────────────────────────────────────┘
//!                │                              │
//! ┌──────────────┴─────────────┐  ┌─────────────┴────────────────┐
//! │ pagination (paginate-until)│  │ http (auth, 429 retry, rate) │
//! └────────────────────────────┘  └──────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// API key credential
pub mod auth;

/// HTTP client with rate-limit backoff
pub mod http;

/// Paginate-until aggregation
pub mod pagination;

/// Typed resource calls
pub mod api;

/// Layered settings
pub mod config;

/// Human-readable summaries
pub mod report;

/// Command-line interface and tool server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use api::{AnalyticsMetric, AnalyticsQuery, CursorApi};
pub use auth::Credential;
pub use config::Settings;
pub use http::HttpClient;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

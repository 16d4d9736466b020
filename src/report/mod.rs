//! Report module
//!
//! Human-readable renderings of API results, shared by the command line
//! and the tool server.
//!
//! # Overview
//!
//! - `format` - money and date helpers
//! - `summary` - plain-text summaries of single resources
//! - `composite` - views assembled from several concurrent calls

mod composite;
mod format;
mod summary;

pub use composite::{
    team_overview, user_deep_dive, DEEP_DIVE_DAYS, DEEP_DIVE_EVENTS, OVERVIEW_START_DATE,
};
pub use format::{
    days_before, format_cents, format_dollars, format_fractional_cents, parse_date_millis,
};
pub use summary::{
    billing_groups, daily_usage_digest, deep_dive_text, model_totals, model_usage_summary,
    overview_text, spend_limit_message, spend_summary, team_roster, usage_events_digest,
    ModelTotal, DAILY_USAGE_LIMIT, EVENTS_DIGEST_LIMIT, GROUP_MEMBER_LIMIT, OVERVIEW_TOP,
    RECENT_EVENTS_LIMIT, SPEND_SUMMARY_LIMIT,
};

#[cfg(test)]
mod tests;

//! Analytics query building
//!
//! Every analytics endpoint shares one query shape: `startDate`, `endDate`
//! and an optional comma-joined `users` filter. Dates are passed through
//! verbatim, so both `YYYY-MM-DD` and shorthands like `7d` or `today` work.

use crate::http::Endpoint;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Start of the window when the caller gives none
pub const DEFAULT_START_DATE: &str = "30d";

/// End of the window when the caller gives none
pub const DEFAULT_END_DATE: &str = "today";

/// Analytics breakdown served under `/analytics/team/<metric>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyticsMetric {
    /// Daily active users
    Dau,
    /// Messages and users per model
    Models,
    /// Agent diff suggestions and acceptance
    AgentEdits,
    /// Tab completion suggestions and acceptance
    Tabs,
    /// MCP tool usage
    Mcp,
    /// Most edited file extensions
    TopFileExtensions,
    /// Client version distribution
    ClientVersions,
    /// Command usage
    Commands,
    /// Plan mode usage
    Plans,
}

impl AnalyticsMetric {
    /// Every metric, in display order
    pub const ALL: [AnalyticsMetric; 9] = [
        AnalyticsMetric::Dau,
        AnalyticsMetric::Models,
        AnalyticsMetric::AgentEdits,
        AnalyticsMetric::Tabs,
        AnalyticsMetric::Mcp,
        AnalyticsMetric::TopFileExtensions,
        AnalyticsMetric::ClientVersions,
        AnalyticsMetric::Commands,
        AnalyticsMetric::Plans,
    ];

    /// Path segment under `/analytics/team/`
    pub fn path_segment(self) -> &'static str {
        match self {
            AnalyticsMetric::Dau => "dau",
            AnalyticsMetric::Models => "models",
            AnalyticsMetric::AgentEdits => "agent-edits",
            AnalyticsMetric::Tabs => "tabs",
            AnalyticsMetric::Mcp => "mcp",
            AnalyticsMetric::TopFileExtensions => "top-file-extensions",
            AnalyticsMetric::ClientVersions => "client-versions",
            AnalyticsMetric::Commands => "commands",
            AnalyticsMetric::Plans => "plans",
        }
    }

    /// Full endpoint path
    pub fn path(self) -> String {
        format!("/analytics/team/{}", self.path_segment())
    }
}

/// Logical analytics filter
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    /// Absolute date or relative shorthand; defaults to `30d`
    pub start_date: Option<String>,
    /// Absolute date or relative shorthand; defaults to `today`
    pub end_date: Option<String>,
    /// User emails to restrict to; empty means the whole team
    pub users: Vec<String>,
}

impl AnalyticsQuery {
    /// Empty filter (defaults apply)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window start
    #[must_use]
    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    /// Set the window end
    #[must_use]
    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    /// Restrict to these users
    #[must_use]
    pub fn users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users = users.into_iter().map(Into::into).collect();
        self
    }

    /// Split a comma-separated list, trimming entries and dropping blanks
    pub fn parse_users(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from)
            .collect()
    }

    /// Query pairs in wire order; `users` is omitted when empty
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (
                "startDate",
                self.start_date
                    .clone()
                    .unwrap_or_else(|| DEFAULT_START_DATE.to_string()),
            ),
            (
                "endDate",
                self.end_date
                    .clone()
                    .unwrap_or_else(|| DEFAULT_END_DATE.to_string()),
            ),
        ];
        if !self.users.is_empty() {
            pairs.push(("users", self.users.join(",")));
        }
        pairs
    }

    /// Form-encoded query string, e.g. `startDate=30d&endDate=today`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }

    /// GET endpoint for `metric` with this filter
    pub fn endpoint(&self, metric: AnalyticsMetric) -> Endpoint {
        Endpoint::get(metric.path()).query_pairs(self.to_query_pairs())
    }
}

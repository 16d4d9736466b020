//! CLI commands and argument parsing

use crate::api::AnalyticsMetric;
use crate::types::LogLevel;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Query Cursor team usage, spending and analytics
#[derive(Parser, Debug)]
#[command(name = "cursor-usage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Log level (logs go to stderr)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List team members
    Members,

    /// Billing-cycle spend per member
    Spending {
        /// Page number
        #[arg(long, conflicts_with = "all")]
        page: Option<u32>,

        /// Fetch every page
        #[arg(long)]
        all: bool,
    },

    /// Per-user daily usage
    DailyUsage {
        #[command(flatten)]
        window: MillisWindow,

        #[command(flatten)]
        paging: Paging,
    },

    /// Billing groups with members and spend
    Groups,

    /// Granular usage events
    Events {
        /// Only events of this user
        #[arg(long)]
        email: Option<String>,

        #[command(flatten)]
        window: MillisWindow,

        #[command(flatten)]
        paging: Paging,
    },

    /// Set a member's hard spend limit
    SetLimit {
        /// Member email
        #[arg(long)]
        email: String,

        /// Limit in dollars (0 removes the limit)
        #[arg(long)]
        dollars: f64,
    },

    /// Analytics breakdown
    Analytics {
        /// Metric to fetch
        metric: AnalyticsMetric,

        /// Window start: YYYY-MM-DD, 7d, 30d, today, yesterday (default 30d)
        #[arg(long)]
        start: Option<String>,

        /// Window end: YYYY-MM-DD, today, yesterday (default today)
        #[arg(long)]
        end: Option<String>,

        /// Comma-separated user emails
        #[arg(long)]
        users: Option<String>,
    },

    /// Members, spend, DAU and top models
    Overview {
        /// Analytics window start (default 7d)
        #[arg(long)]
        start: Option<String>,

        /// Analytics window end (default today)
        #[arg(long)]
        end: Option<String>,
    },

    /// One member's spend, activity and recent requests
    User {
        /// Member email
        email: String,

        /// Daily usage start, YYYY-MM-DD (default seven days ago)
        #[arg(long)]
        start: Option<String>,
    },

    /// Serve the tools over stdio (JSON-RPC)
    Serve,
}

/// Date window for the admin listings
#[derive(Args, Debug, Clone, Default)]
pub struct MillisWindow {
    /// Window start, YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,

    /// Window end, YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,
}

/// Paging for the admin listings
#[derive(Args, Debug, Clone, Default)]
pub struct Paging {
    /// Page number
    #[arg(long, conflicts_with = "all")]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Fetch every page
    #[arg(long)]
    pub all: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON
    Json,
    /// Human-readable summaries
    Pretty,
}

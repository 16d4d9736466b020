//! CLI runner - executes commands

use crate::api::{
    AnalyticsMetric, AnalyticsQuery, CursorApi, DailyUsageQuery, SpendQuery, UsageEventsQuery,
};
use crate::cli::commands::{Cli, Commands, MillisWindow, OutputFormat};
use crate::cli::server::serve_stdio;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::report;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Result of one command, before formatting
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Structured data
    Json(Value),
    /// Human-readable text
    Text(String),
}

impl Output {
    fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Render for stdout
    pub fn render(&self) -> Result<String> {
        match self {
            Output::Json(value) => Ok(serde_json::to_string_pretty(value)?),
            Output::Text(text) => Ok(text.clone()),
        }
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let settings = Settings::load(self.cli.config.as_deref())?;
        debug!("Using API origin {}", settings.base_url);
        let api = settings.api()?;

        if matches!(self.cli.command, Commands::Serve) {
            return serve_stdio(api).await;
        }

        let output = self.execute(&api).await?;
        println!("{}", output.render()?);
        Ok(())
    }

    fn pretty(&self) -> bool {
        self.cli.format == OutputFormat::Pretty
    }

    /// Execute a one-shot command against `api`
    pub async fn execute(&self, api: &CursorApi) -> Result<Output> {
        match &self.cli.command {
            Commands::Members => {
                let members = api.team_members().await?;
                if self.pretty() {
                    Ok(Output::Text(report::team_roster(&members)))
                } else {
                    Output::json(&members)
                }
            }
            Commands::Spending { page, all } => {
                if *all {
                    let spend = api.all_spending().await?;
                    if self.pretty() {
                        Ok(Output::Text(report::spend_summary(&spend)))
                    } else {
                        Output::json(&spend)
                    }
                } else {
                    let page = api
                        .spending(SpendQuery {
                            page: *page,
                            page_size: None,
                        })
                        .await?;
                    Output::json(&page)
                }
            }
            Commands::DailyUsage { window, paging } => {
                let (start_date, end_date) = window_millis(window)?;
                let query = DailyUsageQuery {
                    start_date,
                    end_date,
                    page: paging.page,
                    page_size: paging.page_size,
                };
                if paging.all {
                    let entries = api.all_daily_usage(query).await?;
                    if self.pretty() {
                        Output::json(&report::daily_usage_digest(&entries))
                    } else {
                        Output::json(&entries)
                    }
                } else {
                    Output::json(&api.daily_usage(query).await?)
                }
            }
            Commands::Groups => {
                let groups = api.billing_groups().await?;
                if self.pretty() {
                    Ok(Output::Text(report::billing_groups(&groups)))
                } else {
                    Output::json(&groups)
                }
            }
            Commands::Events {
                email,
                window,
                paging,
            } => {
                let (start_date, end_date) = window_millis(window)?;
                let query = UsageEventsQuery {
                    email: email.clone(),
                    start_date,
                    end_date,
                    page: paging.page,
                    page_size: paging.page_size,
                };
                if paging.all {
                    Output::json(&api.all_usage_events(&query).await?)
                } else {
                    let page = api.usage_events(&query).await?;
                    if self.pretty() {
                        Output::json(&report::usage_events_digest(&page))
                    } else {
                        Output::json(&page)
                    }
                }
            }
            Commands::SetLimit { email, dollars } => {
                api.set_user_spend_limit(email, *dollars).await?;
                Ok(Output::Text(report::spend_limit_message(email, *dollars)))
            }
            Commands::Analytics {
                metric,
                start,
                end,
                users,
            } => {
                let mut query = AnalyticsQuery::new();
                query.start_date.clone_from(start);
                query.end_date.clone_from(end);
                if let Some(list) = users {
                    query.users = AnalyticsQuery::parse_users(list);
                }

                if self.pretty() && *metric == AnalyticsMetric::Models {
                    let result = api.model_usage(&query).await?;
                    return Ok(Output::Text(report::model_usage_summary(&result.data)?));
                }
                let result = api.analytics::<Value>(*metric, &query).await?;
                if self.pretty() {
                    Output::json(&result.data)
                } else {
                    Output::json(&result)
                }
            }
            Commands::Overview { start, end } => Ok(Output::Text(
                report::team_overview(api, start.clone(), end.clone()).await?,
            )),
            Commands::User { email, start } => Ok(Output::Text(
                report::user_deep_dive(api, email, start.as_deref(), Utc::now()).await?,
            )),
            Commands::Serve => Err(Error::config("serve is not a one-shot command")),
        }
    }
}

/// Parse `--start`/`--end` dates into millisecond timestamps
fn window_millis(window: &MillisWindow) -> Result<(Option<i64>, Option<i64>)> {
    let start = window
        .start
        .as_deref()
        .map(report::parse_date_millis)
        .transpose()?;
    let end = window
        .end
        .as_deref()
        .map(report::parse_date_millis)
        .transpose()?;
    Ok((start, end))
}

//! Multi-resource views
//!
//! Each view issues its independent resource calls concurrently and fails
//! as a whole if any of them fails.

use super::format::{days_before, parse_date_millis};
use super::summary;
use crate::api::{
    AnalyticsQuery, CursorApi, DailyUsageQuery, UsageEventsQuery, DEFAULT_END_DATE,
};
use crate::error::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Analytics window start for the team overview
pub const OVERVIEW_START_DATE: &str = "7d";

/// Days of daily usage in a deep dive when no start is given
pub const DEEP_DIVE_DAYS: i64 = 7;

/// Usage events fetched for a deep dive
pub const DEEP_DIVE_EVENTS: u32 = 20;

/// Roster, full spend, DAU and model usage over `start..end`
pub async fn team_overview(
    api: &CursorApi,
    start: Option<String>,
    end: Option<String>,
) -> Result<String> {
    let query = AnalyticsQuery::new()
        .start_date(start.unwrap_or_else(|| OVERVIEW_START_DATE.to_string()))
        .end_date(end.unwrap_or_else(|| DEFAULT_END_DATE.to_string()));

    let (members, spend, dau, models) = tokio::try_join!(
        api.team_members(),
        api.all_spending(),
        api.dau(&query),
        api.model_usage(&query),
    )?;
    debug!(
        "Overview: {} members, {} spend rows, {} DAU days",
        members.len(),
        spend.members.len(),
        dau.data.len()
    );

    Ok(summary::overview_text(
        &members,
        &spend,
        &dau.data,
        &models.data,
    ))
}

/// One member's spend, daily activity since `start` and latest events.
///
/// `start` is `YYYY-MM-DD`; without it the window is the last seven days
/// before `now`.
pub async fn user_deep_dive(
    api: &CursorApi,
    email: &str,
    start: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String> {
    let start_millis = match start {
        Some(date) => parse_date_millis(date)?,
        None => days_before(now, DEEP_DIVE_DAYS),
    };
    let daily_query = DailyUsageQuery {
        start_date: Some(start_millis),
        end_date: Some(now.timestamp_millis()),
        ..Default::default()
    };
    let events_query = UsageEventsQuery {
        email: Some(email.to_string()),
        page: Some(1),
        page_size: Some(DEEP_DIVE_EVENTS),
        ..Default::default()
    };

    let (spend, daily, events) = tokio::try_join!(
        api.all_spending(),
        api.all_daily_usage(daily_query),
        api.usage_events(&events_query),
    )?;

    Ok(summary::deep_dive_text(
        email,
        &spend,
        &daily,
        &events.usage_events,
    ))
}

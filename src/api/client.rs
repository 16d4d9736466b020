//! Resource calls against the admin and analytics API
//!
//! One method per logical resource. Paged resources come in two flavors: a
//! single page with its metadata, and an `all_*` variant that drives the
//! paginator until the server's continuation signal ends the sweep.

use super::analytics::{AnalyticsMetric, AnalyticsQuery};
use super::models::{
    AgentEditsEntry, AnalyticsResponse, ClientVersionsEntry, CommandsEntry, DailyUsageEntry,
    DailyUsagePage, DauEntry, FileExtensionsEntry, GroupsResponse, McpEntry, ModelUsageEntry,
    PlansEntry, SpendPage, SpendResponse, TabsEntry, TeamMember, TeamMembersResponse,
    TeamSpend, UsageEvent, UsageEventsPage,
};
use crate::error::{Error, Result};
use crate::http::{Endpoint, HttpClient};
use crate::pagination::Paginator;
use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

/// Page size for daily usage and spend listings
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Page size for usage events (also the server maximum)
pub const USAGE_EVENTS_PAGE_SIZE: u32 = 500;

/// Date filter and paging for daily usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyUsageQuery {
    /// Window start, millisecond timestamp
    pub start_date: Option<i64>,
    /// Window end, millisecond timestamp
    pub end_date: Option<i64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Paging for spend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpendQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Filters and paging for usage events
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageEventsQuery {
    pub email: Option<String>,
    /// Window start, millisecond timestamp
    pub start_date: Option<i64>,
    /// Window end, millisecond timestamp
    pub end_date: Option<i64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Typed access to every upstream resource
#[derive(Debug, Clone)]
pub struct CursorApi {
    http: HttpClient,
    max_pages: Option<u32>,
}

impl CursorApi {
    /// Wrap an authenticated transport
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            max_pages: None,
        }
    }

    /// Cap every `all_*` sweep at `max` pages
    #[must_use]
    pub fn with_max_pages(mut self, max: Option<u32>) -> Self {
        self.max_pages = max;
        self
    }

    /// Underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn paginator(&self, page_size: u32) -> Paginator {
        Paginator::new(page_size).with_max_pages(self.max_pages)
    }

    // ========================================================================
    // Admin API
    // ========================================================================

    /// Full team roster, including removed members
    pub async fn team_members(&self) -> Result<Vec<TeamMember>> {
        let data: TeamMembersResponse = self
            .http
            .send_json(&Endpoint::get("/teams/members"))
            .await?;
        Ok(data.team_members)
    }

    /// One page of per-user daily usage
    pub async fn daily_usage(&self, query: DailyUsageQuery) -> Result<DailyUsagePage> {
        let mut body = Map::new();
        body.insert("page".into(), json!(query.page.unwrap_or(1)));
        body.insert(
            "pageSize".into(),
            json!(query.page_size.unwrap_or(DEFAULT_PAGE_SIZE)),
        );
        if let Some(start) = query.start_date {
            body.insert("startDate".into(), json!(start));
        }
        if let Some(end) = query.end_date {
            body.insert("endDate".into(), json!(end));
        }

        let endpoint = Endpoint::post("/teams/daily-usage-data").json(Value::Object(body));
        self.http.send_json(&endpoint).await
    }

    /// Every daily usage entry in the window
    pub async fn all_daily_usage(&self, query: DailyUsageQuery) -> Result<Vec<DailyUsageEntry>> {
        let collection = self
            .paginator(DEFAULT_PAGE_SIZE)
            .collect_all(|req| {
                self.daily_usage(DailyUsageQuery {
                    page: Some(req.page),
                    page_size: Some(req.page_size),
                    ..query
                })
            })
            .await?;

        info!(
            "Fetched {} daily usage entries in {} pages",
            collection.records.len(),
            collection.pages_fetched
        );
        Ok(collection.records)
    }

    /// One page of billing-cycle spend
    pub async fn spending(&self, query: SpendQuery) -> Result<SpendPage> {
        let raw = self.spend_page(query).await?;
        Ok(SpendPage {
            cycle_start: cycle_start_date(raw.subscription_cycle_start)?,
            total_pages: raw.total_pages,
            total_members: raw.total_members,
            members: raw.team_member_spend,
        })
    }

    /// Spend of every member; the cycle start comes from the last page
    pub async fn all_spending(&self) -> Result<TeamSpend> {
        let collection = self
            .paginator(DEFAULT_PAGE_SIZE)
            .collect_all(|req| {
                self.spend_page(SpendQuery {
                    page: Some(req.page),
                    page_size: Some(req.page_size),
                })
            })
            .await?;

        Ok(TeamSpend {
            cycle_start: cycle_start_date(collection.last_page.subscription_cycle_start)?,
            members: collection.records,
        })
    }

    async fn spend_page(&self, query: SpendQuery) -> Result<SpendResponse> {
        let endpoint = Endpoint::post("/teams/spend").json(json!({
            "page": query.page.unwrap_or(1),
            "pageSize": query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }));
        self.http.send_json(&endpoint).await
    }

    /// Billing groups with members and daily spend
    pub async fn billing_groups(&self) -> Result<GroupsResponse> {
        self.http.send_json(&Endpoint::get("/teams/groups")).await
    }

    /// One page of granular usage events
    pub async fn usage_events(&self, query: &UsageEventsQuery) -> Result<UsageEventsPage> {
        let mut body = Map::new();
        if let Some(ref email) = query.email {
            body.insert("email".into(), json!(email));
        }
        if let Some(start) = query.start_date {
            body.insert("startDate".into(), json!(start));
        }
        if let Some(end) = query.end_date {
            body.insert("endDate".into(), json!(end));
        }
        body.insert("page".into(), json!(query.page.unwrap_or(1)));
        body.insert(
            "pageSize".into(),
            json!(query.page_size.unwrap_or(USAGE_EVENTS_PAGE_SIZE)),
        );

        let endpoint = Endpoint::post("/teams/filtered-usage-events").json(Value::Object(body));
        self.http.send_json(&endpoint).await
    }

    /// Every usage event matching the filters
    pub async fn all_usage_events(&self, query: &UsageEventsQuery) -> Result<Vec<UsageEvent>> {
        let collection = self
            .paginator(USAGE_EVENTS_PAGE_SIZE)
            .collect_all(|req| {
                let page_query = UsageEventsQuery {
                    page: Some(req.page),
                    page_size: Some(req.page_size),
                    ..query.clone()
                };
                async move { self.usage_events(&page_query).await }
            })
            .await?;
        Ok(collection.records)
    }

    /// Set a member's hard spend limit in dollars (0 removes it)
    pub async fn set_user_spend_limit(&self, email: &str, limit_dollars: f64) -> Result<()> {
        let endpoint = Endpoint::post("/teams/user-spend-limit").json(json!({
            "email": email,
            "hardLimitDollars": limit_dollars,
        }));
        self.http.send(&endpoint).await?;
        info!("Updated spend limit for {}", email);
        Ok(())
    }

    // ========================================================================
    // Analytics API
    // ========================================================================

    /// Any analytics breakdown, decoded into `T`
    pub async fn analytics<T: DeserializeOwned>(
        &self,
        metric: AnalyticsMetric,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse<T>> {
        self.http.send_json(&query.endpoint(metric)).await
    }

    pub async fn dau(&self, query: &AnalyticsQuery) -> Result<AnalyticsResponse<DauEntry>> {
        self.analytics(AnalyticsMetric::Dau, query).await
    }

    pub async fn model_usage(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse<ModelUsageEntry>> {
        self.analytics(AnalyticsMetric::Models, query).await
    }

    pub async fn agent_edits(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse<AgentEditsEntry>> {
        self.analytics(AnalyticsMetric::AgentEdits, query).await
    }

    pub async fn tabs(&self, query: &AnalyticsQuery) -> Result<AnalyticsResponse<TabsEntry>> {
        self.analytics(AnalyticsMetric::Tabs, query).await
    }

    pub async fn mcp(&self, query: &AnalyticsQuery) -> Result<AnalyticsResponse<McpEntry>> {
        self.analytics(AnalyticsMetric::Mcp, query).await
    }

    pub async fn file_extensions(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse<FileExtensionsEntry>> {
        self.analytics(AnalyticsMetric::TopFileExtensions, query)
            .await
    }

    pub async fn client_versions(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse<ClientVersionsEntry>> {
        self.analytics(AnalyticsMetric::ClientVersions, query)
            .await
    }

    pub async fn commands(
        &self,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse<CommandsEntry>> {
        self.analytics(AnalyticsMetric::Commands, query).await
    }

    pub async fn plans(&self, query: &AnalyticsQuery) -> Result<AnalyticsResponse<PlansEntry>> {
        self.analytics(AnalyticsMetric::Plans, query).await
    }
}

/// Render a millisecond timestamp as a UTC `YYYY-MM-DD` date
pub(crate) fn cycle_start_date(millis: i64) -> Result<String> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .ok_or_else(|| Error::Other(format!("Invalid subscriptionCycleStart: {millis}")))
}

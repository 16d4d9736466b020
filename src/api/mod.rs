//! Resource layer
//!
//! Maps each upstream resource onto one typed call:
//! - **Admin**: team roster, spend, daily usage, usage events, billing groups,
//!   spend-limit mutation
//! - **Analytics**: nine breakdowns sharing one date/user filter

mod analytics;
mod client;
mod models;

pub use analytics::{AnalyticsMetric, AnalyticsQuery, DEFAULT_END_DATE, DEFAULT_START_DATE};
pub use client::{
    CursorApi, DailyUsageQuery, SpendQuery, UsageEventsQuery, DEFAULT_PAGE_SIZE,
    USAGE_EVENTS_PAGE_SIZE,
};
pub use models::{
    AgentEditsEntry, AnalyticsResponse, BillingCycle, BillingGroup, ClientVersionsEntry,
    CommandsEntry, DailySpend, DailyUsageEntry, DailyUsagePage, DailyUsagePagination, DauEntry,
    FileExtensionsEntry, GroupMemberSpend, GroupsResponse, McpEntry, MemberSpend, ModelStats,
    ModelUsageEntry, Period, PlansEntry, SpendPage, SpendResponse, TabsEntry, TeamMember,
    TeamSpend, TokenUsage, UsageEvent, UsageEventsPage, UsageEventsPagination,
};

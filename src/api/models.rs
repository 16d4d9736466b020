//! Typed records for every upstream resource
//!
//! Admin endpoints speak camelCase JSON; analytics endpoints speak
//! snake_case. Missing numeric fields default to zero so older or newer
//! upstream payloads still decode. Unknown fields are ignored.

use crate::pagination::{Page, StopSignal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Team Roster
// ============================================================================

/// One member of the team
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMember {
    pub name: String,
    pub email: String,
    pub id: String,
    pub role: String,
    pub is_removed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeamMembersResponse {
    pub team_members: Vec<TeamMember>,
}

// ============================================================================
// Daily Usage
// ============================================================================

/// Millisecond timestamps bounding a reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Period {
    pub start_date: i64,
    pub end_date: i64,
}

/// Per-user, per-day activity counters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyUsageEntry {
    pub date: i64,
    pub day: String,
    pub user_id: String,
    pub email: String,
    pub is_active: bool,
    pub total_lines_added: u64,
    pub total_lines_deleted: u64,
    pub accepted_lines_added: u64,
    pub accepted_lines_deleted: u64,
    pub total_applies: u64,
    pub total_accepts: u64,
    pub total_rejects: u64,
    pub total_tabs_shown: u64,
    pub total_tabs_accepted: u64,
    pub composer_requests: u64,
    pub chat_requests: u64,
    pub agent_requests: u64,
    pub cmdk_usages: u64,
    pub subscription_included_reqs: u64,
    pub api_key_reqs: u64,
    pub usage_based_reqs: u64,
    pub bugbot_usages: u64,
    pub most_used_model: Option<String>,
    pub apply_most_used_extension: Option<String>,
    pub tab_most_used_extension: Option<String>,
    pub client_version: Option<String>,
}

impl DailyUsageEntry {
    /// Composer, chat and agent requests combined
    pub fn total_requests(&self) -> u64 {
        self.composer_requests + self.chat_requests + self.agent_requests
    }
}

/// Pagination block of the daily usage listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyUsagePagination {
    pub page: u32,
    pub page_size: u32,
    pub total_users: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of daily usage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyUsagePage {
    pub period: Period,
    pub data: Vec<DailyUsageEntry>,
    pub pagination: DailyUsagePagination,
}

impl Page for DailyUsagePage {
    type Record = DailyUsageEntry;

    fn stop_signal(&self) -> StopSignal {
        StopSignal::HasNextPage(self.pagination.has_next_page)
    }

    fn take_records(&mut self) -> Vec<Self::Record> {
        std::mem::take(&mut self.data)
    }
}

// ============================================================================
// Spend
// ============================================================================

/// Billing-cycle spend of one member
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberSpend {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub spend_cents: i64,
    pub included_spend_cents: i64,
    pub fast_premium_requests: u64,
    pub monthly_limit_dollars: Option<f64>,
    pub hard_limit_override_dollars: f64,
}

/// Raw spend listing page as returned upstream
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpendResponse {
    pub team_member_spend: Vec<MemberSpend>,
    /// Cycle start as a millisecond timestamp
    pub subscription_cycle_start: i64,
    pub total_members: u32,
    pub total_pages: u32,
    pub limited_users_count: u32,
    pub max_user_spend_cents: i64,
}

impl Page for SpendResponse {
    type Record = MemberSpend;

    fn stop_signal(&self) -> StopSignal {
        StopSignal::TotalPages(self.total_pages)
    }

    fn take_records(&mut self) -> Vec<Self::Record> {
        std::mem::take(&mut self.team_member_spend)
    }
}

/// One page of spend with the cycle start rendered as a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendPage {
    pub members: Vec<MemberSpend>,
    /// `YYYY-MM-DD` (UTC)
    pub cycle_start: String,
    pub total_pages: u32,
    pub total_members: u32,
}

/// Spend of the whole team across all pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSpend {
    pub members: Vec<MemberSpend>,
    /// `YYYY-MM-DD` (UTC), as reported by the last page
    pub cycle_start: String,
}

impl TeamSpend {
    /// Sum of all members' spend
    pub fn total_cents(&self) -> i64 {
        self.members.iter().map(|m| m.spend_cents).sum()
    }

    /// Members sorted by spend, highest first
    pub fn top_spenders(&self) -> Vec<&MemberSpend> {
        let mut sorted: Vec<&MemberSpend> = self.members.iter().collect();
        sorted.sort_by(|a, b| b.spend_cents.cmp(&a.spend_cents));
        sorted
    }

    /// Case-insensitive lookup by email
    pub fn find(&self, email: &str) -> Option<&MemberSpend> {
        self.members
            .iter()
            .find(|m| m.email.eq_ignore_ascii_case(email))
    }
}

// ============================================================================
// Billing Groups
// ============================================================================

/// Spend on one day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailySpend {
    pub date: String,
    pub spend_cents: i64,
}

/// Member of a billing group
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupMemberSpend {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub joined_at: String,
    pub left_at: Option<String>,
    pub spend_cents: i64,
    pub daily_spend: Vec<DailySpend>,
}

/// Billing group with its members and spend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingGroup {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub member_count: u32,
    pub spend_cents: i64,
    pub current_members: Vec<GroupMemberSpend>,
    pub daily_spend: Vec<DailySpend>,
}

/// Current billing cycle bounds
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingCycle {
    pub cycle_start: String,
    pub cycle_end: String,
}

/// Billing groups listing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupsResponse {
    pub groups: Vec<BillingGroup>,
    pub unassigned_group: Option<BillingGroup>,
    pub billing_cycle: Option<BillingCycle>,
}

// ============================================================================
// Usage Events
// ============================================================================

/// Token accounting of one request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_write_tokens: u64,
    pub cache_read_tokens: u64,
    pub total_cents: f64,
}

/// One billed or included request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageEvent {
    pub timestamp: String,
    pub model: String,
    pub kind: String,
    pub max_mode: bool,
    pub requests_costs: f64,
    pub is_token_based_call: bool,
    pub token_usage: Option<TokenUsage>,
    pub user_email: String,
    pub is_chargeable: bool,
    pub is_headless: bool,
}

/// Pagination block of the usage events listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageEventsPagination {
    pub num_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of usage events
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageEventsPage {
    pub total_usage_events_count: u64,
    pub pagination: UsageEventsPagination,
    pub usage_events: Vec<UsageEvent>,
    pub period: Period,
}

impl Page for UsageEventsPage {
    type Record = UsageEvent;

    fn stop_signal(&self) -> StopSignal {
        StopSignal::HasNextPage(self.pagination.has_next_page)
    }

    fn take_records(&mut self) -> Vec<Self::Record> {
        std::mem::take(&mut self.usage_events)
    }
}

// ============================================================================
// Analytics
// ============================================================================

/// Analytics listing: rows plus the parameters the server applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DauEntry {
    pub date: String,
    pub dau: u64,
    pub cli_dau: u64,
    pub cloud_agent_dau: u64,
    pub bugbot_dau: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelStats {
    pub messages: u64,
    pub users: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelUsageEntry {
    pub date: String,
    pub model_breakdown: BTreeMap<String, ModelStats>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentEditsEntry {
    pub event_date: String,
    pub total_suggested_diffs: u64,
    pub total_accepted_diffs: u64,
    pub total_rejected_diffs: u64,
    pub total_green_lines_accepted: u64,
    pub total_red_lines_accepted: u64,
    pub total_green_lines_rejected: u64,
    pub total_red_lines_rejected: u64,
    pub total_green_lines_suggested: u64,
    pub total_red_lines_suggested: u64,
    pub total_lines_suggested: u64,
    pub total_lines_accepted: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsEntry {
    pub event_date: String,
    pub total_suggestions: u64,
    pub total_accepts: u64,
    pub total_rejects: u64,
    pub total_lines_suggested: u64,
    pub total_lines_accepted: u64,
    pub total_green_lines_accepted: u64,
    pub total_red_lines_accepted: u64,
    pub total_green_lines_rejected: u64,
    pub total_red_lines_rejected: u64,
    pub total_green_lines_suggested: u64,
    pub total_red_lines_suggested: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct McpEntry {
    pub event_date: String,
    pub tool_name: String,
    pub mcp_server_name: String,
    pub usage: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExtensionsEntry {
    pub event_date: String,
    pub file_extension: String,
    pub total_files: u64,
    pub total_accepts: u64,
    pub total_rejects: u64,
    pub total_lines_suggested: u64,
    pub total_lines_accepted: u64,
    pub total_lines_rejected: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientVersionsEntry {
    pub event_date: String,
    pub client_version: String,
    pub user_count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsEntry {
    pub event_date: String,
    pub command_name: String,
    pub usage: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlansEntry {
    pub event_date: String,
    pub model: String,
    pub usage: u64,
}

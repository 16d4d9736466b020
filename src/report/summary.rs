//! Plain-text summaries of API results

use super::format::{format_cents, format_dollars, format_fractional_cents};
use crate::api::{
    DailyUsageEntry, DauEntry, GroupsResponse, MemberSpend, ModelUsageEntry, TeamMember,
    TeamSpend, UsageEvent, UsageEventsPage,
};
use crate::error::Result;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Spenders listed in the spend summary
pub const SPEND_SUMMARY_LIMIT: usize = 20;

/// Members listed per billing group
pub const GROUP_MEMBER_LIMIT: usize = 10;

/// Entries kept when a whole daily usage sweep is summarized
pub const DAILY_USAGE_LIMIT: usize = 50;

/// Events kept in a usage events digest
pub const EVENTS_DIGEST_LIMIT: usize = 20;

/// Entries shown in the overview rankings
pub const OVERVIEW_TOP: usize = 5;

/// Events listed in the user deep dive
pub const RECENT_EVENTS_LIMIT: usize = 10;

// ============================================================================
// Roster and Spend
// ============================================================================

fn member_line(m: &TeamMember) -> String {
    format!("  {} <{}> - {}", m.name, m.email, m.role)
}

/// Active and removed members with counts
pub fn team_roster(members: &[TeamMember]) -> String {
    let (removed, active): (Vec<&TeamMember>, Vec<&TeamMember>) =
        members.iter().partition(|m| m.is_removed);

    let mut lines = vec![
        format!(
            "Team: {} total ({} active, {} removed)",
            members.len(),
            active.len(),
            removed.len()
        ),
        String::new(),
        "Active members:".to_string(),
    ];
    lines.extend(active.iter().map(|m| member_line(m)));

    if !removed.is_empty() {
        lines.push(String::new());
        lines.push("Removed members:".to_string());
        lines.extend(removed.iter().map(|m| member_line(m)));
    }

    lines.join("\n")
}

fn spender_line(rank: usize, m: &MemberSpend) -> String {
    let limit = if m.hard_limit_override_dollars > 0.0 {
        format!(", limit: {}", format_dollars(m.hard_limit_override_dollars))
    } else {
        String::new()
    };
    format!(
        "  {rank}. {} <{}> - {} (included: {}, premium reqs: {}{limit})",
        m.name,
        m.email,
        format_cents(m.spend_cents),
        format_cents(m.included_spend_cents),
        m.fast_premium_requests
    )
}

/// Cycle total and the top spenders
pub fn spend_summary(spend: &TeamSpend) -> String {
    let ranked = spend.top_spenders();

    let mut lines = vec![
        format!("Billing cycle start: {}", spend.cycle_start),
        format!("Total team spend: {}", format_cents(spend.total_cents())),
        format!("Members: {}", spend.members.len()),
        String::new(),
        "Top spenders:".to_string(),
    ];
    lines.extend(
        ranked
            .iter()
            .take(SPEND_SUMMARY_LIMIT)
            .enumerate()
            .map(|(i, m)| spender_line(i + 1, m)),
    );
    if ranked.len() > SPEND_SUMMARY_LIMIT {
        lines.push(format!(
            "  ... and {} more members",
            ranked.len() - SPEND_SUMMARY_LIMIT
        ));
    }

    lines.join("\n")
}

/// Groups with their spend and first members
pub fn billing_groups(groups: &GroupsResponse) -> String {
    let mut lines = Vec::new();

    if let Some(ref cycle) = groups.billing_cycle {
        lines.push(format!(
            "Billing cycle: {} -> {}",
            cycle.cycle_start, cycle.cycle_end
        ));
        lines.push(String::new());
    }

    for group in &groups.groups {
        lines.push(format!(
            "Group: {} ({} members, {})",
            group.name,
            group.member_count,
            format_cents(group.spend_cents)
        ));
        for member in group.current_members.iter().take(GROUP_MEMBER_LIMIT) {
            lines.push(format!(
                "  {} <{}> - {}",
                member.name,
                member.email,
                format_cents(member.spend_cents)
            ));
        }
        if group.current_members.len() > GROUP_MEMBER_LIMIT {
            lines.push(format!(
                "  ... and {} more members",
                group.current_members.len() - GROUP_MEMBER_LIMIT
            ));
        }
        lines.push(String::new());
    }

    if let Some(ref unassigned) = groups.unassigned_group {
        lines.push(format!(
            "Unassigned: {} members, {}",
            unassigned.member_count,
            format_cents(unassigned.spend_cents)
        ));
    }

    lines.join("\n")
}

/// Confirmation for a spend limit change
pub fn spend_limit_message(email: &str, limit_dollars: f64) -> String {
    if limit_dollars > 0.0 {
        format!(
            "Spend limit set: {email} -> {}/cycle",
            format_dollars(limit_dollars)
        )
    } else {
        format!("Spend limit removed for {email}")
    }
}

// ============================================================================
// Usage
// ============================================================================

/// Head of a full daily usage sweep with the total count
pub fn daily_usage_digest(entries: &[DailyUsageEntry]) -> Value {
    let truncated = entries.len() > DAILY_USAGE_LIMIT;
    let shown = &entries[..entries.len().min(DAILY_USAGE_LIMIT)];

    let mut digest = json!({
        "totalEntries": entries.len(),
        "entries": shown,
        "truncated": truncated,
    });
    if truncated {
        digest["note"] = json!(format!(
            "Showing first {DAILY_USAGE_LIMIT} of {} entries. Use page/pageSize for specific ranges.",
            entries.len()
        ));
    }
    digest
}

/// Page metadata plus the first events of the page
pub fn usage_events_digest(page: &UsageEventsPage) -> Value {
    let shown = &page.usage_events[..page.usage_events.len().min(EVENTS_DIGEST_LIMIT)];
    json!({
        "totalEvents": page.total_usage_events_count,
        "page": page.pagination.current_page,
        "totalPages": page.pagination.num_pages,
        "hasNextPage": page.pagination.has_next_page,
        "events": shown,
        "truncated": page.usage_events.len() > EVENTS_DIGEST_LIMIT,
    })
}

// ============================================================================
// Models
// ============================================================================

/// Period totals for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTotal {
    pub model: String,
    /// Messages summed over all days
    pub messages: u64,
    /// Highest daily user count
    pub peak_users: u64,
}

/// Per-model totals, most messages first (ties by name)
pub fn model_totals(days: &[ModelUsageEntry]) -> Vec<ModelTotal> {
    let mut totals: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for day in days {
        for (model, stats) in &day.model_breakdown {
            let entry = totals.entry(model.as_str()).or_default();
            entry.0 += stats.messages;
            entry.1 = entry.1.max(stats.users);
        }
    }

    let mut sorted: Vec<ModelTotal> = totals
        .into_iter()
        .map(|(model, (messages, peak_users))| ModelTotal {
            model: model.to_string(),
            messages,
            peak_users,
        })
        .collect();
    sorted.sort_by(|a, b| b.messages.cmp(&a.messages));
    sorted
}

/// Period totals followed by the daily breakdown as JSON
pub fn model_usage_summary(days: &[ModelUsageEntry]) -> Result<String> {
    let mut lines = vec!["Model usage summary (period totals):".to_string()];
    lines.extend(model_totals(days).iter().map(|t| {
        format!(
            "  {}: {} messages, up to {} users/day",
            t.model, t.messages, t.peak_users
        )
    }));
    lines.push(String::new());
    lines.push("Daily breakdown:".to_string());
    lines.push(serde_json::to_string_pretty(days)?);
    Ok(lines.join("\n"))
}

// ============================================================================
// Composite Views
// ============================================================================

/// Roster, spend, DAU and model adoption in one screen
pub fn overview_text(
    members: &[TeamMember],
    spend: &TeamSpend,
    dau: &[DauEntry],
    models: &[ModelUsageEntry],
) -> String {
    let active = members.iter().filter(|m| !m.is_removed).count();
    let total = spend.total_cents();
    let average = (total as f64 / active.max(1) as f64).round() as i64;

    let (latest_dau, latest_date) = match dau.last() {
        Some(entry) => (entry.dau.to_string(), entry.date.clone()),
        None => ("N/A".to_string(), "N/A".to_string()),
    };

    let mut lines = vec![
        "=== Team Overview ===".to_string(),
        String::new(),
        format!("Members: {active} active ({} total)", members.len()),
        format!("Billing cycle: started {}", spend.cycle_start),
        format!("Total spend this cycle: {}", format_cents(total)),
        format!("Average spend per member: {}", format_cents(average)),
        String::new(),
        format!("Latest DAU: {latest_dau} ({latest_date})"),
        String::new(),
        format!("Top {OVERVIEW_TOP} spenders:"),
    ];
    lines.extend(
        spend
            .top_spenders()
            .iter()
            .take(OVERVIEW_TOP)
            .enumerate()
            .map(|(i, m)| format!("  {}. {} - {}", i + 1, m.name, format_cents(m.spend_cents))),
    );
    lines.push(String::new());
    lines.push(format!("Top {OVERVIEW_TOP} models (by messages):"));
    lines.extend(
        model_totals(models)
            .iter()
            .take(OVERVIEW_TOP)
            .enumerate()
            .map(|(i, t)| format!("  {}. {}: {} messages", i + 1, t.model, t.messages)),
    );

    lines.join("\n")
}

fn event_line(event: &UsageEvent) -> String {
    let cost = match event.token_usage {
        Some(ref usage) => format!(
            "{} tokens, {}",
            usage.input_tokens + usage.output_tokens,
            format_fractional_cents(usage.total_cents)
        ),
        None => format!("cost: {}", format_fractional_cents(event.requests_costs)),
    };
    format!(
        "  {} - {} ({}) {cost}",
        event.timestamp, event.model, event.kind
    )
}

/// One member's spend, activity and recent requests
pub fn deep_dive_text(
    email: &str,
    spend: &TeamSpend,
    daily: &[DailyUsageEntry],
    events: &[UsageEvent],
) -> String {
    let days: Vec<&DailyUsageEntry> = daily
        .iter()
        .filter(|d| d.email.eq_ignore_ascii_case(email))
        .collect();
    let total_requests: u64 = days.iter().map(|d| d.total_requests()).sum();
    let total_lines: u64 = days.iter().map(|d| d.total_lines_added).sum();
    let active_days = days.iter().filter(|d| d.is_active).count();

    let mut lines = vec![format!("=== User Deep Dive: {email} ==="), String::new()];

    match spend.find(email) {
        Some(m) => {
            let limit = if m.hard_limit_override_dollars > 0.0 {
                format_dollars(m.hard_limit_override_dollars)
            } else {
                "none".to_string()
            };
            lines.push(format!("Spend this cycle: {}", format_cents(m.spend_cents)));
            lines.push(format!("  Included: {}", format_cents(m.included_spend_cents)));
            lines.push(format!("  Premium requests: {}", m.fast_premium_requests));
            lines.push(format!("  Spend limit: {limit}"));
        }
        None => lines.push("Spend data not found for this user.".to_string()),
    }

    lines.push(String::new());
    lines.push(format!("Activity (last {} days):", days.len()));
    lines.push(format!("  Active days: {active_days}"));
    lines.push(format!("  Total requests: {total_requests}"));
    lines.push(format!("  Total lines added: {total_lines}"));

    let mut model_counts: BTreeMap<&str, u64> = BTreeMap::new();
    for event in events {
        *model_counts.entry(event.model.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, u64)> = model_counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    lines.push(String::new());
    lines.push("Recent model usage:".to_string());
    lines.extend(
        ranked
            .iter()
            .map(|(model, count)| format!("  {model}: {count} requests")),
    );

    lines.push(String::new());
    lines.push(format!("Recent events ({} shown):", events.len()));
    lines.extend(events.iter().take(RECENT_EVENTS_LIMIT).map(event_line));

    lines.join("\n")
}

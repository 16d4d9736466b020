//! Tests for report module

use super::*;
use crate::api::{
    BillingCycle, BillingGroup, CursorApi, DailyUsageEntry, DauEntry, GroupMemberSpend,
    GroupsResponse, MemberSpend, ModelStats, ModelUsageEntry, TeamMember, TeamSpend, TokenUsage,
    UsageEvent, UsageEventsPage,
};
use crate::auth::Credential;
use crate::http::{HttpClient, HttpClientConfig, RecordingSleeper};
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use test_case::test_case;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn member(name: &str, removed: bool) -> TeamMember {
    TeamMember {
        name: name.to_string(),
        email: format!("{}@co.com", name.to_lowercase()),
        role: "member".to_string(),
        is_removed: removed,
        ..Default::default()
    }
}

fn spender(name: &str, cents: i64) -> MemberSpend {
    MemberSpend {
        name: name.to_string(),
        email: format!("{}@co.com", name.to_lowercase()),
        spend_cents: cents,
        ..Default::default()
    }
}

fn models_day(pairs: &[(&str, u64, u64)]) -> ModelUsageEntry {
    ModelUsageEntry {
        date: "2026-02-01".to_string(),
        model_breakdown: pairs
            .iter()
            .map(|(m, messages, users)| {
                (
                    (*m).to_string(),
                    ModelStats {
                        messages: *messages,
                        users: *users,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>(),
    }
}

// ============================================================================
// Format Tests
// ============================================================================

#[test_case(1234 => "$12.34")]
#[test_case(5 => "$0.05")]
#[test_case(0 => "$0.00")]
#[test_case(100_000 => "$1000.00")]
#[test_case(-250 => "-$2.50")]
fn test_format_cents(cents: i64) -> String {
    format_cents(cents)
}

#[test]
fn test_format_fractional_and_dollars() {
    assert_eq!(format_fractional_cents(4.2), "$0.04");
    assert_eq!(format_fractional_cents(150.0), "$1.50");
    assert_eq!(format_dollars(150.0), "$150");
    assert_eq!(format_dollars(12.5), "$12.5");
}

#[test]
fn test_parse_date_millis() {
    assert_eq!(parse_date_millis("2024-02-19").unwrap(), 1_708_300_800_000);
    assert_eq!(
        parse_date_millis("2024-02-19T00:00:00Z").unwrap(),
        1_708_300_800_000
    );
    assert!(parse_date_millis("7d").is_err());
}

#[test]
fn test_days_before() {
    let now = Utc.timestamp_millis_opt(1_708_300_800_000).unwrap();
    assert_eq!(days_before(now, 7), 1_708_300_800_000 - 7 * 86_400_000);
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_team_roster() {
    let text = team_roster(&[member("Alice", false), member("Bob", true)]);

    assert_eq!(
        text,
        "Team: 2 total (1 active, 1 removed)\n\
         \n\
         Active members:\n  \
         Alice <alice@co.com> - member\n\
         \n\
         Removed members:\n  \
         Bob <bob@co.com> - member"
    );
}

#[test]
fn test_team_roster_without_removed() {
    let text = team_roster(&[member("Alice", false)]);
    assert!(!text.contains("Removed members"));
}

#[test]
fn test_spend_summary_truncates() {
    let members: Vec<MemberSpend> = (0..22)
        .map(|i| spender(&format!("U{i}"), i64::from(i) * 100))
        .collect();
    let spend = TeamSpend {
        members,
        cycle_start: "2026-02-01".to_string(),
    };

    let text = spend_summary(&spend);

    assert!(text.starts_with("Billing cycle start: 2026-02-01\nTotal team spend: $231.00"));
    assert!(text.contains("  1. U21 <u21@co.com> - $21.00"));
    assert!(text.contains("  20. U2 <u2@co.com>"));
    assert!(!text.contains("U1 <"));
    assert!(text.ends_with("  ... and 2 more members"));
}

#[test]
fn test_spend_summary_shows_limit() {
    let mut m = spender("Alice", 5000);
    m.hard_limit_override_dollars = 100.0;
    let spend = TeamSpend {
        members: vec![m],
        cycle_start: "2026-02-01".to_string(),
    };

    assert!(spend_summary(&spend).contains("premium reqs: 0, limit: $100)"));
}

#[test]
fn test_billing_groups() {
    let groups = GroupsResponse {
        groups: vec![BillingGroup {
            name: "Platform".to_string(),
            member_count: 12,
            spend_cents: 1234,
            current_members: (0..12)
                .map(|i| GroupMemberSpend {
                    name: format!("M{i}"),
                    email: format!("m{i}@co.com"),
                    spend_cents: 100,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }],
        unassigned_group: Some(BillingGroup {
            member_count: 3,
            spend_cents: 50,
            ..Default::default()
        }),
        billing_cycle: Some(BillingCycle {
            cycle_start: "2026-01-01".to_string(),
            cycle_end: "2026-02-01".to_string(),
        }),
    };

    let text = billing_groups(&groups);

    assert!(text.starts_with("Billing cycle: 2026-01-01 -> 2026-02-01\n\n"));
    assert!(text.contains("Group: Platform (12 members, $12.34)"));
    assert!(text.contains("  M9 <m9@co.com> - $1.00"));
    assert!(!text.contains("M10"));
    assert!(text.contains("  ... and 2 more members"));
    assert!(text.ends_with("Unassigned: 3 members, $0.50"));
}

#[test]
fn test_spend_limit_message() {
    assert_eq!(
        spend_limit_message("a@co.com", 150.0),
        "Spend limit set: a@co.com -> $150/cycle"
    );
    assert_eq!(
        spend_limit_message("a@co.com", 0.0),
        "Spend limit removed for a@co.com"
    );
}

#[test]
fn test_daily_usage_digest() {
    let entries = vec![DailyUsageEntry::default(); 60];
    let digest = daily_usage_digest(&entries);

    assert_eq!(digest["totalEntries"], 60);
    assert_eq!(digest["entries"].as_array().unwrap().len(), 50);
    assert_eq!(digest["truncated"], true);
    assert!(digest["note"].as_str().unwrap().contains("50 of 60"));

    let digest = daily_usage_digest(&entries[..3]);
    assert_eq!(digest["truncated"], false);
    assert!(digest.get("note").is_none());
}

#[test]
fn test_usage_events_digest() {
    let mut page = UsageEventsPage {
        total_usage_events_count: 900,
        usage_events: vec![UsageEvent::default(); 25],
        ..Default::default()
    };
    page.pagination.current_page = 1;
    page.pagination.num_pages = 2;
    page.pagination.has_next_page = true;

    let digest = usage_events_digest(&page);

    assert_eq!(digest["totalEvents"], 900);
    assert_eq!(digest["totalPages"], 2);
    assert_eq!(digest["hasNextPage"], true);
    assert_eq!(digest["events"].as_array().unwrap().len(), 20);
    assert_eq!(digest["truncated"], true);
}

#[test]
fn test_model_totals() {
    let days = vec![
        models_day(&[("gpt-5", 10, 3), ("sonnet", 30, 2)]),
        models_day(&[("gpt-5", 25, 5), ("sonnet", 1, 1)]),
    ];

    assert_eq!(
        model_totals(&days),
        vec![
            ModelTotal {
                model: "gpt-5".to_string(),
                messages: 35,
                peak_users: 5
            },
            ModelTotal {
                model: "sonnet".to_string(),
                messages: 31,
                peak_users: 2
            },
        ]
    );
}

#[test]
fn test_model_usage_summary() {
    let text = model_usage_summary(&[models_day(&[("gpt-5", 4, 2)])]).unwrap();
    assert!(text.starts_with(
        "Model usage summary (period totals):\n  gpt-5: 4 messages, up to 2 users/day\n\nDaily breakdown:\n"
    ));
    assert!(text.contains("\"model_breakdown\""));
}

#[test]
fn test_overview_text() {
    let members = vec![member("Alice", false), member("Bob", false), member("Old", true)];
    let spend = TeamSpend {
        members: vec![spender("Alice", 1000), spender("Bob", 3001)],
        cycle_start: "2026-02-01".to_string(),
    };
    let dau = vec![
        DauEntry {
            date: "2026-02-01".to_string(),
            dau: 4,
            ..Default::default()
        },
        DauEntry {
            date: "2026-02-02".to_string(),
            dau: 7,
            ..Default::default()
        },
    ];

    let text = overview_text(&members, &spend, &dau, &[models_day(&[("gpt-5", 9, 2)])]);

    assert!(text.contains("Members: 2 active (3 total)"));
    assert!(text.contains("Total spend this cycle: $40.01"));
    assert!(text.contains("Average spend per member: $20.01"));
    assert!(text.contains("Latest DAU: 7 (2026-02-02)"));
    assert!(text.contains("Top 5 spenders:\n  1. Bob - $30.01\n  2. Alice - $10.00"));
    assert!(text.contains("  1. gpt-5: 9 messages"));
}

#[test]
fn test_overview_text_empty_team() {
    let spend = TeamSpend {
        members: vec![],
        cycle_start: "2026-02-01".to_string(),
    };
    let text = overview_text(&[], &spend, &[], &[]);

    assert!(text.contains("Average spend per member: $0.00"));
    assert!(text.contains("Latest DAU: N/A (N/A)"));
}

#[test]
fn test_deep_dive_text() {
    let mut alice = spender("Alice", 4200);
    alice.included_spend_cents = 2000;
    alice.fast_premium_requests = 12;
    let spend = TeamSpend {
        members: vec![alice],
        cycle_start: "2026-02-01".to_string(),
    };
    let daily = vec![
        DailyUsageEntry {
            email: "ALICE@co.com".to_string(),
            is_active: true,
            chat_requests: 2,
            agent_requests: 3,
            total_lines_added: 40,
            ..Default::default()
        },
        DailyUsageEntry {
            email: "alice@co.com".to_string(),
            is_active: false,
            ..Default::default()
        },
        DailyUsageEntry {
            email: "bob@co.com".to_string(),
            is_active: true,
            chat_requests: 99,
            ..Default::default()
        },
    ];
    let events = vec![
        UsageEvent {
            timestamp: "1".to_string(),
            model: "gpt-5".to_string(),
            kind: "Included".to_string(),
            token_usage: Some(TokenUsage {
                input_tokens: 100,
                output_tokens: 20,
                total_cents: 4.2,
                ..Default::default()
            }),
            ..Default::default()
        },
        UsageEvent {
            timestamp: "2".to_string(),
            model: "sonnet".to_string(),
            kind: "Usage-based".to_string(),
            requests_costs: 150.0,
            ..Default::default()
        },
        UsageEvent {
            timestamp: "3".to_string(),
            model: "sonnet".to_string(),
            kind: "Usage-based".to_string(),
            ..Default::default()
        },
    ];

    let text = deep_dive_text("alice@co.com", &spend, &daily, &events);

    assert!(text.starts_with("=== User Deep Dive: alice@co.com ===\n\nSpend this cycle: $42.00"));
    assert!(text.contains("  Included: $20.00\n  Premium requests: 12\n  Spend limit: none"));
    assert!(text.contains("Activity (last 2 days):\n  Active days: 1\n  Total requests: 5\n  Total lines added: 40"));
    assert!(text.contains("Recent model usage:\n  sonnet: 2 requests\n  gpt-5: 1 requests"));
    assert!(text.contains("Recent events (3 shown):"));
    assert!(text.contains("  1 - gpt-5 (Included) 120 tokens, $0.04"));
    assert!(text.contains("  2 - sonnet (Usage-based) cost: $1.50"));
}

#[test]
fn test_deep_dive_text_unknown_user() {
    let spend = TeamSpend {
        members: vec![],
        cycle_start: "2026-02-01".to_string(),
    };
    let text = deep_dive_text("ghost@co.com", &spend, &[], &[]);
    assert!(text.contains("Spend data not found for this user."));
    assert!(text.contains("Activity (last 0 days):"));
}

// ============================================================================
// Composite Tests
// ============================================================================

fn api_for(server: &MockServer) -> CursorApi {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    let http = HttpClient::with_config(config, Credential::new("test-api-key").unwrap())
        .unwrap()
        .with_sleeper(Arc::new(RecordingSleeper::new()));
    CursorApi::new(http)
}

async fn mount_spend(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/teams/spend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "teamMemberSpend": [
                {"email": "alice@co.com", "name": "Alice", "spendCents": 2500},
                {"email": "bob@co.com", "name": "Bob", "spendCents": 500}
            ],
            "subscriptionCycleStart": 1_708_300_800_000_i64,
            "totalPages": 1
        })))
        .expect(expected_calls..)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_team_overview_fetches_all_sources() {
    let mock_server = MockServer::start().await;
    mount_spend(&mock_server, 1).await;

    Mock::given(method("GET"))
        .and(path("/teams/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "teamMembers": [
                {"name": "Alice", "email": "alice@co.com", "role": "owner"},
                {"name": "Bob", "email": "bob@co.com", "role": "member"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/analytics/team/dau"))
        .and(query_param("startDate", "7d"))
        .and(query_param("endDate", "today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"date": "2026-02-07", "dau": 2}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/analytics/team/models"))
        .and(query_param("startDate", "7d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"date": "2026-02-07", "model_breakdown": {"gpt-5": {"messages": 12, "users": 2}}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = team_overview(&api_for(&mock_server), None, None)
        .await
        .unwrap();

    assert!(text.contains("Members: 2 active (2 total)"));
    assert!(text.contains("Billing cycle: started 2024-02-19"));
    assert!(text.contains("Total spend this cycle: $30.00"));
    assert!(text.contains("Latest DAU: 2 (2026-02-07)"));
    assert!(text.contains("  1. gpt-5: 12 messages"));
}

#[tokio::test]
async fn test_team_overview_fails_when_any_source_fails() {
    let mock_server = MockServer::start().await;
    mount_spend(&mock_server, 0).await;

    Mock::given(method("GET"))
        .and(path("/teams/members"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/analytics/team/dau"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/analytics/team/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let err = team_overview(&api_for(&mock_server), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_user_deep_dive_window() {
    let mock_server = MockServer::start().await;
    mount_spend(&mock_server, 1).await;

    let now = Utc.timestamp_millis_opt(1_770_000_000_000).unwrap();

    Mock::given(method("POST"))
        .and(path("/teams/daily-usage-data"))
        .and(body_partial_json(json!({
            "startDate": 1_708_300_800_000_i64,
            "endDate": 1_770_000_000_000_i64,
            "page": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"email": "alice@co.com", "isActive": true, "agentRequests": 4}],
            "pagination": {"hasNextPage": false}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/teams/filtered-usage-events"))
        .and(body_partial_json(json!({
            "email": "alice@co.com",
            "page": 1,
            "pageSize": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "usageEvents": [{"timestamp": "1", "model": "gpt-5", "kind": "Included"}],
            "pagination": {"hasNextPage": false}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let text = user_deep_dive(&api_for(&mock_server), "alice@co.com", Some("2024-02-19"), now)
        .await
        .unwrap();

    assert!(text.contains("Spend this cycle: $25.00"));
    assert!(text.contains("Total requests: 4"));
    assert!(text.contains("  gpt-5: 1 requests"));
}

#[tokio::test]
async fn test_user_deep_dive_rejects_bad_date() {
    let mock_server = MockServer::start().await;
    let err = user_deep_dive(&api_for(&mock_server), "a@co.com", Some("last week"), Utc::now())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("last week"));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

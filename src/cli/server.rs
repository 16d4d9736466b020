//! Tool server
//!
//! Line-delimited JSON-RPC 2.0 over stdio. Every request line gets exactly
//! one response line on stdout; notifications get none. Logs go to stderr.
//!
//! ## Methods
//!
//! - `initialize` - protocol handshake
//! - `tools/list` - tool names, descriptions and input schemas
//! - `tools/call` - run one tool; failures come back as `isError` content

use crate::api::{
    AnalyticsMetric, AnalyticsQuery, CursorApi, DailyUsageQuery, SpendQuery, UsageEventsQuery,
};
use crate::error::{Error, Result};
use crate::report;
use crate::types::{JsonObject, JsonValue};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Protocol revision announced in `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const PARSE_ERROR: i32 = -32700;

// ============================================================================
// Wire Types
// ============================================================================

/// JSON-RPC request or notification
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Absent on notifications
    #[serde(default)]
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

/// JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: JsonValue, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ============================================================================
// Tool Arguments
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SpendingArgs {
    page: Option<u32>,
    all_pages: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DailyUsageArgs {
    start_date: Option<i64>,
    end_date: Option<i64>,
    page: Option<u32>,
    page_size: Option<u32>,
    all_pages: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct UsageEventsArgs {
    email: Option<String>,
    start_date: Option<i64>,
    end_date: Option<i64>,
    page: Option<u32>,
    page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpendLimitArgs {
    email: String,
    limit_dollars: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AnalyticsArgs {
    start_date: Option<String>,
    end_date: Option<String>,
    /// Comma-separated emails
    users: Option<String>,
}

impl AnalyticsArgs {
    fn into_query(self) -> AnalyticsQuery {
        let mut query = AnalyticsQuery::new();
        query.start_date = self.start_date;
        query.end_date = self.end_date;
        if let Some(ref users) = self.users {
            query.users = AnalyticsQuery::parse_users(users);
        }
        query
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct OverviewArgs {
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeepDiveArgs {
    email: String,
    #[serde(default)]
    start_date: Option<String>,
}

fn parse_args<T: DeserializeOwned>(args: JsonObject) -> Result<T> {
    serde_json::from_value(JsonValue::Object(args))
        .map_err(|e| Error::Other(format!("Invalid arguments: {e}")))
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// ============================================================================
// Tool Catalog
// ============================================================================

/// Tool name for an analytics metric
pub fn metric_tool_name(metric: AnalyticsMetric) -> &'static str {
    match metric {
        AnalyticsMetric::Dau => "get_dau",
        AnalyticsMetric::Models => "get_model_usage",
        AnalyticsMetric::AgentEdits => "get_agent_edits",
        AnalyticsMetric::Tabs => "get_tabs",
        AnalyticsMetric::Mcp => "get_mcp_usage",
        AnalyticsMetric::TopFileExtensions => "get_file_extensions",
        AnalyticsMetric::ClientVersions => "get_client_versions",
        AnalyticsMetric::Commands => "get_commands",
        AnalyticsMetric::Plans => "get_plans",
    }
}

fn metric_description(metric: AnalyticsMetric) -> &'static str {
    match metric {
        AnalyticsMetric::Dau => {
            "Daily active users over time, with CLI, cloud agent and Bugbot breakdowns."
        }
        AnalyticsMetric::Models => {
            "Model usage per day: messages and users per model, plus period totals."
        }
        AnalyticsMetric::AgentEdits => {
            "Agent edit metrics: suggested, accepted and rejected diffs and lines."
        }
        AnalyticsMetric::Tabs => "Tab completion usage: suggestions shown, accepted and rejected.",
        AnalyticsMetric::Mcp => "MCP tool usage: which servers and tools are used and how often.",
        AnalyticsMetric::TopFileExtensions => {
            "Top file extensions edited with AI, with suggestion and acceptance counts."
        }
        AnalyticsMetric::ClientVersions => {
            "Client version distribution: versions in use and share of users on each."
        }
        AnalyticsMetric::Commands => "Command usage: which commands are used and how often.",
        AnalyticsMetric::Plans => "Plan mode adoption: models used in plan mode and how often.",
    }
}

fn tool(name: &str, description: &str, properties: JsonValue, required: &[&str]) -> JsonValue {
    json!({
        "name": name,
        "description": description,
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required,
        }
    })
}

fn window_properties() -> JsonValue {
    json!({
        "startDate": {"type": "number", "description": "Start date as Unix timestamp in milliseconds"},
        "endDate": {"type": "number", "description": "End date as Unix timestamp in milliseconds"},
        "page": {"type": "number", "description": "Page number (default: 1)"},
    })
}

/// Every tool with its input schema
pub fn tool_definitions() -> Vec<JsonValue> {
    let mut tools = vec![
        tool(
            "get_team_members",
            "List all team members with their role and whether they have been removed.",
            json!({}),
            &[],
        ),
        tool(
            "get_spending",
            "Current billing cycle spend per member: dollars, included spend, premium requests and limits.",
            json!({
                "page": {"type": "number", "description": "Page number (default: 1)"},
                "allPages": {"type": "boolean", "description": "Fetch all pages and summarize (default: false)"},
            }),
            &[],
        ),
    ];

    let mut daily = window_properties();
    daily["pageSize"] = json!({"type": "number", "description": "Results per page (default: 100)"});
    daily["allPages"] =
        json!({"type": "boolean", "description": "Fetch all pages automatically (default: false)"});
    tools.push(tool(
        "get_daily_usage",
        "Daily usage per user: lines, applies, accepts, tabs, requests by mode and models used.",
        daily,
        &[],
    ));

    tools.push(tool(
        "get_billing_groups",
        "Billing groups with members, group spend, daily spend and billing cycle dates.",
        json!({}),
        &[],
    ));

    let mut events = window_properties();
    events["email"] = json!({"type": "string", "description": "Filter by user email"});
    events["pageSize"] =
        json!({"type": "number", "description": "Results per page (default: 500, max: 500)"});
    tools.push(tool(
        "get_usage_events",
        "Per-request usage events with model, tokens, cost and chargeability.",
        events,
        &[],
    ));

    tools.push(tool(
        "set_spend_limit",
        "Set a hard spend limit in dollars for a team member. The member is blocked once it is reached.",
        json!({
            "email": {"type": "string", "description": "User email"},
            "limitDollars": {"type": "number", "description": "Hard limit in dollars (0 removes the limit)"},
        }),
        &["email", "limitDollars"],
    ));

    let analytics_properties = json!({
        "startDate": {"type": "string", "description": "YYYY-MM-DD, 7d, 30d, today or yesterday (default: 30d)"},
        "endDate": {"type": "string", "description": "YYYY-MM-DD, today or yesterday (default: today)"},
        "users": {"type": "string", "description": "Comma-separated emails to filter by"},
    });
    for metric in AnalyticsMetric::ALL {
        tools.push(tool(
            metric_tool_name(metric),
            metric_description(metric),
            analytics_properties.clone(),
            &[],
        ));
    }

    tools.push(tool(
        "get_team_overview",
        "Team overview: members, total spend, top spenders, latest DAU and most used models.",
        json!({
            "startDate": {"type": "string", "description": "Analytics window start (default: 7d)"},
            "endDate": {"type": "string", "description": "Analytics window end (default: today)"},
        }),
        &[],
    ));
    tools.push(tool(
        "get_user_deep_dive",
        "One member's spend, daily activity, model preferences and recent requests.",
        json!({
            "email": {"type": "string", "description": "User email"},
            "startDate": {"type": "string", "description": "Daily usage start, YYYY-MM-DD (default: 7 days ago)"},
        }),
        &["email"],
    ));

    tools
}

// ============================================================================
// Server
// ============================================================================

/// Tool dispatcher over one resource client
pub struct ToolServer {
    api: CursorApi,
}

impl ToolServer {
    /// Create a server
    pub fn new(api: CursorApi) -> Self {
        Self { api }
    }

    /// Handle one message; `None` for notifications
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!("Notification: {}", request.method);
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": crate::NAME,
                        "version": crate::VERSION,
                    }
                }),
            ),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tool_call(id, request.params).await,
            "ping" => JsonRpcResponse::success(id, json!({})),
            other => JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
        };
        Some(response)
    }

    async fn handle_tool_call(&self, id: JsonValue, params: Option<JsonValue>) -> JsonRpcResponse {
        let Some(JsonValue::Object(mut params)) = params else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params");
        };
        let Some(JsonValue::String(name)) = params.remove("name") else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing tool name");
        };
        let arguments = match params.remove("arguments") {
            Some(JsonValue::Object(args)) => args,
            _ => JsonObject::new(),
        };

        info!("Tool call: {}", name);
        match self.call_tool(&name, arguments).await {
            Ok(text) => JsonRpcResponse::success(
                id,
                json!({ "content": [{"type": "text", "text": text}] }),
            ),
            Err(e) => {
                if e.is_upstream() {
                    warn!("Tool {} failed upstream: {}", name, e);
                } else {
                    debug!("Tool {} rejected: {}", name, e);
                }
                JsonRpcResponse::success(
                    id,
                    json!({
                        "content": [{"type": "text", "text": format!("Error: {e}")}],
                        "isError": true
                    }),
                )
            }
        }
    }

    /// Run one tool and render its text result
    pub async fn call_tool(&self, name: &str, args: JsonObject) -> Result<String> {
        if let Some(metric) = AnalyticsMetric::ALL
            .into_iter()
            .find(|m| metric_tool_name(*m) == name)
        {
            let query = parse_args::<AnalyticsArgs>(args)?.into_query();
            return self.analytics(metric, &query).await;
        }

        match name {
            "get_team_members" => Ok(report::team_roster(&self.api.team_members().await?)),
            "get_spending" => {
                let args: SpendingArgs = parse_args(args)?;
                if args.all_pages {
                    Ok(report::spend_summary(&self.api.all_spending().await?))
                } else {
                    let page = self
                        .api
                        .spending(SpendQuery {
                            page: args.page,
                            page_size: None,
                        })
                        .await?;
                    pretty(&page)
                }
            }
            "get_daily_usage" => {
                let args: DailyUsageArgs = parse_args(args)?;
                let query = DailyUsageQuery {
                    start_date: args.start_date,
                    end_date: args.end_date,
                    page: args.page,
                    page_size: args.page_size,
                };
                if args.all_pages {
                    let entries = self.api.all_daily_usage(query).await?;
                    pretty(&report::daily_usage_digest(&entries))
                } else {
                    pretty(&self.api.daily_usage(query).await?)
                }
            }
            "get_billing_groups" => Ok(report::billing_groups(&self.api.billing_groups().await?)),
            "get_usage_events" => {
                let args: UsageEventsArgs = parse_args(args)?;
                let page = self
                    .api
                    .usage_events(&UsageEventsQuery {
                        email: args.email,
                        start_date: args.start_date,
                        end_date: args.end_date,
                        page: args.page,
                        page_size: args.page_size,
                    })
                    .await?;
                pretty(&report::usage_events_digest(&page))
            }
            "set_spend_limit" => {
                let args: SpendLimitArgs = parse_args(args)?;
                self.api
                    .set_user_spend_limit(&args.email, args.limit_dollars)
                    .await?;
                Ok(report::spend_limit_message(&args.email, args.limit_dollars))
            }
            "get_team_overview" => {
                let args: OverviewArgs = parse_args(args)?;
                report::team_overview(&self.api, args.start_date, args.end_date).await
            }
            "get_user_deep_dive" => {
                let args: DeepDiveArgs = parse_args(args)?;
                report::user_deep_dive(
                    &self.api,
                    &args.email,
                    args.start_date.as_deref(),
                    Utc::now(),
                )
                .await
            }
            _ => Err(Error::Other(format!("Unknown tool: {name}"))),
        }
    }

    async fn analytics(&self, metric: AnalyticsMetric, query: &AnalyticsQuery) -> Result<String> {
        if metric == AnalyticsMetric::Models {
            let result = self.api.model_usage(query).await?;
            return report::model_usage_summary(&result.data);
        }
        let result = self.api.analytics::<JsonValue>(metric, query).await?;
        pretty(&result.data)
    }

    /// Serve requests from `reader` until end of input
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => Some(JsonRpcResponse::failure(
                    JsonValue::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                )),
            };

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }
}

/// Serve the tools on stdin/stdout
pub async fn serve_stdio(api: CursorApi) -> Result<()> {
    info!("Serving {} tools over stdio", tool_definitions().len());
    let server = ToolServer::new(api);
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

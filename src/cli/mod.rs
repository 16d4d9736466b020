//! CLI module
//!
//! Command-line interface over the resource layer.
//!
//! # Commands
//!
//! - `members`, `spending`, `daily-usage`, `groups`, `events` - admin listings
//! - `set-limit` - change a member's hard spend limit
//! - `analytics <metric>` - one analytics breakdown
//! - `overview`, `user` - composite views
//! - `serve` - JSON-RPC tool server on stdio

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, MillisWindow, OutputFormat, Paging};
pub use runner::{Output, Runner};
pub use server::{
    metric_tool_name, serve_stdio, tool_definitions, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ToolServer, PROTOCOL_VERSION,
};

// Tool registry and dispatch for the MCP surface

pub mod health;

use serde_json::{json, Map, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::ads_client::AdsApi;
use crate::auth::EnvSource;

pub const CHECK_CONNECTION: &str = "check_connection";

/// Collaborators shared by every tool call
///
/// Contains no session state; each call authenticates on its own.
#[derive(Clone)]
pub struct ToolContext {
    pub api: Arc<dyn AdsApi>,
    pub env: Arc<dyn EnvSource>,
}

pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Text content returned from a tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: CHECK_CONNECTION,
        description: "Test Google Ads API authentication and return connection status. \
                      Returns JSON with the connection status and the customer accounts \
                      accessible with the configured credentials.",
        input_schema: json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        }),
    }]
}

/// Run a tool by name
///
/// Configuration errors become an error output; unknown names are a
/// protocol-level error.
pub async fn call_tool(
    ctx: &ToolContext,
    name: &str,
    _args: &Map<String, Value>,
) -> Result<ToolOutput, ToolError> {
    match name {
        CHECK_CONNECTION => {
            tracing::info!(tool = name, "Tool call");
            let output = match health::check_connection(ctx).await {
                Ok(status) => ToolOutput {
                    text: serde_json::to_string_pretty(&status).unwrap_or_default(),
                    is_error: false,
                },
                Err(e) => {
                    tracing::error!(code = e.code(), "Configuration error: {}", e);
                    ToolOutput {
                        text: format!("Configuration error ({}): {}", e.code(), e),
                        is_error: true,
                    }
                }
            };
            Ok(output)
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

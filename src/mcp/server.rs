use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::tools::{self, ToolContext, ToolError};

use super::protocol::{
    error_response, negotiate_protocol_version, success_response, RpcError, SERVER_NAME,
};

/// MCP server exposing the Google Ads tools
pub struct McpServer {
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Serve on stdin/stdout until the client closes stdin
    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Serve newline-delimited JSON-RPC messages until EOF
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read MCP message")?
        {
            if line.trim().is_empty() {
                continue;
            }

            for response in self.handle_line(&line).await {
                let mut encoded = serde_json::to_string(&response)?;
                encoded.push('\n');
                writer
                    .write_all(encoded.as_bytes())
                    .await
                    .context("Failed to write MCP response")?;
                writer.flush().await?;
            }
        }

        tracing::info!("Client closed the connection");
        Ok(())
    }

    /// Handle one raw line, returning the responses to write
    pub async fn handle_line(&self, line: &str) -> Vec<Value> {
        match serde_json::from_str::<Value>(line) {
            Ok(message) => self.handle_message(message).await,
            Err(e) => vec![error_response(
                Value::Null,
                RpcError::parse_error(format!("Parse error: {}", e)),
            )],
        }
    }

    /// Handle a single message or a batch
    pub async fn handle_message(&self, incoming: Value) -> Vec<Value> {
        let mut responses = Vec::new();

        if let Some(batch) = incoming.as_array() {
            if batch.is_empty() {
                responses.push(error_response(
                    Value::Null,
                    RpcError::invalid_request("Batch request must not be empty"),
                ));
                return responses;
            }
            for item in batch {
                if let Some(response) = self.handle_single_message(item.clone()).await {
                    responses.push(response);
                }
            }
            return responses;
        }

        if let Some(response) = self.handle_single_message(incoming).await {
            responses.push(response);
        }
        responses
    }

    async fn handle_single_message(&self, incoming: Value) -> Option<Value> {
        let Some(obj) = incoming.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            let id = obj.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(
                id,
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        let Some(method) = obj.get("method").and_then(Value::as_str) else {
            // Client responses carry result/error; this server never sends requests
            if obj.contains_key("result") || obj.contains_key("error") {
                return None;
            }
            let id = obj.get("id").cloned()?;
            return Some(error_response(
                id,
                RpcError::invalid_request("Request must include a string 'method'"),
            ));
        };

        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        match obj.get("id").cloned() {
            Some(id) => {
                tracing::debug!(method = method, id = %id, "MCP request");
                Some(match self.handle_request(method, params).await {
                    Ok(result) => success_response(id, result),
                    Err(err) => error_response(id, err),
                })
            }
            None => {
                tracing::debug!(method = method, "MCP notification");
                None
            }
        }
    }

    async fn handle_request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list_payload()),
            "tools/call" => self.handle_tools_call(params).await,
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self, params: &Value) -> Value {
        let requested = params.get("protocolVersion").and_then(Value::as_str);
        json!({
            "protocolVersion": negotiate_protocol_version(requested),
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": "Call check_connection to verify Google Ads credentials and list the accessible customer accounts."
        })
    }

    fn tools_list_payload(&self) -> Value {
        let tools: Vec<Value> = tools::tool_definitions()
            .into_iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "inputSchema": tool.input_schema,
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn handle_tools_call(&self, params: Value) -> Result<Value, RpcError> {
        let params = params
            .as_object()
            .ok_or_else(|| RpcError::invalid_params("tools/call params must be an object"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("tools/call requires string field 'name'"))?;

        let args = match params.get("arguments") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call 'arguments' must be an object",
                ));
            }
        };

        let output = tools::call_tool(&self.ctx, name, &args)
            .await
            .map_err(|e| match e {
                ToolError::UnknownTool(_) => RpcError::invalid_params(e.to_string()),
            })?;

        Ok(json!({
            "content": [
                {
                    "type": "text",
                    "text": output.text,
                }
            ],
            "isError": output.is_error,
        }))
    }
}

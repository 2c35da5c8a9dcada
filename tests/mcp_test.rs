// MCP protocol tests
//
// Drive the JSON-RPC dispatch directly and through the line-based transport.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::BufReader;

use google_ads_mcp::{
    ads_client::AdsApi,
    auth::{AccessToken, Credentials, MapEnv},
    error::AdsError,
    mcp::{McpServer, SERVER_NAME},
    tools::ToolContext,
};

// ==================================================================================================
// Test Helpers
// ==================================================================================================

struct StaticAdsApi {
    customers: Vec<String>,
}

#[async_trait]
impl AdsApi for StaticAdsApi {
    async fn authenticate(&self, _creds: &Credentials) -> Result<AccessToken, AdsError> {
        Ok(AccessToken {
            secret: "ya29.static".to_string(),
            token_type: "Bearer".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        })
    }

    async fn list_accessible_customers(
        &self,
        _token: &AccessToken,
        _creds: &Credentials,
    ) -> Result<Vec<String>, AdsError> {
        Ok(self.customers.clone())
    }
}

fn full_env() -> MapEnv {
    MapEnv::new()
        .with("GOOGLE_ADS_DEVELOPER_TOKEN", "dev-token")
        .with("GOOGLE_CLIENT_ID", "client-id")
        .with("GOOGLE_CLIENT_SECRET", "client-secret")
        .with("GOOGLE_ADS_REFRESH_TOKEN", "refresh-token")
}

fn server_with_env(env: MapEnv) -> McpServer {
    McpServer::new(ToolContext {
        api: Arc::new(StaticAdsApi {
            customers: vec![
                "customers/1111111111".to_string(),
                "customers/2222222222".to_string(),
            ],
        }),
        env: Arc::new(env),
    })
}

async fn request(server: &McpServer, message: Value) -> Value {
    let mut responses = server.handle_message(message).await;
    assert_eq!(responses.len(), 1, "expected exactly one response");
    responses.remove(0)
}

fn call_check_connection(id: i64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": "check_connection", "arguments": {} }
    })
}

// ==================================================================================================
// Lifecycle Tests
// ==================================================================================================

#[tokio::test]
async fn test_initialize() {
    let server = server_with_env(full_env());

    let response = request(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "test-client", "version": "1.0" }
            }
        }),
    )
    .await;

    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
    assert!(response["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_ping() {
    let server = server_with_env(full_env());
    let response = request(&server, json!({"jsonrpc": "2.0", "id": "p", "method": "ping"})).await;
    assert_eq!(response, json!({"jsonrpc": "2.0", "id": "p", "result": {}}));
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let server = server_with_env(full_env());
    let responses = server
        .handle_message(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .await;
    assert!(responses.is_empty());
}

#[tokio::test]
async fn test_tools_list() {
    let server = server_with_env(full_env());

    let response = request(&server, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await;

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "check_connection");
    assert_eq!(tools[0]["inputSchema"]["type"], "object");
    assert!(tools[0]["description"].as_str().unwrap().contains("Google Ads"));
}

// ==================================================================================================
// Tool Call Tests
// ==================================================================================================

#[tokio::test]
async fn test_check_connection_success() {
    let server = server_with_env(full_env().with("GOOGLE_ADS_MCC_ID", "123-456-7890"));

    let response = request(&server, call_check_connection(3)).await;

    let result = &response["result"];
    assert_eq!(result["isError"], false);
    assert_eq!(result["content"][0]["type"], "text");

    let status: Value =
        serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(status["status"], "connected");
    assert_eq!(status["authentication_method"], "refresh_token");
    assert_eq!(status["mcc_account"], "1234567890");
    assert_eq!(status["total_accessible_customers"], 2);
    assert_eq!(status["accessible_customers"][1]["customer_id"], "2222222222");
    assert!(status.get("error_type").is_none());
}

#[tokio::test]
async fn test_check_connection_config_error_is_tool_failure() {
    let server = server_with_env(MapEnv::new());

    let response = request(&server, call_check_connection(4)).await;

    let result = &response["result"];
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("missing_developer_token"));
    assert!(text.contains("GOOGLE_ADS_DEVELOPER_TOKEN"));
}

#[tokio::test]
async fn test_check_connection_without_arguments() {
    let server = server_with_env(full_env());

    let response = request(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "check_connection" }
        }),
    )
    .await;

    assert_eq!(response["result"]["isError"], false);
}

#[tokio::test]
async fn test_unknown_tool() {
    let server = server_with_env(full_env());

    let response = request(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": { "name": "execute_gaql_query", "arguments": {} }
        }),
    )
    .await;

    assert_eq!(response["error"]["code"], -32602);
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("execute_gaql_query"));
}

#[tokio::test]
async fn test_tools_call_rejects_non_object_arguments() {
    let server = server_with_env(full_env());

    let response = request(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": "check_connection", "arguments": [1, 2] }
        }),
    )
    .await;

    assert_eq!(response["error"]["code"], -32602);
}

// ==================================================================================================
// Protocol Error Tests
// ==================================================================================================

#[tokio::test]
async fn test_unknown_method() {
    let server = server_with_env(full_env());
    let response = request(&server, json!({"jsonrpc": "2.0", "id": 8, "method": "resources/list"})).await;
    assert_eq!(response["error"]["code"], -32601);
}

#[tokio::test]
async fn test_wrong_jsonrpc_version() {
    let server = server_with_env(full_env());
    let response = request(&server, json!({"jsonrpc": "1.0", "id": 9, "method": "ping"})).await;
    assert_eq!(response["id"], 9);
    assert_eq!(response["error"]["code"], -32600);
}

#[tokio::test]
async fn test_request_without_method() {
    let server = server_with_env(full_env());

    let response = request(&server, json!({"jsonrpc": "2.0", "id": 1})).await;
    assert_eq!(response["id"], 1);
    assert_eq!(response["error"]["code"], -32600);

    let response = request(&server, json!({"jsonrpc": "2.0", "id": "x", "method": 7})).await;
    assert_eq!(response["id"], "x");
    assert_eq!(response["error"]["code"], -32600);

    // Client responses are consumed silently
    let responses = server
        .handle_message(json!({"jsonrpc": "2.0", "id": 1, "result": {}}))
        .await;
    assert!(responses.is_empty());
    let responses = server
        .handle_message(json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -1, "message": "x"}}))
        .await;
    assert!(responses.is_empty());
}

#[tokio::test]
async fn test_parse_error() {
    let server = server_with_env(full_env());
    let responses = server.handle_line("{not json").await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[0]["error"]["code"], -32700);
}

#[tokio::test]
async fn test_batch_request() {
    let server = server_with_env(full_env());

    let responses = server
        .handle_message(json!([
            {"jsonrpc": "2.0", "id": 10, "method": "ping"},
            {"jsonrpc": "2.0", "method": "notifications/initialized"},
            {"jsonrpc": "2.0", "id": 11, "method": "tools/list"}
        ]))
        .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 10);
    assert_eq!(responses[1]["id"], 11);

    let responses = server.handle_message(json!([])).await;
    assert_eq!(responses[0]["error"]["code"], -32600);
}

// ==================================================================================================
// Transport Tests
// ==================================================================================================

#[tokio::test]
async fn test_serve_line_delimited_stream() {
    let server = server_with_env(full_env());

    // The second message arrives split across reads
    let input = tokio_test::io::Builder::new()
        .read(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n\n")
        .read(b"{\"jsonrpc\":\"2.0\",\"id\":2,")
        .read(b"\"method\":\"tools/list\"}\n")
        .read(b"{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n")
        .build();

    let mut output: Vec<u8> = Vec::new();
    server
        .serve(BufReader::new(input), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], json!({"jsonrpc": "2.0", "id": 1, "result": {}}));
    assert_eq!(lines[1]["id"], 2);
    assert_eq!(lines[1]["result"]["tools"][0]["name"], "check_connection");
}

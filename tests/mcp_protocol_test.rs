// ABOUTME: Integration tests for JSON-RPC routing and the stdio transport
// ABOUTME: Covers initialize, tools/list, tools/call, protocol errors, and notifications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{processor_with, FixtureProvider};
use nightscout_core::errors::AppError;
use nightscout_core::models::{Reading, TrendDirection};
use nightscout_mcp_server::jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse};
use nightscout_mcp_server::mcp::StdioTransport;
use serde_json::{json, Value};
use tokio::io::BufReader;

fn fresh_provider() -> Arc<FixtureProvider> {
    let reading = Reading::new(Utc::now() - Duration::minutes(3), 112.0)
        .with_direction(TrendDirection::Flat);
    Arc::new(FixtureProvider::with_readings(vec![reading]))
}

async fn send(provider: Arc<FixtureProvider>, message: &Value) -> JsonRpcResponse {
    processor_with(provider)
        .handle_line(&message.to_string())
        .await
        .expect("request should produce a response")
}

fn error_code(response: &JsonRpcResponse) -> i32 {
    assert!(response.is_error());
    response.error.as_ref().expect("expected an error").code
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_initialize_reports_server_identity() {
    let response = send(
        fresh_provider(),
        &json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "clientInfo": { "name": "test-client", "version": "1.0" }
            }
        }),
    )
    .await;

    let result = response.result.unwrap();
    assert_eq!(response.id, Some(json!(1)));
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "nightscout");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_ping_returns_empty_object() {
    let response = send(
        fresh_provider(),
        &json!({ "jsonrpc": "2.0", "id": "p-1", "method": "ping" }),
    )
    .await;
    assert_eq!(response.id, Some(json!("p-1")));
    assert_eq!(response.result, Some(json!({})));
}

#[tokio::test]
async fn test_notifications_get_no_response() {
    let processor = processor_with(fresh_provider());
    let response = processor
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(response.is_none());
    assert!(processor.handle_line("   ").await.is_none());
}

#[tokio::test]
async fn test_typed_requests() {
    let processor = processor_with(fresh_provider());

    let response = processor
        .handle_request(JsonRpcRequest::new("ping", None))
        .await
        .unwrap();
    assert_eq!(response.id, Some(json!(1)));
    assert!(response.is_success());

    let response = processor
        .handle_request(JsonRpcRequest::with_id(
            "tools/call",
            Some(json!({ "name": "status" })),
            json!("abc"),
        ))
        .await
        .unwrap();
    assert_eq!(response.id, Some(json!("abc")));
    assert_eq!(response.result.unwrap()["isError"], false);

    let notification = JsonRpcRequest::notification("notifications/cancelled", None);
    assert!(processor.handle_request(notification).await.is_none());
}

#[tokio::test]
async fn test_empty_resource_and_prompt_lists() {
    let resources = send(
        fresh_provider(),
        &json!({ "jsonrpc": "2.0", "id": 2, "method": "resources/list" }),
    )
    .await;
    assert_eq!(resources.result.unwrap()["resources"], json!([]));

    let prompts = send(
        fresh_provider(),
        &json!({ "jsonrpc": "2.0", "id": 3, "method": "prompts/list" }),
    )
    .await;
    assert_eq!(prompts.result.unwrap()["prompts"], json!([]));
}

// ============================================================================
// tools/list
// ============================================================================

#[tokio::test]
async fn test_tools_list_advertises_seven_tools() {
    let response = send(
        fresh_provider(),
        &json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/list" }),
    )
    .await;

    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "analyze",
            "analyze_monthly",
            "devices",
            "glucose_current",
            "glucose_history",
            "status",
            "treatments",
        ]
    );

    let monthly = tools.iter().find(|t| t["name"] == "analyze_monthly").unwrap();
    assert_eq!(monthly["inputSchema"]["type"], "object");
    assert_eq!(monthly["inputSchema"]["required"], json!(["year"]));

    let history = tools.iter().find(|t| t["name"] == "glucose_history").unwrap();
    assert_eq!(history["inputSchema"]["properties"]["hours"]["maximum"], 720);
}

// ============================================================================
// tools/call
// ============================================================================

#[tokio::test]
async fn test_tools_call_returns_text_and_structured_content() {
    let response = send(
        fresh_provider(),
        &json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "glucose_current", "arguments": {} }
        }),
    )
    .await;

    let result = response.result.unwrap();
    assert_eq!(result["isError"], false);
    assert_eq!(result["content"][0]["type"], "text");
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("112 mg/dL"), "unexpected text: {text}");
    assert_eq!(result["structuredContent"]["reading"]["value_mgdl"], 112.0);
}

#[tokio::test]
async fn test_tools_call_without_arguments_uses_defaults() {
    let response = send(
        fresh_provider(),
        &json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": { "name": "glucose_history" }
        }),
    )
    .await;
    let result = response.result.unwrap();
    assert_eq!(result["isError"], false);
    assert_eq!(result["structuredContent"]["hours"], 6);
}

#[tokio::test]
async fn test_validation_failure_is_a_tool_error_without_upstream_call() {
    let provider = fresh_provider();
    let response = send(
        Arc::clone(&provider),
        &json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": "glucose_history", "arguments": { "hours": 0 } }
        }),
    )
    .await;

    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    assert_eq!(
        result["structuredContent"]["error"]["category"],
        "validation"
    );
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Error (validation)"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_transport_failure_is_reported_as_tool_error() {
    let provider = Arc::new(FixtureProvider::failing(|| {
        AppError::external_service("Nightscout", "connection refused")
    }));
    let response = send(
        provider,
        &json!({
            "jsonrpc": "2.0",
            "id": 8,
            "method": "tools/call",
            "params": { "name": "status", "arguments": {} }
        }),
    )
    .await;

    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    assert_eq!(result["structuredContent"]["error"]["category"], "transport");
}

#[tokio::test]
async fn test_unknown_tool_is_invalid_params() {
    let response = send(
        fresh_provider(),
        &json!({
            "jsonrpc": "2.0",
            "id": 9,
            "method": "tools/call",
            "params": { "name": "glucose_forecast", "arguments": {} }
        }),
    )
    .await;

    assert_eq!(error_code(&response), error_codes::INVALID_PARAMS);
    let data = response.error.unwrap().data.unwrap();
    assert_eq!(data["available_tools"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_tools_call_without_params_is_invalid_params() {
    let response = send(
        fresh_provider(),
        &json!({ "jsonrpc": "2.0", "id": 10, "method": "tools/call" }),
    )
    .await;
    assert_eq!(error_code(&response), error_codes::INVALID_PARAMS);
}

// ============================================================================
// Protocol errors
// ============================================================================

#[tokio::test]
async fn test_unknown_method() {
    let response = send(
        fresh_provider(),
        &json!({ "jsonrpc": "2.0", "id": 11, "method": "sampling/createMessage" }),
    )
    .await;
    assert_eq!(error_code(&response), error_codes::METHOD_NOT_FOUND);
    assert_eq!(response.id, Some(json!(11)));
}

#[tokio::test]
async fn test_wrong_jsonrpc_version() {
    let response = send(
        fresh_provider(),
        &json!({ "jsonrpc": "1.0", "id": 12, "method": "ping" }),
    )
    .await;
    assert_eq!(error_code(&response), error_codes::INVALID_REQUEST);
}

#[tokio::test]
async fn test_malformed_request_keeps_id() {
    let response = send(fresh_provider(), &json!({ "jsonrpc": "2.0", "id": 13 })).await;
    assert_eq!(error_code(&response), error_codes::INVALID_REQUEST);
    assert_eq!(response.id, Some(json!(13)));
}

#[tokio::test]
async fn test_unparseable_line_is_parse_error() {
    let response = processor_with(fresh_provider())
        .handle_line("{not json")
        .await
        .unwrap();
    assert_eq!(error_code(&response), error_codes::PARSE_ERROR);
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_serve_writes_one_line_per_response() {
    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "garbage",
        r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#,
    ]
    .join("\n");

    let transport = StdioTransport::new(processor_with(fresh_provider()));
    let mut output = Vec::new();
    transport
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[1]["id"], 2);
    assert_eq!(lines[2]["error"]["code"], error_codes::PARSE_ERROR);
    assert_eq!(lines[2]["id"], Value::Null);
    assert_eq!(lines[3]["id"], 3);
}

#[tokio::test]
async fn test_serve_survives_line_that_is_not_utf8() {
    let mut input = br#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#.to_vec();
    input.push(b'\n');
    input.extend_from_slice(&[0xff, 0xfe, b'x', b'\n']);
    input.extend_from_slice(br#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#);

    let transport = StdioTransport::new(processor_with(fresh_provider()));
    let mut output = Vec::new();
    transport
        .serve(BufReader::new(input.as_slice()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["id"], 1);
    assert_eq!(lines[1]["error"]["code"], error_codes::PARSE_ERROR);
    assert_eq!(lines[2]["id"], 2);
}

// ABOUTME: MCP request processing and protocol handling
// ABOUTME: Validates, routes, and executes MCP protocol requests with proper error handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::jsonrpc::{error_codes, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use crate::logging::AppLogger;
use crate::tools::{ToolExecutionContext, ToolRegistry, ToolResult};

use super::resources::ServerResources;
use super::schema::{InitializeResponse, ToolCall};

/// Processes MCP protocol requests with validation, routing, and execution
pub struct McpRequestProcessor {
    resources: Arc<ServerResources>,
    registry: Arc<ToolRegistry>,
}

impl McpRequestProcessor {
    /// Create a new MCP request processor
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            resources,
            registry,
        }
    }

    /// Processor with every built-in tool registered
    #[must_use]
    pub fn with_builtin_tools(resources: Arc<ServerResources>) -> Self {
        Self::new(resources, Arc::new(ToolRegistry::with_builtin_tools()))
    }

    /// Registered tools
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handle one raw line from the transport
    ///
    /// Returns `None` for notifications and blank lines.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let message: Value = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Invalid JSON-RPC message: {}", e);
                return Some(JsonRpcResponse::parse_error(e.to_string()));
            }
        };

        let id = message.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(message) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Malformed JSON-RPC request: {}", e);
                Some(JsonRpcResponse::error_with_data(
                    Some(id.unwrap_or(Value::Null)),
                    error_codes::INVALID_REQUEST,
                    "Invalid Request",
                    Value::String(e.to_string()),
                ))
            }
        }
    }

    /// Handle an MCP request and return a response
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let start_time = Instant::now();
        debug!(method = %request.method, id = ?request.id, "MCP request received");

        if request.is_notification() {
            Self::handle_notification(&request);
            return None;
        }

        let response = match Self::validate_request(&request) {
            Ok(()) => self.route(&request).await,
            Err(e) => JsonRpcResponse::error(request.id.clone(), error_codes::INVALID_REQUEST, e.message),
        };

        debug!(
            method = %request.method,
            elapsed_ms = start_time.elapsed().as_millis(),
            success = response.is_success(),
            "MCP request completed"
        );
        Some(response)
    }

    async fn route(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id.clone(), json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            "resources/list" => {
                JsonRpcResponse::success(request.id.clone(), json!({ "resources": [] }))
            }
            "prompts/list" => JsonRpcResponse::success(request.id.clone(), json!({ "prompts": [] })),
            _ => Self::handle_unknown_method(request),
        }
    }

    /// Validate MCP request format and required fields
    fn validate_request(request: &JsonRpcRequest) -> AppResult<()> {
        if request.jsonrpc != JSONRPC_VERSION {
            return Err(AppError::invalid_input(format!(
                "Invalid JSON-RPC version: got '{}', expected '{}'",
                request.jsonrpc, JSONRPC_VERSION
            )));
        }

        if request.method.is_empty() {
            return Err(AppError::invalid_input("Missing method"));
        }

        Ok(())
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let protocol = &self.resources.config.protocol;
        let client = request
            .params
            .as_ref()
            .and_then(|params| params.get("clientInfo"))
            .and_then(|info| info.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        debug!(client, "Handling initialize request");

        let response = InitializeResponse::new(
            protocol.mcp_version.clone(),
            protocol.server_name.clone(),
            protocol.server_version.clone(),
        );
        match serde_json::to_value(&response) {
            Ok(result) => JsonRpcResponse::success(request.id.clone(), result),
            Err(e) => JsonRpcResponse::error(
                request.id.clone(),
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize initialize response: {e}"),
            ),
        }
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling tools/list request");
        JsonRpcResponse::success(
            request.id.clone(),
            json!({ "tools": self.registry.all_schemas() }),
        )
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        let Some(params) = request.params.clone() else {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_PARAMS,
                "Missing parameters for tools/call",
            );
        };
        let call: ToolCall = match serde_json::from_value(params) {
            Ok(call) => call,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid tools/call parameters: {e}"),
                );
            }
        };

        if !self.registry.contains(&call.name) {
            warn!("Unknown tool requested: {}", call.name);
            return JsonRpcResponse::error_with_data(
                id,
                error_codes::INVALID_PARAMS,
                format!("Unknown tool: {}", call.name),
                json!({ "available_tools": self.registry.tool_names() }),
            );
        }

        let context = ToolExecutionContext::new(Arc::clone(&self.resources))
            .with_request_id(id.clone());
        let started = Instant::now();
        let outcome = self
            .registry
            .execute(&call.name, call.arguments.unwrap_or(Value::Null), &context)
            .await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let result = match outcome {
            Ok(result) => {
                AppLogger::log_tool_call(&call.name, !result.is_error, duration_ms);
                result
            }
            Err(error) => {
                AppLogger::log_tool_call(&call.name, false, duration_ms);
                let summary = error.to_json();
                AppLogger::log_tool_failure(
                    &call.name,
                    summary["code"].as_str().unwrap_or_default(),
                    error.category().as_str(),
                    &error.message,
                );
                ToolResult::from_error(&error)
            }
        };

        match serde_json::to_value(result.into_response()) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to serialize tool result: {e}"),
            ),
        }
    }

    /// Handle unknown method
    fn handle_unknown_method(request: &JsonRpcRequest) -> JsonRpcResponse {
        warn!("Unknown MCP method: {}", request.method);
        JsonRpcResponse::error(
            request.id.clone(),
            error_codes::METHOD_NOT_FOUND,
            format!("Unknown method: {}", request.method),
        )
    }

    /// Handle notification (no response required)
    fn handle_notification(request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" => debug!("Client initialized"),
            "notifications/cancelled" => debug!("Request cancelled notification received"),
            method => debug!("Ignoring notification: {}", method),
        }
    }
}

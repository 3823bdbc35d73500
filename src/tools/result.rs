// ABOUTME: ToolResult type returned by tool execution
// ABOUTME: Pairs a human-readable summary with the structured JSON payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use serde_json::Value;

use crate::errors::AppError;
use crate::mcp::schema::{Content, ToolResponse};

/// Result returned from tool execution
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Structured payload (`structuredContent`)
    pub content: Value,
    /// Text rendering for the model; defaults to pretty-printed `content`
    pub text: Option<String>,
    /// Whether this result represents an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result with structured content only
    #[must_use]
    pub const fn ok(content: Value) -> Self {
        Self {
            content,
            text: None,
            is_error: false,
        }
    }

    /// Create a successful result with a text summary
    #[must_use]
    pub fn with_text(text: impl Into<String>, content: Value) -> Self {
        Self {
            content,
            text: Some(text.into()),
            is_error: false,
        }
    }

    /// Error result carrying the code, category and message of `error`
    #[must_use]
    pub fn from_error(error: &AppError) -> Self {
        Self {
            content: serde_json::json!({ "error": error.to_json() }),
            text: Some(format!("Error ({}): {}", error.category(), error.message)),
            is_error: true,
        }
    }

    /// Convert into the MCP `tools/call` result shape
    #[must_use]
    pub fn into_response(self) -> ToolResponse {
        let text = self.text.unwrap_or_else(|| {
            serde_json::to_string_pretty(&self.content).unwrap_or_else(|_| self.content.to_string())
        });
        ToolResponse {
            content: vec![Content::Text { text }],
            is_error: self.is_error,
            structured_content: Some(self.content),
        }
    }
}

impl Default for ToolResult {
    fn default() -> Self {
        Self::ok(Value::Null)
    }
}

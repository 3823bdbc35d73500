// ABOUTME: Defines the McpTool trait and ToolCapabilities for the pluggable tools architecture.
// ABOUTME: Tools implement this trait to be registered and executed via the ToolRegistry.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # MCP Tool Trait and Capabilities
//!
//! All tools implement the `McpTool` trait which provides:
//! - Tool metadata (name, description, input schema)
//! - Capability flags reported at registration
//! - Async execution with context
//!
//! The design mirrors the `NightscoutProvider` trait so both seams can be
//! replaced in tests.

use async_trait::async_trait;
use bitflags::bitflags;
use serde_json::Value;

use crate::errors::AppResult;
use crate::mcp::schema::JsonSchema;

use super::context::ToolExecutionContext;
use super::result::ToolResult;

bitflags! {
    /// Capabilities that tools declare, logged when they are registered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ToolCapabilities: u8 {
        /// Tool reads sensor glucose entries
        const READS_GLUCOSE = 0b0000_0001;
        /// Tool reads the treatments log
        const READS_TREATMENTS = 0b0000_0010;
        /// Tool reads device status records
        const READS_DEVICES = 0b0000_0100;
        /// Tool reads server status and settings
        const READS_STATUS = 0b0000_1000;
        /// Tool runs the statistics engine
        const ANALYTICS = 0b0001_0000;
        /// Tool may issue several paginated upstream requests
        const PAGINATED = 0b0010_0000;
    }
}

impl ToolCapabilities {
    /// Get a human-readable description of capabilities
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<&str> = [
            (Self::READS_GLUCOSE, "reads_glucose"),
            (Self::READS_TREATMENTS, "reads_treatments"),
            (Self::READS_DEVICES, "reads_devices"),
            (Self::READS_STATUS, "reads_status"),
            (Self::ANALYTICS, "analytics"),
            (Self::PAGINATED, "paginated"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if parts.is_empty() {
            "none".to_owned()
        } else {
            parts.join(", ")
        }
    }
}

/// Core trait for MCP tools.
///
/// Implementations validate their own arguments before touching the
/// provider, so a rejected call never reaches Nightscout.
#[async_trait]
pub trait McpTool: Send + Sync {
    /// Unique tool name as exposed over MCP
    fn name(&self) -> &'static str;

    /// Description shown to the model
    fn description(&self) -> &'static str;

    /// JSON Schema of the accepted arguments
    fn input_schema(&self) -> JsonSchema;

    /// Capability flags
    fn capabilities(&self) -> ToolCapabilities;

    /// Execute the tool with the given arguments and context
    ///
    /// # Errors
    ///
    /// Validation, transport, and parse failures are returned as `AppError`
    /// and reported to the client as an `isError` result.
    async fn execute(&self, args: Value, context: &ToolExecutionContext) -> AppResult<ToolResult>;
}

// ABOUTME: Defines ToolExecutionContext which provides tools with access to shared resources.
// ABOUTME: Carries the request id and the instant "now" every date calculation is relative to.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Tool Execution Context
//!
//! Provides a unified context object for tool execution, containing:
//! - Access to shared server resources
//! - Request tracing information
//! - The reference instant for relative dates
//!
//! Capturing `now` once per call keeps every relative window of a call
//! consistent and lets tests pin time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::mcp::resources::ServerResources;

/// Context provided to every tool execution.
#[derive(Debug, Clone)]
pub struct ToolExecutionContext {
    /// JSON-RPC id of the originating request, for log correlation
    pub request_id: Option<Value>,
    /// Shared configuration and provider
    pub resources: Arc<ServerResources>,
    /// Reference instant for relative dates and ages
    pub now: DateTime<Utc>,
}

impl ToolExecutionContext {
    /// Create a context at the current instant
    #[must_use]
    pub fn new(resources: Arc<ServerResources>) -> Self {
        Self {
            request_id: None,
            resources,
            now: Utc::now(),
        }
    }

    /// Attach the request id
    #[must_use]
    pub fn with_request_id(mut self, request_id: Option<Value>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Pin the reference instant
    #[must_use]
    pub const fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

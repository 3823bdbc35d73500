// ABOUTME: Unified error handling re-exported from nightscout-core
// ABOUTME: Tool failures become isError results; only protocol failures become JSON-RPC errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! Error types shared by every layer of the server
//!
//! Tool failures travel as [`AppError`] and are reported to the client as
//! `isError: true` tool results. Only protocol-level failures (bad JSON,
//! unknown method, unknown tool) become JSON-RPC errors.

pub use nightscout_core::errors::{AppError, AppResult, ErrorCategory, ErrorCode, ToolError};


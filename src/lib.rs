// ABOUTME: Main library entry point for the Nightscout MCP server
// ABOUTME: Exposes CGM readings, treatments, and glucose analytics as MCP tools over stdio
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

#![deny(unsafe_code)]

//! # Nightscout MCP Server
//!
//! A Model Context Protocol (MCP) server that gives AI assistants read-only
//! access to a Nightscout continuous glucose monitoring site.
//!
//! ## Tools
//!
//! - `glucose_current`, `glucose_history`: latest value and recent trend
//! - `analyze`, `analyze_monthly`: time in range, variability, estimated `HbA1c`
//! - `treatments`, `devices`: insulin, carbs, and uploader/pump state
//! - `status`: site identity and alarm thresholds
//!
//! ## Architecture
//!
//! - **Providers** (`nightscout_providers`): HTTP client behind a trait
//! - **Intelligence** (`nightscout_intelligence`): statistics and assessments
//! - **MCP**: JSON-RPC routing and the stdio transport
//! - **Tools**: argument validation, provider calls, text and JSON results
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nightscout_mcp_server::config::ServerConfig;
//! use nightscout_mcp_server::errors::AppResult;
//! use nightscout_mcp_server::mcp::{McpRequestProcessor, ServerResources, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config));
//!     let processor = McpRequestProcessor::with_builtin_tools(resources);
//!     StdioTransport::new(processor).run().await
//! }
//! ```

/// Configuration loaded from the environment at startup
pub mod config;

/// Shared constants
pub mod constants;

/// Error types re-exported from the core crate
pub mod errors;

/// Text rendering of readings and reports
pub mod formatters;

/// JSON-RPC 2.0 message types
pub mod jsonrpc;

/// Structured logging to stderr
pub mod logging;

/// MCP request processing and transport
pub mod mcp;

/// MCP tools
pub mod tools;

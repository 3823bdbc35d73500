// ABOUTME: Pluggable MCP tool architecture: trait, registry, context, and implementations
// ABOUTME: Tools validate arguments, call the Nightscout provider, and format results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Tools
//!
//! Each tool implements [`traits::McpTool`] and is registered in the
//! [`registry::ToolRegistry`] at startup, grouped by category and gated by
//! cargo features.

/// Tool execution context
pub mod context;
/// Tool implementations by category
pub mod implementations;
/// Argument access and date-range resolution
pub mod params;
/// Tool registry
pub mod registry;
/// Tool result type
pub mod result;
/// `McpTool` trait and capability flags
pub mod traits;

pub use context::ToolExecutionContext;
pub use registry::ToolRegistry;
pub use result::ToolResult;
pub use traits::{McpTool, ToolCapabilities};

// ABOUTME: Model Context Protocol (MCP) implementation for AI assistant integration
// ABOUTME: Request processing, shared resources, schema types, and the stdio transport
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

pub mod request_processor;
pub mod resources;
pub mod schema;
pub mod transport;

pub use request_processor::McpRequestProcessor;
pub use resources::ServerResources;
pub use transport::StdioTransport;

// ABOUTME: Configuration module for the Nightscout MCP server
// ABOUTME: Environment variables are read once into an immutable ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

/// Environment and server configuration
pub mod environment;

pub use environment::{
    parse_utc_offset, ConfigOverrides, Environment, GlucoseConfig, ProtocolConfig, ServerConfig,
};

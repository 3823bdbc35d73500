// ABOUTME: Application constants grouped by domain
// ABOUTME: Protocol identity, glucose thresholds, and tool parameter limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! Constants module
//!
//! Runtime-configurable values (thresholds, reporting offset, server name)
//! live in the server configuration; these are their defaults and the fixed
//! clinical constants.

/// MCP and JSON-RPC protocol constants
pub mod protocol;

/// Glucose unit conversion and clinical thresholds
pub mod glucose;

/// Tool parameter bounds and defaults
pub mod limits;

/// Tool names
pub mod tools;

// ABOUTME: Core types and constants for the Nightscout MCP server
// ABOUTME: Foundation crate with error handling, glucose units, data models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

#![deny(unsafe_code)]

//! # Nightscout Core
//!
//! Foundation crate providing shared types for the Nightscout MCP server.
//! Everything here is synchronous and free of I/O so the statistics engine
//! and the HTTP client can both depend on it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ToolError`
//! - **constants**: Protocol, glucose, and tool-limit constants
//! - **models**: Readings, treatments, device status, and server status
//! - **units**: mg/dL and mmol/L conversion and unit detection

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models fetched from Nightscout
pub mod models;

/// Glucose unit conversion
pub mod units;

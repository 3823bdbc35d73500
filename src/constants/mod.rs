// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Re-exports shared constants from nightscout-core and adds environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! Constants module
//!
//! Glucose thresholds, parameter limits, protocol identifiers and tool names
//! live in `nightscout-core` so every crate in the workspace shares them.

pub use nightscout_core::constants::{glucose, limits, protocol, tools};

/// Environment variable names read at startup
pub mod env_config {
    /// Nightscout base URL (required)
    pub const NIGHTSCOUT_URL: &str = "NIGHTSCOUT_URL";
    /// Access token or hashed API secret
    pub const NIGHTSCOUT_API_SECRET: &str = "NIGHTSCOUT_API_SECRET";
    /// Display unit, `mmol` or `mgdl`
    pub const GLUCOSE_UNITS: &str = "GLUCOSE_UNITS";
    /// Lower TIR bound in either unit
    pub const GLUCOSE_LOW: &str = "GLUCOSE_LOW";
    /// Upper TIR bound in either unit
    pub const GLUCOSE_HIGH: &str = "GLUCOSE_HIGH";
    /// Expected readings per day below which results are flagged
    pub const GLUCOSE_MIN_READINGS_PER_DAY: &str = "GLUCOSE_MIN_READINGS_PER_DAY";
    /// Reporting time zone as a fixed UTC offset
    pub const NIGHTSCOUT_UTC_OFFSET: &str = "NIGHTSCOUT_UTC_OFFSET";
    /// Overall request timeout
    pub const NIGHTSCOUT_TIMEOUT_SECS: &str = "NIGHTSCOUT_TIMEOUT_SECS";
    /// Connection timeout
    pub const NIGHTSCOUT_CONNECT_TIMEOUT_SECS: &str = "NIGHTSCOUT_CONNECT_TIMEOUT_SECS";
    /// Entries per page
    pub const NIGHTSCOUT_PAGE_SIZE: &str = "NIGHTSCOUT_PAGE_SIZE";
    /// Page cap for one range query
    pub const NIGHTSCOUT_MAX_PAGES: &str = "NIGHTSCOUT_MAX_PAGES";
    /// Longest analysable date range in days
    pub const MAX_ANALYSIS_DAYS: &str = "MAX_ANALYSIS_DAYS";
    /// MCP protocol revision advertised on `initialize`
    pub const MCP_PROTOCOL_VERSION: &str = "MCP_PROTOCOL_VERSION";
    /// Server name advertised on `initialize`
    pub const SERVER_NAME: &str = "SERVER_NAME";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

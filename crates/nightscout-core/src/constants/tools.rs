// ABOUTME: Canonical names of the MCP tools exposed by the server
// ABOUTME: Shared by tool implementations, the registry, and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

/// Latest glucose reading
pub const GLUCOSE_CURRENT: &str = "glucose_current";
/// Recent readings with window statistics
pub const GLUCOSE_HISTORY: &str = "glucose_history";
/// Statistics over an arbitrary date range
pub const ANALYZE: &str = "analyze";
/// Month-by-month statistics for one year
pub const ANALYZE_MONTHLY: &str = "analyze_monthly";
/// Insulin, carbs, and care events
pub const TREATMENTS: &str = "treatments";
/// Nightscout server status
pub const STATUS: &str = "status";
/// Uploader and pump device status
pub const DEVICES: &str = "devices";

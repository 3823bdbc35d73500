// ABOUTME: Nightscout server status model
// ABOUTME: Site name, version, units, and configured alarm thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Alarm thresholds configured on the Nightscout site, in mg/dL
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerThresholds {
    /// Urgent high
    pub bg_high: Option<f64>,
    /// Top of target range
    pub bg_target_top: Option<f64>,
    /// Bottom of target range
    pub bg_target_bottom: Option<f64>,
    /// Urgent low
    pub bg_low: Option<f64>,
}

/// Server status as reported by `/api/v1/status.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    /// Site name
    pub name: Option<String>,
    /// Nightscout version
    pub version: Option<String>,
    /// Server clock, as reported
    pub server_time: Option<String>,
    /// Display units configured on the site
    pub units: Option<String>,
    /// Alarm thresholds, when the site publishes them
    pub thresholds: Option<ServerThresholds>,
    /// Whether the REST API is enabled
    pub api_enabled: Option<bool>,
    /// Raw `settings` object
    pub settings: Value,
}

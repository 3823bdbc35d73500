// ABOUTME: Device status model for uploaders, pumps, and closed-loop systems
// ABOUTME: Keeps the raw payload alongside the fields the tools render
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What produced a device status record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Insulin pump
    Pump,
    /// Continuous glucose monitor
    Cgm,
    /// Phone or bridge uploading data
    Uploader,
    /// Closed-loop controller (Loop, OpenAPS, AndroidAPS)
    Loop,
    /// Not identifiable
    Unknown,
}

impl DeviceKind {
    /// Label used in text output
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Cgm => "CGM",
            Self::Uploader => "uploader",
            Self::Loop => "loop",
            Self::Unknown => "unknown",
        }
    }
}

/// One device status record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// When the status was reported
    pub timestamp: DateTime<Utc>,
    /// Classified device kind
    pub kind: DeviceKind,
    /// Reported device name
    pub device: String,
    /// Battery percentage, uploader preferred over pump
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_pct: Option<f64>,
    /// Pump reservoir in units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservoir_units: Option<f64>,
    /// Original record
    pub raw: Value,
}

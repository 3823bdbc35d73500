// ABOUTME: Glucose reading model with trend direction
// ABOUTME: Values are canonical mg/dL regardless of the display unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::glucose::MIN_VALID_MGDL;

/// Rate-of-change arrow reported by the CGM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrendDirection {
    /// Rising fast
    DoubleUp,
    /// Rising
    SingleUp,
    /// Rising slowly
    FortyFiveUp,
    /// Steady
    Flat,
    /// Falling slowly
    FortyFiveDown,
    /// Falling
    SingleDown,
    /// Falling fast
    DoubleDown,
    /// Sensor could not compute a trend
    NotComputable,
    /// Rate outside the sensor's measurable range
    RateOutOfRange,
    /// No trend reported
    #[default]
    None,
}

impl TrendDirection {
    /// Parse the Nightscout `direction` string, unknown values become `None`
    #[must_use]
    pub fn from_nightscout(direction: &str) -> Self {
        match direction {
            "DoubleUp" => Self::DoubleUp,
            "SingleUp" => Self::SingleUp,
            "FortyFiveUp" => Self::FortyFiveUp,
            "Flat" => Self::Flat,
            "FortyFiveDown" => Self::FortyFiveDown,
            "SingleDown" => Self::SingleDown,
            "DoubleDown" => Self::DoubleDown,
            "NOT COMPUTABLE" | "NotComputable" => Self::NotComputable,
            "RATE OUT OF RANGE" | "RateOutOfRange" => Self::RateOutOfRange,
            _ => Self::None,
        }
    }

    /// Arrow shown next to a reading
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::DoubleUp => "⇈",
            Self::SingleUp => "↑",
            Self::FortyFiveUp => "↗",
            Self::Flat => "→",
            Self::FortyFiveDown => "↘",
            Self::SingleDown => "↓",
            Self::DoubleDown => "⇊",
            Self::NotComputable => "?",
            Self::RateOutOfRange => "⚠️",
            Self::None => "",
        }
    }
}

/// One sensor glucose value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Measurement instant
    pub timestamp: DateTime<Utc>,
    /// Glucose in mg/dL
    pub value_mgdl: f64,
    /// Trend arrow
    pub direction: TrendDirection,
    /// Change since the previous reading in mg/dL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_mgdl: Option<f64>,
    /// Uploading device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Nightscout document id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Reading {
    /// Reading with only the required fields
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, value_mgdl: f64) -> Self {
        Self {
            timestamp,
            value_mgdl,
            direction: TrendDirection::None,
            delta_mgdl: None,
            device: None,
            id: None,
        }
    }

    /// Set the trend direction
    #[must_use]
    pub const fn with_direction(mut self, direction: TrendDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Whether the value is plausible rather than a sensor artifact
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.value_mgdl.is_finite() && self.value_mgdl >= MIN_VALID_MGDL
    }
}

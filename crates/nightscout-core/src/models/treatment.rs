// ABOUTME: Treatment model for insulin doses, carbs, and care events
// ABOUTME: Event types are normalized from Nightscout's free-form eventType strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of treatment entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event_type", rename_all = "snake_case")]
pub enum TreatmentKind {
    /// Correction or manual bolus
    Bolus,
    /// Bolus paired with a meal
    MealBolus,
    /// Carbs taken to treat or prevent a low
    CarbCorrection,
    /// Temporary basal rate
    TempBasal,
    /// Infusion site change
    SiteChange,
    /// Sensor start or change
    SensorChange,
    /// Free-text note or announcement
    Note,
    /// Any other event type, kept verbatim
    Other(String),
}

impl TreatmentKind {
    /// Normalize a Nightscout `eventType`
    #[must_use]
    pub fn from_event_type(event_type: &str) -> Self {
        match event_type.trim() {
            "Correction Bolus" | "Bolus" | "SMB" => Self::Bolus,
            "Meal Bolus" | "Snack Bolus" | "Combo Bolus" => Self::MealBolus,
            "Carb Correction" | "Carbs" => Self::CarbCorrection,
            "Temp Basal" | "Temporary Basal" => Self::TempBasal,
            "Site Change" | "Insulin Change" | "Pump Site Change" => Self::SiteChange,
            "Sensor Start" | "Sensor Change" => Self::SensorChange,
            "Note" | "Announcement" | "Question" => Self::Note,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Label used in text output
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Bolus => "Bolus",
            Self::MealBolus => "Meal Bolus",
            Self::CarbCorrection => "Carb Correction",
            Self::TempBasal => "Temp Basal",
            Self::SiteChange => "Site Change",
            Self::SensorChange => "Sensor Change",
            Self::Note => "Note",
            Self::Other(event_type) => event_type,
        }
    }
}

/// One treatment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    /// When the treatment happened
    pub timestamp: DateTime<Utc>,
    /// Normalized event kind
    pub kind: TreatmentKind,
    /// Insulin in units
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin_units: Option<f64>,
    /// Carbohydrates in grams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_grams: Option<f64>,
    /// Duration in minutes (temp basals, exercise)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    /// Free-text notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Who or what logged the entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entered_by: Option<String>,
}

impl Treatment {
    /// Primary quantity: insulin units if present, else carb grams
    #[must_use]
    pub fn amount(&self) -> Option<f64> {
        self.insulin_units.or(self.carbs_grams)
    }
}

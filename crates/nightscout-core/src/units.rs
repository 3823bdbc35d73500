// ABOUTME: Glucose unit conversion between mg/dL and mmol/L
// ABOUTME: Includes heuristic unit detection for values of unknown unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! Glucose units
//!
//! mg/dL is the canonical internal unit. Conversion uses 18.0156 mg/dL per
//! mmol/L. Values with no declared unit are classified by magnitude: anything
//! below 30 is assumed to be mmol/L since no plausible mg/dL reading is that low.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::glucose::{MGDL_PER_MMOL, UNIT_DETECTION_THRESHOLD};
use crate::errors::{AppError, AppResult};

/// Glucose concentration unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseUnit {
    /// Milligrams per decilitre
    MgDl,
    /// Millimoles per litre
    Mmol,
}

impl GlucoseUnit {
    /// Display label, e.g. `mmol/L`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MgDl => "mg/dL",
            Self::Mmol => "mmol/L",
        }
    }

    /// Convert a canonical mg/dL value into this unit
    #[must_use]
    pub fn from_mgdl(self, value_mgdl: f64) -> f64 {
        match self {
            Self::MgDl => value_mgdl,
            Self::Mmol => value_mgdl / MGDL_PER_MMOL,
        }
    }
}

impl fmt::Display for GlucoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GlucoseUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mmol" | "mmol/l" | "mmoll" => Ok(Self::Mmol),
            "mgdl" | "mg/dl" => Ok(Self::MgDl),
            other => Err(AppError::invalid_input(format!(
                "Unknown glucose unit '{other}', expected 'mmol' or 'mgdl'"
            ))),
        }
    }
}

fn ensure_finite(value: f64) -> AppResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::invalid_input(format!(
            "Glucose value must be a finite number, got {value}"
        )))
    }
}

/// Convert a value in `unit` to mg/dL
///
/// # Errors
///
/// Returns an error if `value` is NaN or infinite.
pub fn to_mgdl(value: f64, unit: GlucoseUnit) -> AppResult<f64> {
    let value = ensure_finite(value)?;
    Ok(match unit {
        GlucoseUnit::MgDl => value,
        GlucoseUnit::Mmol => value * MGDL_PER_MMOL,
    })
}

/// Convert a mg/dL value to mmol/L
///
/// # Errors
///
/// Returns an error if `value_mgdl` is NaN or infinite.
pub fn to_mmol(value_mgdl: f64) -> AppResult<f64> {
    Ok(ensure_finite(value_mgdl)? / MGDL_PER_MMOL)
}

/// Guess the unit of a value by magnitude
#[must_use]
pub fn detect_unit(value: f64) -> GlucoseUnit {
    if value < UNIT_DETECTION_THRESHOLD {
        GlucoseUnit::Mmol
    } else {
        GlucoseUnit::MgDl
    }
}

/// Normalize a configured range threshold to integer mg/dL
///
/// Thresholds given in mmol/L are converted and rounded to the nearest integer.
///
/// # Errors
///
/// Returns an error if `value` is NaN or infinite.
pub fn normalize_threshold(value: f64) -> AppResult<f64> {
    let value = ensure_finite(value)?;
    match detect_unit(value) {
        GlucoseUnit::Mmol => Ok(to_mgdl(value, GlucoseUnit::Mmol)?.round()),
        GlucoseUnit::MgDl => Ok(value),
    }
}

// ABOUTME: Glucose conversion factor and clinical range thresholds
// ABOUTME: All thresholds are expressed in mg/dL, the canonical internal unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

/// mg/dL per mmol/L
pub const MGDL_PER_MMOL: f64 = 18.0156;

/// Values below this are treated as mmol/L when the unit is unknown
pub const UNIT_DETECTION_THRESHOLD: f64 = 30.0;

/// Readings below this are sensor artifacts and excluded from statistics
pub const MIN_VALID_MGDL: f64 = 40.0;

/// Default lower bound of the target range
pub const DEFAULT_TARGET_LOW_MGDL: f64 = 70.0;

/// Default upper bound of the target range
pub const DEFAULT_TARGET_HIGH_MGDL: f64 = 140.0;

/// Level 2 hypoglycemia
pub const VERY_LOW_MGDL: f64 = 54.0;

/// Level 1 hypoglycemia
pub const LOW_MGDL: f64 = 70.0;

/// Upper bound of the consensus target range
pub const HIGH_MGDL: f64 = 180.0;

/// Level 2 hyperglycemia
pub const VERY_HIGH_MGDL: f64 = 250.0;

/// Offset in the ADAG estimated HbA1c formula
pub const A1C_OFFSET: f64 = 46.7;

/// Divisor in the ADAG estimated HbA1c formula
pub const A1C_DIVISOR: f64 = 28.7;

/// Coefficient of variation considered stable, in percent
pub const CV_STABLE_PCT: f64 = 33.0;

/// Coefficient of variation still considered acceptable, in percent
pub const CV_ACCEPTABLE_PCT: f64 = 36.0;

/// TIR below the goal but at or above this is reported as near the goal
pub const TIR_NEAR_GOAL_PCT: f64 = 70.0;

/// Default expected readings per day before a result is flagged low-confidence
pub const DEFAULT_MIN_READINGS_PER_DAY: u32 = 12;

/// Means below this make the coefficient of variation undefined
pub const MEAN_EPSILON: f64 = 1e-9;

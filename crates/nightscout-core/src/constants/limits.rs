// ABOUTME: Bounds and defaults for tool parameters
// ABOUTME: Validation rejects values outside these ranges before any upstream call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

/// `glucose_history` look-back window in hours
pub const HISTORY_HOURS_DEFAULT: u32 = 6;
/// Smallest history window
pub const HISTORY_HOURS_MIN: u32 = 1;
/// Largest history window (30 days)
pub const HISTORY_HOURS_MAX: u32 = 720;

/// `glucose_history` readings listed
pub const HISTORY_COUNT_DEFAULT: u32 = 100;
/// Smallest reading count
pub const HISTORY_COUNT_MIN: u32 = 1;
/// Largest reading count
pub const HISTORY_COUNT_MAX: u32 = 1000;
/// Readings rendered in the text output
pub const HISTORY_DISPLAY_MAX: usize = 15;

/// `treatments` look-back window in hours
pub const TREATMENT_HOURS_DEFAULT: u32 = 24;
/// Smallest treatment window
pub const TREATMENT_HOURS_MIN: u32 = 1;
/// Largest treatment window (one week)
pub const TREATMENT_HOURS_MAX: u32 = 168;

/// `treatments` records requested
pub const TREATMENT_COUNT_DEFAULT: u32 = 50;
/// Smallest treatment count
pub const TREATMENT_COUNT_MIN: u32 = 1;
/// Largest treatment count
pub const TREATMENT_COUNT_MAX: u32 = 200;

/// `devices` records requested
pub const DEVICE_COUNT_DEFAULT: u32 = 5;
/// Smallest device count
pub const DEVICE_COUNT_MIN: u32 = 1;
/// Largest device count
pub const DEVICE_COUNT_MAX: u32 = 20;

/// `analyze` default start
pub const ANALYZE_DEFAULT_FROM: &str = "7d";
/// `analyze` default TIR goal
pub const ANALYZE_TIR_GOAL_DEFAULT: u32 = 70;
/// `analyze_monthly` default TIR goal
pub const MONTHLY_TIR_GOAL_DEFAULT: u32 = 85;
/// Lowest accepted TIR goal
pub const TIR_GOAL_MIN: u32 = 50;
/// Highest accepted TIR goal
pub const TIR_GOAL_MAX: u32 = 100;

/// Earliest year accepted by `analyze_monthly`
pub const MONTHLY_YEAR_MIN: i32 = 2015;

/// Default cap on any analysed date range, in days
pub const DEFAULT_MAX_ANALYSIS_DAYS: u32 = 1096;

/// Default Nightscout page size for entry queries
pub const DEFAULT_PAGE_SIZE: u32 = 10_000;
/// Default cap on sequential page requests
pub const DEFAULT_MAX_PAGES: u32 = 50;

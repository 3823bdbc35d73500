// ABOUTME: Glucose statistics engine for the Nightscout MCP server
// ABOUTME: Pure computation over readings, no I/O and no configuration lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

#![deny(unsafe_code)]

//! # Nightscout Intelligence
//!
//! Computes the standard CGM summary metrics from a set of readings:
//! time in, below, and above range, mean, population standard deviation,
//! coefficient of variation, and the ADAG estimated HbA1c. Readings can also
//! be partitioned into calendar months for year-over-year reporting.

/// Goal and variability assessment
pub mod assessment;

/// Core statistics over a reading set
pub mod glucose_metrics;

/// Calendar-month partitioning and summaries
pub mod monthly;

pub use assessment::{GoalAssessment, TirStatus, VariabilityStatus};
pub use glucose_metrics::{AnalysisResult, Confidence, GlucoseAnalyzer, RangeBreakdown, TirConfig};
pub use monthly::{month_range, MonthlyAnalysis, MonthlySummary};

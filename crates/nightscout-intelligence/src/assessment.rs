// ABOUTME: Goal assessment for time in range and glucose variability
// ABOUTME: Classifies results against a TIR goal and the 33%/36% CV thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use nightscout_core::constants::glucose::{CV_ACCEPTABLE_PCT, CV_STABLE_PCT, TIR_NEAR_GOAL_PCT};
use serde::{Deserialize, Serialize};

use crate::glucose_metrics::AnalysisResult;

/// Time in range relative to the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TirStatus {
    /// At or above the goal
    Met,
    /// Below the goal but at least 70%
    Near,
    /// Below 70% and below the goal
    Missed,
}

impl TirStatus {
    /// Classify a TIR percentage against a goal percentage
    #[must_use]
    pub fn assess(tir_pct: f64, goal_pct: f64) -> Self {
        if tir_pct >= goal_pct {
            Self::Met
        } else if tir_pct >= TIR_NEAR_GOAL_PCT {
            Self::Near
        } else {
            Self::Missed
        }
    }

    /// Status marker for text output
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Met => "✅",
            Self::Near => "⚠️",
            Self::Missed => "❌",
        }
    }
}

/// Glycemic variability class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariabilityStatus {
    /// CV at most 33%
    Stable,
    /// CV above 33% and at most 36%
    Acceptable,
    /// CV above 36%
    High,
}

impl VariabilityStatus {
    /// Classify a coefficient of variation
    #[must_use]
    pub fn assess(cv_pct: f64) -> Self {
        if cv_pct <= CV_STABLE_PCT {
            Self::Stable
        } else if cv_pct <= CV_ACCEPTABLE_PCT {
            Self::Acceptable
        } else {
            Self::High
        }
    }

    /// Short description for text output
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Acceptable => "acceptable",
            Self::High => "high variability",
        }
    }
}

/// An analysis judged against a TIR goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalAssessment {
    /// TIR goal in percent
    pub goal_pct: f64,
    /// TIR status
    pub tir_status: TirStatus,
    /// Goal minus achieved TIR, zero when met
    pub gap_pct: f64,
    /// Variability class, absent when CV is undefined
    pub variability: Option<VariabilityStatus>,
}

impl GoalAssessment {
    /// Assess a result against a TIR goal
    #[must_use]
    pub fn evaluate(result: &AnalysisResult, goal_pct: f64) -> Self {
        Self {
            goal_pct,
            tir_status: TirStatus::assess(result.time_in_range_pct, goal_pct),
            gap_pct: (goal_pct - result.time_in_range_pct).max(0.0),
            variability: result.cv_pct.map(VariabilityStatus::assess),
        }
    }
}

// ABOUTME: Time-in-range, variability, and estimated HbA1c over a set of readings
// ABOUTME: Empty input is reported as insufficient data instead of dividing by zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! Glucose metrics
//!
//! Percentages are computed against the number of valid readings; readings
//! below 40 mg/dL are sensor artifacts and only counted in `excluded_count`.
//! Percentages are left unrounded so TIR + TBR + TAR sums to 100.

use nightscout_core::constants::glucose::{
    A1C_DIVISOR, A1C_OFFSET, DEFAULT_MIN_READINGS_PER_DAY, DEFAULT_TARGET_HIGH_MGDL,
    DEFAULT_TARGET_LOW_MGDL, HIGH_MGDL, LOW_MGDL, MEAN_EPSILON, VERY_HIGH_MGDL, VERY_LOW_MGDL,
};
use nightscout_core::errors::{AppError, AppResult};
use nightscout_core::models::Reading;
use nightscout_core::units::normalize_threshold;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Target range bounds in mg/dL, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TirConfig {
    low_mgdl: f64,
    high_mgdl: f64,
}

impl Default for TirConfig {
    fn default() -> Self {
        Self {
            low_mgdl: DEFAULT_TARGET_LOW_MGDL,
            high_mgdl: DEFAULT_TARGET_HIGH_MGDL,
        }
    }
}

impl TirConfig {
    /// Build from mg/dL bounds
    ///
    /// # Errors
    ///
    /// Returns a validation error if a bound is non-finite or not positive,
    /// or if `low_mgdl >= high_mgdl`.
    pub fn new(low_mgdl: f64, high_mgdl: f64) -> AppResult<Self> {
        for (name, value) in [("low", low_mgdl), ("high", high_mgdl)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(AppError::invalid_input(format!(
                    "Target range {name} bound must be a positive number, got {value}"
                )));
            }
        }
        if low_mgdl >= high_mgdl {
            return Err(AppError::invalid_input(format!(
                "Target range low ({low_mgdl}) must be below high ({high_mgdl})"
            )));
        }
        Ok(Self {
            low_mgdl,
            high_mgdl,
        })
    }

    /// Build from configured values that may be in either unit
    ///
    /// Each bound below 30 is read as mmol/L and converted to integer mg/dL.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is unusable after normalization.
    pub fn from_configured(low: f64, high: f64) -> AppResult<Self> {
        Self::new(normalize_threshold(low)?, normalize_threshold(high)?)
    }

    /// Lower bound in mg/dL
    #[must_use]
    pub const fn low_mgdl(&self) -> f64 {
        self.low_mgdl
    }

    /// Upper bound in mg/dL
    #[must_use]
    pub const fn high_mgdl(&self) -> f64 {
        self.high_mgdl
    }
}

/// Percentage of readings in each consensus glucose band
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBreakdown {
    /// Below 54 mg/dL
    pub very_low_pct: f64,
    /// 54 to below 70 mg/dL
    pub low_pct: f64,
    /// 70 to 180 mg/dL
    pub target_pct: f64,
    /// Above 180 up to 250 mg/dL
    pub high_pct: f64,
    /// Above 250 mg/dL
    pub very_high_pct: f64,
}

impl RangeBreakdown {
    fn from_values(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let pct = |predicate: &dyn Fn(f64) -> bool| {
            values.iter().filter(|v| predicate(**v)).count() as f64 / n * 100.0
        };
        Self {
            very_low_pct: pct(&|v| v < VERY_LOW_MGDL),
            low_pct: pct(&|v| (VERY_LOW_MGDL..LOW_MGDL).contains(&v)),
            target_pct: pct(&|v| (LOW_MGDL..=HIGH_MGDL).contains(&v)),
            high_pct: pct(&|v| v > HIGH_MGDL && v <= VERY_HIGH_MGDL),
            very_high_pct: pct(&|v| v > VERY_HIGH_MGDL),
        }
    }
}

/// How much the result can be trusted given the number of readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum Confidence {
    /// Enough readings for the period
    Normal,
    /// Fewer readings than expected for the period
    Low {
        /// Readings expected at minimum
        expected_minimum: usize,
    },
}

impl Confidence {
    /// Whether the result is flagged low-confidence
    #[must_use]
    pub const fn is_low(&self) -> bool {
        matches!(self, Self::Low { .. })
    }
}

/// Summary statistics for one reading set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Valid readings analysed
    pub reading_count: usize,
    /// Readings dropped as sensor artifacts
    pub excluded_count: usize,
    /// Percent of readings within the target range
    pub time_in_range_pct: f64,
    /// Percent of readings below the target range
    pub time_below_range_pct: f64,
    /// Percent of readings above the target range
    pub time_above_range_pct: f64,
    /// Mean glucose in mg/dL
    pub mean_mgdl: f64,
    /// Population standard deviation in mg/dL
    pub std_dev_mgdl: f64,
    /// Coefficient of variation in percent, undefined for a zero mean
    pub cv_pct: Option<f64>,
    /// Estimated HbA1c in percent, one decimal place
    pub estimated_a1c_pct: f64,
    /// Lowest valid reading in mg/dL
    pub min_mgdl: f64,
    /// Highest valid reading in mg/dL
    pub max_mgdl: f64,
    /// Consensus band breakdown
    pub ranges: RangeBreakdown,
    /// Data-sufficiency flag
    pub confidence: Confidence,
    /// Target range the percentages refer to
    pub target: TirConfig,
}

/// Statistics engine configured with a target range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlucoseAnalyzer {
    tir: TirConfig,
    min_readings_per_day: u32,
}

impl Default for GlucoseAnalyzer {
    fn default() -> Self {
        Self::new(TirConfig::default())
    }
}

impl GlucoseAnalyzer {
    /// Analyzer with the default low-confidence threshold
    #[must_use]
    pub const fn new(tir: TirConfig) -> Self {
        Self {
            tir,
            min_readings_per_day: DEFAULT_MIN_READINGS_PER_DAY,
        }
    }

    /// Override the readings-per-day threshold below which results are flagged
    #[must_use]
    pub const fn with_min_readings_per_day(mut self, per_day: u32) -> Self {
        self.min_readings_per_day = per_day;
        self
    }

    /// Target range in use
    #[must_use]
    pub const fn tir_config(&self) -> TirConfig {
        self.tir
    }

    /// Analyse readings covering a period of `period_days`
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if no reading is valid.
    pub fn analyze(&self, readings: &[Reading], period_days: f64) -> AppResult<AnalysisResult> {
        let values: Vec<f64> = readings
            .iter()
            .filter(|r| r.is_valid())
            .map(|r| r.value_mgdl)
            .collect();
        let excluded = readings.len() - values.len();
        self.analyze_values(&values, excluded, period_days)
    }

    /// Analyse already-validated mg/dL values
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if `values` is empty.
    pub fn analyze_values(
        &self,
        values: &[f64],
        excluded_count: usize,
        period_days: f64,
    ) -> AppResult<AnalysisResult> {
        if values.is_empty() {
            return Err(AppError::insufficient_data(0).with_details(serde_json::json!({
                "reading_count": 0,
                "excluded_count": excluded_count,
            })));
        }

        let n = values.len() as f64;
        let low = self.tir.low_mgdl;
        let high = self.tir.high_mgdl;

        let below = values.iter().filter(|v| **v < low).count();
        let above = values.iter().filter(|v| **v > high).count();
        let in_range = values.len() - below - above;

        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        let cv = (mean.abs() >= MEAN_EPSILON).then(|| std_dev / mean * 100.0);

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let confidence = self.confidence(values.len(), period_days);
        debug!(
            readings = values.len(),
            excluded = excluded_count,
            period_days,
            low_confidence = confidence.is_low(),
            "computed glucose statistics"
        );

        Ok(AnalysisResult {
            reading_count: values.len(),
            excluded_count,
            time_in_range_pct: in_range as f64 / n * 100.0,
            time_below_range_pct: below as f64 / n * 100.0,
            time_above_range_pct: above as f64 / n * 100.0,
            mean_mgdl: mean,
            std_dev_mgdl: std_dev,
            cv_pct: cv,
            estimated_a1c_pct: estimated_a1c(mean),
            min_mgdl: min,
            max_mgdl: max,
            ranges: RangeBreakdown::from_values(values),
            confidence,
            target: self.tir,
        })
    }

    fn confidence(&self, count: usize, period_days: f64) -> Confidence {
        if !period_days.is_finite() || period_days <= 0.0 {
            return Confidence::Normal;
        }
        let expected = (period_days * f64::from(self.min_readings_per_day)).ceil() as usize;
        if count < expected {
            Confidence::Low {
                expected_minimum: expected,
            }
        } else {
            Confidence::Normal
        }
    }
}

/// ADAG estimated HbA1c from mean glucose, rounded to one decimal
#[must_use]
pub fn estimated_a1c(mean_mgdl: f64) -> f64 {
    round1((mean_mgdl + A1C_OFFSET) / A1C_DIVISOR)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

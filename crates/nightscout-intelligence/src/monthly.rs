// ABOUTME: Calendar-month partitioning of readings with per-month statistics
// ABOUTME: Month boundaries follow the reporting UTC offset, empty months are omitted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use std::collections::BTreeMap;

use chrono::{Datelike, FixedOffset, TimeZone, Utc};
use nightscout_core::errors::AppResult;
use nightscout_core::models::{DateRange, Reading};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::glucose_metrics::{AnalysisResult, GlucoseAnalyzer};

/// Statistics for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAnalysis {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    /// Statistics for readings in that month
    pub result: AnalysisResult,
}

impl MonthlyAnalysis {
    /// `YYYY-MM` label
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Averages across a set of monthly analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Months with data
    pub months: usize,
    /// Readings across all months
    pub total_readings: usize,
    /// Mean of monthly TIR percentages
    pub avg_tir_pct: f64,
    /// Mean of the defined monthly CV values
    pub avg_cv_pct: Option<f64>,
    /// Mean of monthly mean glucose, mg/dL
    pub avg_mean_mgdl: f64,
    /// Mean of monthly estimated HbA1c
    pub avg_a1c_pct: f64,
    /// Month with the highest TIR, `YYYY-MM`
    pub best_month: String,
    /// TIR of the best month
    pub best_tir_pct: f64,
    /// Month with the lowest TIR, `YYYY-MM`
    pub worst_month: String,
    /// TIR of the worst month
    pub worst_tir_pct: f64,
}

impl MonthlySummary {
    /// Summarise monthly results, `None` when there are none
    #[must_use]
    pub fn from_months(months: &[MonthlyAnalysis]) -> Option<Self> {
        let first = months.first()?;
        let n = months.len() as f64;
        let avg = |f: fn(&AnalysisResult) -> f64| months.iter().map(|m| f(&m.result)).sum::<f64>() / n;

        let cvs: Vec<f64> = months.iter().filter_map(|m| m.result.cv_pct).collect();
        let avg_cv_pct = (!cvs.is_empty()).then(|| cvs.iter().sum::<f64>() / cvs.len() as f64);

        let mut best = first;
        let mut worst = first;
        for month in months {
            if month.result.time_in_range_pct > best.result.time_in_range_pct {
                best = month;
            }
            if month.result.time_in_range_pct < worst.result.time_in_range_pct {
                worst = month;
            }
        }

        Some(Self {
            months: months.len(),
            total_readings: months.iter().map(|m| m.result.reading_count).sum(),
            avg_tir_pct: avg(|r: &AnalysisResult| r.time_in_range_pct),
            avg_cv_pct,
            avg_mean_mgdl: avg(|r: &AnalysisResult| r.mean_mgdl),
            avg_a1c_pct: avg(|r: &AnalysisResult| r.estimated_a1c_pct),
            best_month: best.label(),
            best_tir_pct: best.result.time_in_range_pct,
            worst_month: worst.label(),
            worst_tir_pct: worst.result.time_in_range_pct,
        })
    }
}

/// UTC interval covering a calendar month in the given offset
#[must_use]
pub fn month_range(year: i32, month: u32, offset: FixedOffset) -> Option<DateRange> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let start = offset.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()?;
    let end = offset
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()?;
    DateRange::new(start.with_timezone(&Utc), end.with_timezone(&Utc)).ok()
}

impl GlucoseAnalyzer {
    /// Analyse each calendar month of `readings` independently
    ///
    /// `window` is the requested period; a month only partly inside it is
    /// judged for low confidence against the overlapping days only.
    ///
    /// # Errors
    ///
    /// Never fails for months with readings; the `Result` carries errors from
    /// the underlying analysis.
    pub fn analyze_monthly(
        &self,
        readings: &[Reading],
        window: &DateRange,
        offset: FixedOffset,
    ) -> AppResult<Vec<MonthlyAnalysis>> {
        let mut buckets: BTreeMap<(i32, u32), (Vec<f64>, usize)> = BTreeMap::new();
        for reading in readings.iter().filter(|r| window.contains(r.timestamp)) {
            let local = reading.timestamp.with_timezone(&offset);
            let bucket = buckets.entry((local.year(), local.month())).or_default();
            if reading.is_valid() {
                bucket.0.push(reading.value_mgdl);
            } else {
                bucket.1 += 1;
            }
        }

        let mut months = Vec::with_capacity(buckets.len());
        for ((year, month), (values, excluded)) in buckets {
            if values.is_empty() {
                debug!(year, month, excluded, "skipping month without valid readings");
                continue;
            }
            let period_days = month_range(year, month, offset)
                .and_then(|range| range.intersect(window))
                .map_or(0.0, |range| range.days());
            let result = self.analyze_values(&values, excluded, period_days)?;
            months.push(MonthlyAnalysis {
                year,
                month,
                result,
            });
        }
        Ok(months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glucose_metrics::TirConfig;
    use chrono::{DateTime, Duration};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_two_months_chronological() {
        let readings = vec![
            Reading::new(at(2024, 2, 10, 12), 150.0),
            Reading::new(at(2024, 1, 5, 12), 100.0),
            Reading::new(at(2024, 1, 6, 12), 120.0),
        ];
        let window = DateRange::new(at(2024, 1, 1, 0), at(2024, 3, 1, 0)).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let months = GlucoseAnalyzer::new(TirConfig::default())
            .analyze_monthly(&readings, &window, utc)
            .unwrap();

        assert_eq!(months.len(), 2);
        assert_eq!((months[0].year, months[0].month), (2024, 1));
        assert_eq!(months[0].result.reading_count, 2);
        assert_eq!((months[1].year, months[1].month), (2024, 2));
        assert_eq!(months[1].result.reading_count, 1);
    }

    #[test]
    fn test_offset_moves_reading_into_next_month() {
        let late_utc = at(2024, 1, 31, 23);
        let readings = vec![Reading::new(late_utc, 110.0)];
        let window = DateRange::new(late_utc - Duration::days(1), late_utc + Duration::days(1)).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let months = GlucoseAnalyzer::default()
            .analyze_monthly(&readings, &window, plus_two)
            .unwrap();
        assert_eq!((months[0].year, months[0].month), (2024, 2));
    }

    #[test]
    fn test_summary_best_and_worst() {
        let readings = vec![
            Reading::new(at(2024, 1, 5, 12), 100.0),
            Reading::new(at(2024, 2, 5, 12), 250.0),
            Reading::new(at(2024, 2, 6, 12), 100.0),
        ];
        let window = DateRange::new(at(2024, 1, 1, 0), at(2024, 3, 1, 0)).unwrap();
        let months = GlucoseAnalyzer::default()
            .analyze_monthly(&readings, &window, FixedOffset::east_opt(0).unwrap())
            .unwrap();
        let summary = MonthlySummary::from_months(&months).unwrap();
        assert_eq!(summary.best_month, "2024-01");
        assert_eq!(summary.worst_month, "2024-02");
        assert_eq!(summary.total_readings, 3);
        assert!((summary.avg_tir_pct - 75.0).abs() < 1e-9);
        assert!(MonthlySummary::from_months(&[]).is_none());
    }

    #[test]
    fn test_december_range_rolls_year() {
        let range = month_range(2024, 12, FixedOffset::east_opt(0).unwrap()).unwrap();
        assert_eq!(range.end(), at(2025, 1, 1, 0));
        assert!((range.days() - 31.0).abs() < f64::EPSILON);
    }
}

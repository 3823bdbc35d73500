// ABOUTME: Human-readable reports for each tool result
// ABOUTME: Low-confidence and insufficient-data outcomes render explicit warning lines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use std::fmt::Write;

use chrono::{DateTime, Utc};
use nightscout_core::constants::glucose::{HIGH_MGDL, LOW_MGDL, VERY_HIGH_MGDL, VERY_LOW_MGDL};
use nightscout_core::models::{DateRange, DeviceStatus, Reading, ServerStatus, Treatment};
use nightscout_intelligence::{
    AnalysisResult, Confidence, GoalAssessment, MonthlyAnalysis, MonthlySummary, TirStatus,
    VariabilityStatus,
};

use super::{age, amount, group_thousands, GlucoseFormatter};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const RULE_WIDTH: usize = 72;

/// Three-letter month name, `???` outside 1-12
#[must_use]
pub fn month_name(month: u32) -> &'static str {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MONTH_NAMES.get(i))
        .copied()
        .unwrap_or("???")
}

const fn variability_symbol(status: VariabilityStatus) -> &'static str {
    match status {
        VariabilityStatus::Stable => "✅",
        VariabilityStatus::Acceptable => "⚠️",
        VariabilityStatus::High => "❌",
    }
}

/// Warning line for results computed from fewer readings than expected
#[must_use]
pub fn low_confidence_line(result: &AnalysisResult) -> Option<String> {
    match result.confidence {
        Confidence::Normal => None,
        Confidence::Low { expected_minimum } => Some(format!(
            "⚠️ Low confidence: {} readings, at least {} expected for this period",
            group_thousands(result.reading_count),
            group_thousands(expected_minimum)
        )),
    }
}

impl GlucoseFormatter {
    fn cv_text(result: &AnalysisResult) -> String {
        match result.cv_pct {
            Some(cv) => {
                let symbol = variability_symbol(VariabilityStatus::assess(cv));
                format!("{cv:.1}% {symbol}")
            }
            None => "undefined".to_owned(),
        }
    }

    /// Latest reading
    #[must_use]
    pub fn current_reading(&self, reading: &Reading, now: DateTime<Utc>) -> String {
        let mut text = format!(
            "🩸 Current glucose: {} {}",
            self.value(reading.value_mgdl),
            reading.direction.arrow()
        );
        let _ = write!(
            text,
            "\n📅 Time: {} {} ({})",
            self.local_time(reading.timestamp),
            self.offset_label(),
            age(now, reading.timestamp)
        );
        if let Some(delta) = reading.delta_mgdl {
            let _ = write!(text, "\n📈 Delta: {}", self.delta(delta));
        }
        let _ = write!(
            text,
            "\n📱 Device: {}",
            reading.device.as_deref().unwrap_or("N/A")
        );
        text.trim_end().to_owned()
    }

    /// Window statistics followed by the most recent readings, newest first
    #[must_use]
    pub fn history(
        &self,
        hours: u32,
        result: &AnalysisResult,
        recent: &[Reading],
        display_max: usize,
    ) -> String {
        let mut text = format!(
            "📊 Glucose history for {hours}h ({} readings)",
            group_thousands(result.reading_count)
        );
        if let Some(line) = low_confidence_line(result) {
            let _ = write!(text, "\n{line}");
        }
        let _ = write!(
            text,
            "\n\n📈 Statistics:\n• Average: {}\n• Min/Max: {}–{}\n• TIR ({}): {:.1}%\n• CV: {}",
            self.value(result.mean_mgdl),
            self.short(result.min_mgdl),
            self.short(result.max_mgdl),
            self.range_label(&result.target),
            result.time_in_range_pct,
            Self::cv_text(result),
        );
        if result.excluded_count > 0 {
            let _ = write!(
                text,
                "\n• Excluded sensor errors: {}",
                group_thousands(result.excluded_count)
            );
        }

        text.push_str("\n\n📋 Recent readings:");
        for reading in recent.iter().take(display_max) {
            let _ = write!(
                text,
                "\n• {}: {} {}",
                self.short_time(reading.timestamp),
                self.short(reading.value_mgdl),
                reading.direction.arrow()
            );
        }
        if recent.len() > display_max {
            let _ = write!(
                text,
                "\n... and {} more readings",
                group_thousands(recent.len() - display_max)
            );
        }
        text.trim_end().to_owned()
    }

    /// Full analysis with time in ranges and goal assessment
    #[must_use]
    pub fn analysis(
        &self,
        range: &DateRange,
        result: &AnalysisResult,
        assessment: &GoalAssessment,
    ) -> String {
        let mut text = format!(
            "📊 Glucose Analysis: {} to {} ({:.0} days, {} readings)",
            self.local_date(range.start()),
            self.local_date(range.end()),
            range.days().ceil(),
            group_thousands(result.reading_count)
        );
        if let Some(line) = low_confidence_line(result) {
            let _ = write!(text, "\n{line}");
        }

        let _ = write!(
            text,
            "\n\n📈 Key Metrics:\n• Average glucose: {}\n• Min/Max: {}–{}\n• Standard deviation: {}\n• CV: {}\n• Estimated HbA1c: {:.1}%",
            self.value(result.mean_mgdl),
            self.short(result.min_mgdl),
            self.short(result.max_mgdl),
            self.value(result.std_dev_mgdl),
            Self::cv_text(result),
            result.estimated_a1c_pct,
        );
        if result.excluded_count > 0 {
            let _ = write!(
                text,
                "\n• Excluded sensor errors: {}",
                group_thousands(result.excluded_count)
            );
        }

        let unit = self.unit().label();
        let ranges = &result.ranges;
        let _ = write!(
            text,
            "\n\n🎯 Time in Ranges:\n• 🔴 Very low (<{very_low} {unit}): {:.1}% (goal <1%)\n• 🟠 Low ({very_low}-{low} {unit}): {:.1}% (goal <4%)\n• 🟢 In target ({}): {:.1}% {} (goal ≥{:.0}%)\n• ⬇️ Below target: {:.1}%\n• 🟡 Above target: {:.1}%\n• 🟠 High ({high}-{very_high} {unit}): {:.1}%\n• 🔴 Very high (>{very_high} {unit}): {:.1}% (goal <5%)",
            ranges.very_low_pct,
            ranges.low_pct,
            self.range_label(&result.target),
            result.time_in_range_pct,
            assessment.tir_status.symbol(),
            assessment.goal_pct,
            result.time_below_range_pct,
            result.time_above_range_pct,
            ranges.high_pct,
            ranges.very_high_pct,
            very_low = self.short(VERY_LOW_MGDL),
            low = self.short(LOW_MGDL),
            high = self.short(HIGH_MGDL),
            very_high = self.short(VERY_HIGH_MGDL),
        );

        text.push_str("\n\n💡 Assessment:");
        if assessment.tir_status == TirStatus::Met {
            let _ = write!(
                text,
                "\n• ✅ TIR goal of {:.0}% achieved!",
                assessment.goal_pct
            );
        } else {
            let _ = write!(
                text,
                "\n• {} {:.1}% away from TIR goal of {:.0}%",
                assessment.tir_status.symbol(),
                assessment.gap_pct,
                assessment.goal_pct
            );
        }
        match assessment.variability {
            Some(VariabilityStatus::Stable) => text.push_str("\n• ✅ Excellent glucose stability"),
            Some(VariabilityStatus::Acceptable) => text.push_str("\n• 📊 Good stability"),
            Some(VariabilityStatus::High) => text.push_str("\n• ⚠️ High variability"),
            None => text.push_str("\n• Variability could not be computed"),
        }
        text
    }

    /// Warning for a window the provider could only partly fetch
    #[must_use]
    pub fn truncated_notice(&self, covered_from: Option<DateTime<Utc>>) -> String {
        covered_from.map_or_else(
            || "⚠️ Partial data: the Nightscout page limit was reached before the start of the period".to_owned(),
            |oldest| {
                format!(
                    "⚠️ Partial data: the Nightscout page limit was reached, readings cover {} {} onwards only",
                    self.local_time(oldest),
                    self.offset_label()
                )
            },
        )
    }

    /// Outcome when a window holds no valid reading
    #[must_use]
    pub fn insufficient_data(&self, range: &DateRange, excluded: usize) -> String {
        let mut text = format!(
            "Not enough data for analysis: no valid glucose readings between {} and {} {}",
            self.local_time(range.start()),
            self.local_time(range.end()),
            self.offset_label()
        );
        if excluded > 0 {
            let _ = write!(
                text,
                " ({} readings excluded as sensor errors)",
                group_thousands(excluded)
            );
        }
        text
    }

    /// Month-by-month table and summary
    #[must_use]
    pub fn monthly(
        &self,
        year: i32,
        requested: (u32, u32),
        months: &[MonthlyAnalysis],
        summary: Option<&MonthlySummary>,
        goal_pct: f64,
    ) -> String {
        let tir_label = months
            .first()
            .map(|m| self.range_label(&m.result.target))
            .unwrap_or_default();
        let mut text = format!("📊 Glucose Analysis for {year} (TIR goal: {goal_pct:.0}%)\n");
        let _ = writeln!(text, "{}", "=".repeat(RULE_WIDTH));
        let _ = writeln!(
            text,
            "Month │ TIR {tir_label:<14} │  Avg  │   CV    │  A1c  │ Readings"
        );
        let _ = writeln!(text, "{}", "-".repeat(RULE_WIDTH));

        let mut any_low = false;
        for month in requested.0..=requested.1 {
            let name = month_name(month);
            let Some(entry) = months.iter().find(|m| m.month == month) else {
                let _ = writeln!(text, "{name:5} │ No data");
                continue;
            };
            let result = &entry.result;
            let tir_symbol = TirStatus::assess(result.time_in_range_pct, goal_pct).symbol();
            let cv = result.cv_pct.map_or_else(
                || "    n/a".to_owned(),
                |cv| format!("{cv:5.1}% {}", variability_symbol(VariabilityStatus::assess(cv))),
            );
            let marker = if result.confidence.is_low() {
                any_low = true;
                " *"
            } else {
                ""
            };
            let _ = writeln!(
                text,
                "{name:5} │ {:6.1}% {tir_symbol:<10} │ {:>5} │ {cv} │ {:4.1}% │ {:>8}{marker}",
                result.time_in_range_pct,
                self.short(result.mean_mgdl),
                result.estimated_a1c_pct,
                group_thousands(result.reading_count),
            );
        }
        let _ = writeln!(text, "{}", "=".repeat(RULE_WIDTH));
        if any_low {
            text.push_str("* fewer readings than expected, low confidence\n");
        }

        let Some(summary) = summary else {
            text.push_str("\nNo glucose readings in the requested months");
            return text;
        };

        let tir_status = if summary.avg_tir_pct >= goal_pct {
            "✅ GOAL MET".to_owned()
        } else {
            format!("⚠️ {:.1}% to goal", goal_pct - summary.avg_tir_pct)
        };
        let _ = write!(
            text,
            "\n📈 SUMMARY ({} months, {} readings)\n{}\n🎯 Average TIR ({tir_label}): {:.1}% ({tir_status})\n📊 Average glucose: {}\n",
            summary.months,
            group_thousands(summary.total_readings),
            "-".repeat(RULE_WIDTH),
            summary.avg_tir_pct,
            self.value(summary.avg_mean_mgdl),
        );
        match summary.avg_cv_pct {
            Some(cv) => {
                let label = match VariabilityStatus::assess(cv) {
                    VariabilityStatus::Stable => "✅ Stable",
                    VariabilityStatus::Acceptable => "📊 OK",
                    VariabilityStatus::High => "⚠️ High",
                };
                let _ = writeln!(text, "📉 Average CV: {cv:.1}% ({label})");
            }
            None => text.push_str("📉 Average CV: undefined\n"),
        }
        let _ = write!(
            text,
            "🩸 Estimated HbA1c: {:.1}%\n\n🏆 Best TIR: {} ({:.1}%)\n📉 Worst TIR: {} ({:.1}%)",
            summary.avg_a1c_pct,
            summary.best_month,
            summary.best_tir_pct,
            summary.worst_month,
            summary.worst_tir_pct,
        );
        text
    }

    /// Treatment log with insulin and carb totals
    #[must_use]
    pub fn treatments(&self, hours: u32, treatments: &[Treatment]) -> String {
        if treatments.is_empty() {
            return format!("No treatments in the last {hours} hours");
        }

        let mut text = format!("💉 Treatments for {hours}h:");
        let mut total_insulin = 0.0;
        let mut total_carbs = 0.0;
        for treatment in treatments {
            let _ = write!(
                text,
                "\n• {}: [{}]",
                self.short_time(treatment.timestamp),
                treatment.kind.label()
            );
            if let Some(insulin) = treatment.insulin_units {
                let _ = write!(text, " 💉 {} U", amount(insulin));
                total_insulin += insulin;
            }
            if let Some(carbs) = treatment.carbs_grams {
                let _ = write!(text, " 🍞 {} g", amount(carbs));
                total_carbs += carbs;
            }
            if let Some(duration) = treatment.duration_minutes {
                let _ = write!(text, " ⏱️ {} min", amount(duration));
            }
            if let Some(notes) = treatment.notes.as_deref().filter(|n| !n.is_empty()) {
                let _ = write!(text, " 📝 {notes}");
            }
        }

        text.push_str("\n\n📊 Totals:");
        if total_insulin > 0.0 {
            let _ = write!(text, " 💉 {total_insulin:.1} U");
        }
        if total_carbs > 0.0 {
            let _ = write!(text, " 🍞 {} g", amount(total_carbs));
        }
        if total_insulin <= 0.0 && total_carbs <= 0.0 {
            text.push_str(" none");
        }
        text
    }

    /// Server identity and configured thresholds
    #[must_use]
    pub fn status(&self, status: &ServerStatus) -> String {
        let na = |value: Option<&str>| value.unwrap_or("N/A").to_owned();
        let mut text = format!(
            "⚙️ Nightscout Status:\n• Name: {}\n• Version: {}\n• Server time: {}\n• Units: {}",
            na(status.name.as_deref()),
            na(status.version.as_deref()),
            na(status.server_time.as_deref()),
            status.units.as_deref().unwrap_or("mg/dl"),
        );
        if let Some(api_enabled) = status.api_enabled {
            let _ = write!(
                text,
                "\n• API: {}",
                if api_enabled { "enabled" } else { "disabled" }
            );
        }
        if let Some(thresholds) = status.thresholds {
            let fmt = |value: Option<f64>| {
                value.map_or_else(|| "N/A".to_owned(), |v| self.value(v))
            };
            let _ = write!(
                text,
                "\n\n🎯 Thresholds:\n• High: {}\n• Target top: {}\n• Target bottom: {}\n• Low: {}",
                fmt(thresholds.bg_high),
                fmt(thresholds.bg_target_top),
                fmt(thresholds.bg_target_bottom),
                fmt(thresholds.bg_low),
            );
        }
        text
    }

    /// Device status records, newest first
    #[must_use]
    pub fn devices(&self, devices: &[DeviceStatus]) -> String {
        if devices.is_empty() {
            return "No device data available".to_owned();
        }
        let mut text = "📱 Device Status:".to_owned();
        for status in devices {
            let _ = write!(
                text,
                "\n\n⏰ {} ({}): {}",
                self.short_time(status.timestamp),
                status.kind.label(),
                status.device
            );
            if let Some(battery) = status.battery_pct {
                let _ = write!(text, "\n  🔋 Battery: {}%", amount(battery));
            }
            if let Some(reservoir) = status.reservoir_units {
                let _ = write!(text, "\n  💉 Reservoir: {} U", amount(reservoir));
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use nightscout_core::models::{DeviceKind, TreatmentKind, TrendDirection};
    use nightscout_core::units::GlucoseUnit;
    use nightscout_intelligence::{GlucoseAnalyzer, TirConfig};
    use serde_json::Value;

    fn mgdl() -> GlucoseFormatter {
        GlucoseFormatter::new(GlucoseUnit::MgDl, FixedOffset::east_opt(0).unwrap())
    }

    fn result_for(values: &[f64], days: f64) -> AnalysisResult {
        GlucoseAnalyzer::new(TirConfig::new(70.0, 180.0).unwrap())
            .analyze_values(values, 0, days)
            .unwrap()
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "???");
        assert_eq!(month_name(13), "???");
    }

    #[test]
    fn test_current_reading_lines() {
        let now = Utc.with_ymd_and_hms(2025, 5, 1, 12, 5, 0).unwrap();
        let mut reading = Reading::new(now - chrono::Duration::minutes(5), 123.0)
            .with_direction(TrendDirection::SingleUp);
        reading.delta_mgdl = Some(-4.0);
        reading.device = Some("xDrip".into());
        let text = mgdl().current_reading(&reading, now);
        assert!(text.starts_with("🩸 Current glucose: 123 mg/dL ↑"));
        assert!(text.contains("2025-05-01 12:00 UTC (5 min ago)"));
        assert!(text.contains("Delta: -4"));
        assert!(text.contains("Device: xDrip"));
    }

    #[test]
    fn test_low_confidence_warning_rendered() {
        let result = result_for(&[100.0, 120.0], 7.0);
        let range = DateRange::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 8, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let assessment = GoalAssessment::evaluate(&result, 70.0);
        let text = mgdl().analysis(&range, &result, &assessment);
        assert!(text.contains("Low confidence: 2 readings, at least 84 expected"));
        assert!(text.contains("2025-01-01 to 2025-01-08 (7 days"));
        assert!(text.contains("TIR goal of 70% achieved"));
    }

    #[test]
    fn test_treatment_totals() {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        let treatments = vec![
            Treatment {
                timestamp: at,
                kind: TreatmentKind::MealBolus,
                insulin_units: Some(4.5),
                carbs_grams: Some(45.0),
                duration_minutes: None,
                notes: Some("breakfast".into()),
                entered_by: None,
            },
            Treatment {
                timestamp: at,
                kind: TreatmentKind::Bolus,
                insulin_units: Some(1.0),
                carbs_grams: None,
                duration_minutes: None,
                notes: None,
                entered_by: None,
            },
        ];
        let text = mgdl().treatments(24, &treatments);
        assert!(text.contains("[Meal Bolus] 💉 4.5 U 🍞 45 g 📝 breakfast"));
        assert!(text.ends_with("Totals: 💉 5.5 U 🍞 45 g"));
        assert_eq!(mgdl().treatments(6, &[]), "No treatments in the last 6 hours");
    }

    #[test]
    fn test_monthly_marks_missing_months() {
        let months = vec![MonthlyAnalysis {
            year: 2024,
            month: 2,
            result: result_for(&[100.0; 400], 29.0),
        }];
        let summary = MonthlySummary::from_months(&months);
        let text = mgdl().monthly(2024, (1, 3), &months, summary.as_ref(), 85.0);
        assert!(text.contains("Jan   │ No data"));
        assert!(text.contains("Mar   │ No data"));
        assert!(text.contains("Best TIR: 2024-02 (100.0%)"));
        assert!(text.contains("GOAL MET"));
    }

    #[test]
    fn test_devices_render_battery() {
        let devices = vec![DeviceStatus {
            timestamp: Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap(),
            kind: DeviceKind::Pump,
            device: "openaps://pump".into(),
            battery_pct: Some(80.0),
            reservoir_units: Some(112.5),
            raw: Value::Null,
        }];
        let text = mgdl().devices(&devices);
        assert!(text.contains("Battery: 80%"));
        assert!(text.contains("Reservoir: 112.5 U"));
        assert_eq!(mgdl().devices(&[]), "No device data available");
    }
}

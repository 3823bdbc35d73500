// ABOUTME: Display formatting for glucose values, deltas, times, and counts
// ABOUTME: Converts canonical mg/dL values into the configured display unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! Output Formatting Layer
//!
//! Every tool answers with a short human-readable report plus a structured
//! JSON payload. Values are stored in mg/dL; this module renders them in the
//! display unit (`mg/dL` as integers, `mmol/L` with one decimal) and renders
//! instants in the reporting UTC offset.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nightscout_mcp_server::formatters::GlucoseFormatter;
//!
//! let formatter = GlucoseFormatter::new(GlucoseUnit::Mmol, offset);
//! assert_eq!(formatter.value(126.0), "7.0 mmol/L");
//! ```

/// Text reports for each tool
pub mod reports;

use chrono::{DateTime, FixedOffset, Utc};
use nightscout_core::units::GlucoseUnit;
use nightscout_intelligence::TirConfig;

/// Formats glucose values and instants for one display unit and offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlucoseFormatter {
    unit: GlucoseUnit,
    offset: FixedOffset,
}

impl GlucoseFormatter {
    /// Create a formatter
    #[must_use]
    pub const fn new(unit: GlucoseUnit, offset: FixedOffset) -> Self {
        Self { unit, offset }
    }

    /// Display unit
    #[must_use]
    pub const fn unit(&self) -> GlucoseUnit {
        self.unit
    }

    /// Reporting offset
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Value in the display unit, rounded for display (integer mg/dL or 1 dp mmol/L)
    #[must_use]
    pub fn display_value(&self, value_mgdl: f64) -> f64 {
        match self.unit {
            GlucoseUnit::MgDl => value_mgdl.round(),
            GlucoseUnit::Mmol => round1(self.unit.from_mgdl(value_mgdl)),
        }
    }

    /// Value without unit label
    #[must_use]
    pub fn short(&self, value_mgdl: f64) -> String {
        match self.unit {
            GlucoseUnit::MgDl => format!("{:.0}", value_mgdl.round()),
            GlucoseUnit::Mmol => format!("{:.1}", self.unit.from_mgdl(value_mgdl)),
        }
    }

    /// Value with unit label
    #[must_use]
    pub fn value(&self, value_mgdl: f64) -> String {
        format!("{} {}", self.short(value_mgdl), self.unit.label())
    }

    /// Signed change between readings
    #[must_use]
    pub fn delta(&self, delta_mgdl: f64) -> String {
        let sign = if delta_mgdl < 0.0 { "-" } else { "+" };
        format!("{sign}{}", self.short(delta_mgdl.abs()))
    }

    /// `low-high unit` label for a target range
    #[must_use]
    pub fn range_label(&self, tir: &TirConfig) -> String {
        format!(
            "{}-{} {}",
            self.short(tir.low_mgdl()),
            self.short(tir.high_mgdl()),
            self.unit.label()
        )
    }

    /// `YYYY-MM-DD HH:MM` in the reporting offset
    #[must_use]
    pub fn local_time(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }

    /// `MM-DD HH:MM` in the reporting offset
    #[must_use]
    pub fn short_time(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%m-%d %H:%M")
            .to_string()
    }

    /// `YYYY-MM-DD` in the reporting offset
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.offset)
            .format("%Y-%m-%d")
            .to_string()
    }

    /// `UTC` or `UTC+HH:MM`
    #[must_use]
    pub fn offset_label(&self) -> String {
        if self.offset.local_minus_utc() == 0 {
            "UTC".to_owned()
        } else {
            format!("UTC{}", self.offset)
        }
    }
}

/// How long ago `instant` was, relative to `now`
#[must_use]
pub fn age(now: DateTime<Utc>, instant: DateTime<Utc>) -> String {
    let minutes = (now - instant).num_minutes();
    match minutes {
        m if m < 0 => "in the future".to_owned(),
        0 => "just now".to_owned(),
        m if m < 60 => format!("{m} min ago"),
        m if m < 24 * 60 => format!("{} h {} min ago", m / 60, m % 60),
        m => format!("{} d ago", m / (24 * 60)),
    }
}

/// Integer with thousands separators
#[must_use]
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Insulin or carb amount without a trailing `.0`
#[must_use]
pub fn amount(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Round to one decimal place
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn mmol() -> GlucoseFormatter {
        GlucoseFormatter::new(GlucoseUnit::Mmol, FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_value_rendering_per_unit() {
        assert_eq!(mmol().value(126.0), "7.0 mmol/L");
        let mgdl = GlucoseFormatter::new(GlucoseUnit::MgDl, FixedOffset::east_opt(0).unwrap());
        assert_eq!(mgdl.value(126.4), "126 mg/dL");
        assert!((mgdl.display_value(126.6) - 127.0).abs() < f64::EPSILON);
        assert!((mmol().display_value(126.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delta_is_signed() {
        assert_eq!(mmol().delta(5.4), "+0.3");
        assert_eq!(mmol().delta(-5.4), "-0.3");
        assert_eq!(mmol().delta(0.0), "+0.0");
    }

    #[test]
    fn test_local_time_uses_offset() {
        let formatter = GlucoseFormatter::new(
            GlucoseUnit::Mmol,
            FixedOffset::east_opt(2 * 3600).unwrap(),
        );
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 23, 30, 0).unwrap();
        assert_eq!(formatter.local_time(instant), "2025-03-02 01:30");
        assert_eq!(formatter.offset_label(), "UTC+02:00");
        assert_eq!(mmol().offset_label(), "UTC");
    }

    #[test]
    fn test_age_and_grouping() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(age(now, now), "just now");
        assert_eq!(age(now, now - Duration::minutes(7)), "7 min ago");
        assert_eq!(age(now, now - Duration::minutes(125)), "2 h 5 min ago");
        assert_eq!(age(now, now - Duration::days(3)), "3 d ago");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(amount(4.0), "4");
        assert_eq!(amount(4.5), "4.5");
    }
}

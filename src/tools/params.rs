// ABOUTME: Tool argument access with aliases, numeric bounds, and date parsing
// ABOUTME: All validation happens here before any upstream request is issued
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Tool Parameters
//!
//! Arguments arrive as an untyped JSON object. Integers are accepted as JSON
//! numbers (integral floats included) or numeric strings. Several parameters
//! have a camelCase alias (`tir_goal` / `tirGoal`).
//!
//! Date inputs come in three shapes, interpreted in the reporting offset:
//! `YYYY-MM-DD`, `YYYY-MM`, and relative `Nd`, `Nw`, `Nm` (30 days) or
//! `Ny` (365 days) before now.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use nightscout_core::models::DateRange;
use nightscout_intelligence::month_range;
use serde_json::{json, Map, Value};

use crate::errors::{AppError, AppResult, ToolError};

/// Largest relative offset accepted, in days
const MAX_RELATIVE_DAYS: i64 = 100_000;

/// Validated view of a tool's arguments object
#[derive(Debug, Clone)]
pub struct ToolArgs {
    tool: &'static str,
    values: Map<String, Value>,
}

impl ToolArgs {
    /// Accept an arguments object, treating `null` as empty
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `args` is neither an object nor `null`
    pub fn parse(tool: &'static str, args: Value) -> AppResult<Self> {
        match args {
            Value::Object(values) => Ok(Self { tool, values }),
            Value::Null => Ok(Self {
                tool,
                values: Map::new(),
            }),
            other => Err(AppError::invalid_input(format!(
                "Arguments for '{tool}' must be an object, got {other}"
            ))),
        }
    }

    /// First non-null value among `names`
    #[must_use]
    pub fn get(&self, names: &[&str]) -> Option<&Value> {
        names
            .iter()
            .find_map(|name| self.values.get(*name).filter(|value| !value.is_null()))
    }

    /// Integer within `[min, max]`, `default` when absent
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a non-integer and `ValueOutOfRange` outside the bounds
    pub fn bounded_u32(&self, names: &[&str], default: u32, min: u32, max: u32) -> AppResult<u32> {
        match self.get(names) {
            None => Ok(default),
            Some(value) => {
                let parsed = self.integer(names, value)?;
                self.check_bounds(names, parsed, i64::from(min), i64::from(max))?;
                u32::try_from(parsed).map_err(|_| self.out_of_range(names, parsed, min, max))
            }
        }
    }

    /// Required integer within `[min, max]`
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` when absent, otherwise as [`Self::bounded_u32`]
    pub fn required_i32(&self, names: &[&str], min: i32, max: i32) -> AppResult<i32> {
        let value = self
            .get(names)
            .ok_or_else(|| ToolError::missing_parameter(self.tool, primary(names)))?;
        let parsed = self.integer(names, value)?;
        self.check_bounds(names, parsed, i64::from(min), i64::from(max))?;
        i32::try_from(parsed).map_err(|_| self.out_of_range(names, parsed, min, max))
    }

    /// Non-empty string argument
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the value is not a string
    pub fn optional_str(&self, names: &[&str]) -> AppResult<Option<&str>> {
        match self.get(names) {
            None => Ok(None),
            Some(Value::String(text)) => {
                let trimmed = text.trim();
                Ok((!trimmed.is_empty()).then_some(trimmed))
            }
            Some(other) => Err(AppError::invalid_input(format!(
                "Parameter '{}' must be a string, got {other}",
                primary(names)
            ))
            .with_details(json!({ "tool": self.tool, "parameter": primary(names) }))),
        }
    }

    fn integer(&self, names: &[&str], value: &Value) -> AppResult<i64> {
        as_integer(value).ok_or_else(|| {
            AppError::invalid_input(format!(
                "Parameter '{}' must be an integer, got {value}",
                primary(names)
            ))
            .with_details(json!({ "tool": self.tool, "parameter": primary(names) }))
        })
    }

    fn check_bounds(&self, names: &[&str], value: i64, min: i64, max: i64) -> AppResult<()> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(self.out_of_range(names, value, min, max))
        }
    }

    fn out_of_range(
        &self,
        names: &[&str],
        value: i64,
        min: impl Into<i64>,
        max: impl Into<i64>,
    ) -> AppError {
        let (min, max) = (min.into(), max.into());
        AppError::from(ToolError::invalid_parameter(
            self.tool,
            primary(names),
            format!("{value} is outside {min}..={max}"),
        ))
        .with_details(json!({
            "tool": self.tool,
            "parameter": primary(names),
            "value": value,
            "minimum": min,
            "maximum": max,
        }))
    }
}

fn primary<'a>(names: &[&'a str]) -> &'a str {
    names.first().copied().unwrap_or("argument")
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.fract().abs() < f64::EPSILON && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// A parsed date input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpec {
    /// `YYYY-MM-DD`
    Day(NaiveDate),
    /// `YYYY-MM`
    Month {
        /// Calendar year
        year: i32,
        /// Calendar month, 1-12
        month: u32,
    },
    /// `Nd`, `Nw`, `Nm`, `Ny` before now
    Relative(Duration),
}

impl DateSpec {
    /// Parse a date input
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for anything that is not one of the three shapes
    pub fn parse(input: &str) -> AppResult<Self> {
        let input = input.trim();
        let invalid = || {
            AppError::invalid_input(format!(
                "Invalid date '{input}': expected YYYY-MM-DD, YYYY-MM, or a relative period like 7d, 2w, 3m, 1y"
            ))
        };

        if let Some(spec) = parse_relative(input)? {
            return Ok(spec);
        }

        match input.len() {
            10 => NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .map(Self::Day)
                .map_err(|_| invalid()),
            7 => {
                let (year, month) = input.split_once('-').ok_or_else(invalid)?;
                let year: i32 = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if year < 1 || !(1..=12).contains(&month) {
                    return Err(invalid());
                }
                Ok(Self::Month { year, month })
            }
            _ => Err(invalid()),
        }
    }

    /// First instant the input refers to
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the date cannot be represented
    pub fn start(&self, offset: FixedOffset, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        match *self {
            Self::Day(day) => local_midnight(day, offset),
            Self::Month { year, month } => Ok(month_bounds(year, month, offset)?.start()),
            Self::Relative(period) => Ok(now - period),
        }
    }

    /// End instant (exclusive) when the input is used as a range end
    ///
    /// A day ends at the next midnight and a month at the first instant of
    /// the next month.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the date cannot be represented
    pub fn end(&self, offset: FixedOffset, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        match *self {
            Self::Day(day) => {
                let next = day
                    .succ_opt()
                    .ok_or_else(|| AppError::invalid_input(format!("Date {day} is out of range")))?;
                local_midnight(next, offset)
            }
            Self::Month { year, month } => Ok(month_bounds(year, month, offset)?.end()),
            Self::Relative(period) => Ok(now - period),
        }
    }
}

fn parse_relative(input: &str) -> AppResult<Option<DateSpec>> {
    let Some(unit) = input.chars().last() else {
        return Ok(None);
    };
    let days_per_unit = match unit.to_ascii_lowercase() {
        'd' => 1,
        'w' => 7,
        'm' => 30,
        'y' => 365,
        _ => return Ok(None),
    };
    let digits = &input[..input.len() - unit.len_utf8()];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let count: i64 = digits
        .parse()
        .map_err(|_| AppError::out_of_range(format!("Relative period '{input}' is too large")))?;
    if count == 0 {
        return Err(AppError::invalid_input(format!(
            "Relative period '{input}' must be at least 1"
        )));
    }
    let days = count
        .checked_mul(days_per_unit)
        .filter(|days| *days <= MAX_RELATIVE_DAYS)
        .ok_or_else(|| AppError::out_of_range(format!("Relative period '{input}' is too large")))?;
    Ok(Some(DateSpec::Relative(Duration::days(days))))
}

fn local_midnight(day: NaiveDate, offset: FixedOffset) -> AppResult<DateTime<Utc>> {
    offset
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| AppError::invalid_input(format!("Date {day} cannot be represented")))
}

fn month_bounds(year: i32, month: u32, offset: FixedOffset) -> AppResult<DateRange> {
    month_range(year, month, offset)
        .ok_or_else(|| AppError::invalid_input(format!("Month {year:04}-{month:02} is out of range")))
}

/// Resolve `from`/`to` inputs into a half-open range ending no later than `now`
///
/// # Errors
///
/// Returns a validation error when either input is malformed, the start is in
/// the future, the start is not before the end, or the span exceeds `max_days`
pub fn resolve_range(
    from: &str,
    to: Option<&str>,
    offset: FixedOffset,
    now: DateTime<Utc>,
    max_days: u32,
) -> AppResult<DateRange> {
    let start = DateSpec::parse(from)?.start(offset, now)?;
    let end = match to {
        Some(to) => DateSpec::parse(to)?.end(offset, now)?,
        None => now,
    }
    .min(now);

    if start > now {
        return Err(AppError::out_of_range(format!(
            "Start date '{from}' is in the future"
        )));
    }
    if start >= end {
        return Err(AppError::invalid_input(format!(
            "Start date '{from}' must be before end date '{}'",
            to.unwrap_or("now")
        )));
    }
    let range = DateRange::new(start, end)?;
    check_span(&range, max_days)?;
    Ok(range)
}

/// Window covering calendar months `from_month..=to_month` of `year`, ending no later than `now`
///
/// # Errors
///
/// Returns a validation error when the months are inverted or the window starts in the future
pub fn monthly_window(
    year: i32,
    from_month: u32,
    to_month: u32,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> AppResult<DateRange> {
    if from_month > to_month {
        return Err(AppError::invalid_input(format!(
            "from_month ({from_month}) must not be after to_month ({to_month})"
        )));
    }
    let start = month_bounds(year, from_month, offset)?.start();
    let end = month_bounds(year, to_month, offset)?.end().min(now);
    if start >= end {
        return Err(AppError::out_of_range(format!(
            "{year:04}-{from_month:02} is in the future"
        )));
    }
    DateRange::new(start, end)
}

/// Reject ranges longer than `max_days`
///
/// # Errors
///
/// Returns `ValueOutOfRange` when the range is too long
pub fn check_span(range: &DateRange, max_days: u32) -> AppResult<()> {
    if range.days() > f64::from(max_days) {
        return Err(AppError::out_of_range(format!(
            "Date range of {:.0} days exceeds the maximum of {max_days} days",
            range.days().ceil()
        ))
        .with_details(json!({ "days": range.days(), "max_days": max_days })));
    }
    Ok(())
}

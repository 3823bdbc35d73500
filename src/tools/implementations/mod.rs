// ABOUTME: Module containing all MCP tool implementations organized by category.
// ABOUTME: Each submodule corresponds to a tool category with feature flag support.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Tool Implementations
//!
//! This module contains all MCP tool implementations, organized by category:
//!
//! - `glucose` - Latest reading and recent history
//! - `analytics` - Date-range and monthly statistics
//! - `care` - Treatments and device status
//! - `system` - Nightscout server status
//!
//! Each category is conditionally compiled based on feature flags.

// Glucose tools: glucose_current, glucose_history
#[cfg(feature = "tools-glucose")]
pub mod glucose;

// Analytics tools: analyze, analyze_monthly
#[cfg(feature = "tools-analytics")]
pub mod analytics;

// Care tools: treatments, devices
#[cfg(feature = "tools-care")]
pub mod care;

// System tools: status
#[cfg(feature = "tools-system")]
pub mod system;

use nightscout_core::errors::ErrorCode;
use nightscout_core::models::{DateRange, Reading};
use nightscout_intelligence::{AnalysisResult, GlucoseAnalyzer};
use serde_json::{json, Value};

use crate::errors::AppResult;
use crate::formatters::{round1, GlucoseFormatter};
use crate::logging::AppLogger;

use super::context::ToolExecutionContext;
use super::result::ToolResult;

/// Readings fetched for one window
pub(crate) struct FetchedReadings {
    /// Ascending readings
    pub readings: Vec<Reading>,
    /// The provider hit its page limit before reaching the window start
    pub truncated: bool,
}

/// Readings in `range`, ascending
pub(crate) async fn fetch_readings(
    context: &ToolExecutionContext,
    range: &DateRange,
) -> AppResult<FetchedReadings> {
    let batch = context.resources.provider.readings_in_range(range).await?;
    if batch.skipped > 0 {
        AppLogger::log_skipped_records("entries", batch.skipped);
    }
    Ok(FetchedReadings {
        readings: batch.items,
        truncated: batch.truncated,
    })
}

/// Record on `result` whether its window was only partly fetched
pub(crate) fn mark_coverage(
    mut result: ToolResult,
    fetched: &FetchedReadings,
    formatter: &GlucoseFormatter,
) -> ToolResult {
    result.content["truncated"] = Value::Bool(fetched.truncated);
    if fetched.truncated {
        let covered_from = fetched.readings.first().map(|reading| reading.timestamp);
        result.content["covered_from"] =
            covered_from.map_or(Value::Null, |instant| Value::String(instant.to_rfc3339()));
        let notice = formatter.truncated_notice(covered_from);
        result.text = Some(match result.text.take() {
            Some(text) => format!("{text}\n\n{notice}"),
            None => notice,
        });
    }
    result
}

/// Analysis of `readings`, `None` when no reading is valid
pub(crate) fn analyze_readings(
    analyzer: &GlucoseAnalyzer,
    readings: &[Reading],
    period_days: f64,
) -> AppResult<Option<AnalysisResult>> {
    match analyzer.analyze(readings, period_days) {
        Ok(result) => Ok(Some(result)),
        Err(error) if error.code == ErrorCode::InsufficientData => Ok(None),
        Err(error) => Err(error),
    }
}

/// Non-error result for a window without valid readings
pub(crate) fn insufficient_data_result(
    text: String,
    range: &DateRange,
    readings: &[Reading],
    mut extra: Value,
) -> ToolResult {
    let mut content = json!({
        "insufficient_data": true,
        "range": range_json(range),
        "reading_count": 0,
        "excluded_count": readings.len(),
    });
    if let (Some(content), Some(extra)) = (content.as_object_mut(), extra.as_object_mut()) {
        content.append(extra);
    }
    ToolResult::with_text(text, content)
}

pub(crate) fn range_json(range: &DateRange) -> Value {
    json!({
        "start": range.start().to_rfc3339(),
        "end": range.end().to_rfc3339(),
        "days": round1(range.days()),
    })
}

pub(crate) fn reading_json(formatter: &GlucoseFormatter, reading: &Reading) -> Value {
    json!({
        "timestamp": reading.timestamp.to_rfc3339(),
        "local_time": formatter.local_time(reading.timestamp),
        "value_mgdl": reading.value_mgdl,
        "value": formatter.display_value(reading.value_mgdl),
        "unit": formatter.unit().label(),
        "direction": reading.direction,
        "arrow": reading.direction.arrow(),
        "delta_mgdl": reading.delta_mgdl,
        "delta": reading.delta_mgdl.map(|delta| formatter.display_value(delta)),
        "device": reading.device,
    })
}

/// Serialized statistics plus their display-unit counterparts
pub(crate) fn analysis_json(
    formatter: &GlucoseFormatter,
    result: &AnalysisResult,
) -> AppResult<Value> {
    let mut value = serde_json::to_value(result)?;
    value["low_confidence"] = Value::Bool(result.confidence.is_low());
    value["display"] = json!({
        "unit": formatter.unit().label(),
        "mean": formatter.display_value(result.mean_mgdl),
        "std_dev": formatter.display_value(result.std_dev_mgdl),
        "min": formatter.display_value(result.min_mgdl),
        "max": formatter.display_value(result.max_mgdl),
        "target_low": formatter.display_value(result.target.low_mgdl()),
        "target_high": formatter.display_value(result.target.high_mgdl()),
    });
    Ok(value)
}

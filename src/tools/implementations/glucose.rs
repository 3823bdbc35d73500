// ABOUTME: Glucose reading tools for the latest value and recent history.
// ABOUTME: Implements glucose_current and glucose_history.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Glucose Tools
//!
//! - `GlucoseCurrentTool` - Latest sensor reading with trend and age
//! - `GlucoseHistoryTool` - Window statistics and the most recent readings

use async_trait::async_trait;
use nightscout_core::constants::limits::{
    HISTORY_COUNT_DEFAULT, HISTORY_COUNT_MAX, HISTORY_COUNT_MIN, HISTORY_DISPLAY_MAX,
    HISTORY_HOURS_DEFAULT, HISTORY_HOURS_MAX, HISTORY_HOURS_MIN,
};
use nightscout_core::constants::tools::{GLUCOSE_CURRENT, GLUCOSE_HISTORY};
use nightscout_core::models::{DateRange, Reading};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::params::ToolArgs;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

use super::{
    analysis_json, analyze_readings, fetch_readings, insufficient_data_result, mark_coverage,
    range_json, reading_json,
};

// ============================================================================
// GlucoseCurrentTool
// ============================================================================

/// Tool returning the latest glucose reading.
pub struct GlucoseCurrentTool;

#[async_trait]
impl McpTool for GlucoseCurrentTool {
    fn name(&self) -> &'static str {
        GLUCOSE_CURRENT
    }

    fn description(&self) -> &'static str {
        "Get the latest glucose reading with trend arrow, change since the previous reading, uploading device, and how long ago it was taken"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_GLUCOSE
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        ToolArgs::parse(self.name(), args)?;
        let formatter = ctx.resources.formatter();

        let Some(reading) = ctx.resources.provider.latest_reading().await? else {
            return Ok(ToolResult::with_text(
                "No glucose readings available",
                json!({ "reading": null }),
            ));
        };

        let age_minutes = (ctx.now - reading.timestamp).num_minutes();
        Ok(ToolResult::with_text(
            formatter.current_reading(&reading, ctx.now),
            json!({
                "reading": reading_json(&formatter, &reading),
                "age_minutes": age_minutes,
            }),
        ))
    }
}

// ============================================================================
// GlucoseHistoryTool
// ============================================================================

/// Tool summarising the last few hours of readings.
pub struct GlucoseHistoryTool;

#[async_trait]
impl McpTool for GlucoseHistoryTool {
    fn name(&self) -> &'static str {
        GLUCOSE_HISTORY
    }

    fn description(&self) -> &'static str {
        "Get glucose readings for the last N hours with average, min/max, time in range, and variability"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                (
                    "hours",
                    PropertySchema::integer(
                        "How many hours back to look",
                        i64::from(HISTORY_HOURS_MIN),
                        i64::from(HISTORY_HOURS_MAX),
                        Some(i64::from(HISTORY_HOURS_DEFAULT)),
                    ),
                ),
                (
                    "count",
                    PropertySchema::integer(
                        "Maximum number of readings to return",
                        i64::from(HISTORY_COUNT_MIN),
                        i64::from(HISTORY_COUNT_MAX),
                        Some(i64::from(HISTORY_COUNT_DEFAULT)),
                    ),
                ),
            ],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_GLUCOSE | ToolCapabilities::ANALYTICS | ToolCapabilities::PAGINATED
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::parse(self.name(), args)?;
        let hours = args.bounded_u32(
            &["hours"],
            HISTORY_HOURS_DEFAULT,
            HISTORY_HOURS_MIN,
            HISTORY_HOURS_MAX,
        )?;
        let count = args.bounded_u32(
            &["count"],
            HISTORY_COUNT_DEFAULT,
            HISTORY_COUNT_MIN,
            HISTORY_COUNT_MAX,
        )?;

        let range = DateRange::trailing_hours(ctx.now, hours);
        let fetched = fetch_readings(ctx, &range).await?;
        let readings = &fetched.readings;
        debug!(hours, fetched = readings.len(), "fetched glucose history");

        let formatter = ctx.resources.formatter();
        let Some(result) =
            analyze_readings(&ctx.resources.analyzer(), readings, f64::from(hours) / 24.0)?
        else {
            let outcome = insufficient_data_result(
                format!("No data for the last {hours} hours"),
                &range,
                readings,
                json!({ "hours": hours, "readings": [] }),
            );
            return Ok(mark_coverage(outcome, &fetched, &formatter));
        };

        let recent: Vec<Reading> = readings
            .iter()
            .rev()
            .filter(|reading| reading.is_valid())
            .take(count as usize)
            .cloned()
            .collect();

        let outcome = ToolResult::with_text(
            formatter.history(hours, &result, &recent, HISTORY_DISPLAY_MAX),
            json!({
                "insufficient_data": false,
                "hours": hours,
                "range": range_json(&range),
                "statistics": analysis_json(&formatter, &result)?,
                "readings": recent
                    .iter()
                    .map(|reading| reading_json(&formatter, reading))
                    .collect::<Vec<_>>(),
            }),
        );
        Ok(mark_coverage(outcome, &fetched, &formatter))
    }
}

// ============================================================================
// Module exports
// ============================================================================

/// Create all glucose tools for registration
#[must_use]
pub fn create_glucose_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(GlucoseCurrentTool), Box::new(GlucoseHistoryTool)]
}

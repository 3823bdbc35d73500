// ABOUTME: Care log tools for treatments and uploader/pump device status.
// ABOUTME: Implements treatments and devices.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Care Tools
//!
//! - `TreatmentsTool` - Insulin, carbs, and care events with totals
//! - `DevicesTool` - Battery and reservoir levels of uploaders and pumps

use async_trait::async_trait;
use chrono::Duration;
use nightscout_core::constants::limits::{
    DEVICE_COUNT_DEFAULT, DEVICE_COUNT_MAX, DEVICE_COUNT_MIN, TREATMENT_COUNT_DEFAULT,
    TREATMENT_COUNT_MAX, TREATMENT_COUNT_MIN, TREATMENT_HOURS_DEFAULT, TREATMENT_HOURS_MAX,
    TREATMENT_HOURS_MIN,
};
use nightscout_core::constants::tools::{DEVICES, TREATMENTS};
use nightscout_core::models::{DeviceStatus, Treatment};
use serde_json::{json, Value};

use crate::errors::AppResult;
use crate::formatters::{round1, GlucoseFormatter};
use crate::logging::AppLogger;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::params::ToolArgs;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

fn treatment_json(formatter: &GlucoseFormatter, treatment: &Treatment) -> Value {
    json!({
        "timestamp": treatment.timestamp.to_rfc3339(),
        "local_time": formatter.local_time(treatment.timestamp),
        "event_type": treatment.kind.label(),
        "insulin_units": treatment.insulin_units,
        "carbs_grams": treatment.carbs_grams,
        "duration_minutes": treatment.duration_minutes,
        "notes": treatment.notes,
        "entered_by": treatment.entered_by,
    })
}

fn device_json(formatter: &GlucoseFormatter, status: &DeviceStatus) -> Value {
    json!({
        "timestamp": status.timestamp.to_rfc3339(),
        "local_time": formatter.local_time(status.timestamp),
        "kind": status.kind,
        "device": status.device,
        "battery_pct": status.battery_pct,
        "reservoir_units": status.reservoir_units,
    })
}

// ============================================================================
// TreatmentsTool
// ============================================================================

/// Tool listing recent treatments.
pub struct TreatmentsTool;

#[async_trait]
impl McpTool for TreatmentsTool {
    fn name(&self) -> &'static str {
        TREATMENTS
    }

    fn description(&self) -> &'static str {
        "Get recent treatments (insulin boluses, carbs, temp basals, site and sensor changes, notes) with insulin and carb totals"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                (
                    "hours",
                    PropertySchema::integer(
                        "How many hours back to look",
                        i64::from(TREATMENT_HOURS_MIN),
                        i64::from(TREATMENT_HOURS_MAX),
                        Some(i64::from(TREATMENT_HOURS_DEFAULT)),
                    ),
                ),
                (
                    "count",
                    PropertySchema::integer(
                        "Maximum number of treatments",
                        i64::from(TREATMENT_COUNT_MIN),
                        i64::from(TREATMENT_COUNT_MAX),
                        Some(i64::from(TREATMENT_COUNT_DEFAULT)),
                    ),
                ),
            ],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_TREATMENTS
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::parse(self.name(), args)?;
        let hours = args.bounded_u32(
            &["hours"],
            TREATMENT_HOURS_DEFAULT,
            TREATMENT_HOURS_MIN,
            TREATMENT_HOURS_MAX,
        )?;
        let count = args.bounded_u32(
            &["count"],
            TREATMENT_COUNT_DEFAULT,
            TREATMENT_COUNT_MIN,
            TREATMENT_COUNT_MAX,
        )?;

        let since = ctx.now - Duration::hours(i64::from(hours));
        let batch = ctx
            .resources
            .provider
            .treatments_since(since, count)
            .await?;
        if batch.skipped > 0 {
            AppLogger::log_skipped_records("treatments", batch.skipped);
        }

        let formatter = ctx.resources.formatter();
        let treatments = batch.items;
        let total_insulin: f64 = treatments.iter().filter_map(|t| t.insulin_units).sum();
        let total_carbs: f64 = treatments.iter().filter_map(|t| t.carbs_grams).sum();

        Ok(ToolResult::with_text(
            formatter.treatments(hours, &treatments),
            json!({
                "hours": hours,
                "since": since.to_rfc3339(),
                "count": treatments.len(),
                "skipped": batch.skipped,
                "treatments": treatments
                    .iter()
                    .map(|treatment| treatment_json(&formatter, treatment))
                    .collect::<Vec<_>>(),
                "totals": {
                    "insulin_units": round1(total_insulin),
                    "carbs_grams": round1(total_carbs),
                },
            }),
        ))
    }
}

// ============================================================================
// DevicesTool
// ============================================================================

/// Tool reporting uploader and pump status.
pub struct DevicesTool;

#[async_trait]
impl McpTool for DevicesTool {
    fn name(&self) -> &'static str {
        DEVICES
    }

    fn description(&self) -> &'static str {
        "Get recent device status records: uploader and pump battery levels and pump reservoir"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![(
                "count",
                PropertySchema::integer(
                    "Number of status records",
                    i64::from(DEVICE_COUNT_MIN),
                    i64::from(DEVICE_COUNT_MAX),
                    Some(i64::from(DEVICE_COUNT_DEFAULT)),
                ),
            )],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_DEVICES
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::parse(self.name(), args)?;
        let count = args.bounded_u32(
            &["count"],
            DEVICE_COUNT_DEFAULT,
            DEVICE_COUNT_MIN,
            DEVICE_COUNT_MAX,
        )?;

        let batch = ctx.resources.provider.device_status(count).await?;
        if batch.skipped > 0 {
            AppLogger::log_skipped_records("devicestatus", batch.skipped);
        }

        let formatter = ctx.resources.formatter();
        Ok(ToolResult::with_text(
            formatter.devices(&batch.items),
            json!({
                "count": batch.items.len(),
                "skipped": batch.skipped,
                "devices": batch
                    .items
                    .iter()
                    .map(|status| device_json(&formatter, status))
                    .collect::<Vec<_>>(),
            }),
        ))
    }
}

// ============================================================================
// Module exports
// ============================================================================

/// Create all care tools for registration
#[must_use]
pub fn create_care_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(TreatmentsTool), Box::new(DevicesTool)]
}

// ABOUTME: Glucose statistics tools over arbitrary date ranges and calendar months.
// ABOUTME: Implements analyze and analyze_monthly on top of the statistics engine.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Analytics Tools
//!
//! - `AnalyzeTool` - TIR, variability, HbA1c and goal assessment for a date range
//! - `AnalyzeMonthlyTool` - The same statistics per calendar month of one year
//!
//! Both validate every argument before the first upstream request.

use async_trait::async_trait;
use chrono::Datelike;
use nightscout_core::constants::limits::{
    ANALYZE_DEFAULT_FROM, ANALYZE_TIR_GOAL_DEFAULT, MONTHLY_TIR_GOAL_DEFAULT, MONTHLY_YEAR_MIN,
    TIR_GOAL_MAX, TIR_GOAL_MIN,
};
use nightscout_core::constants::tools::{ANALYZE, ANALYZE_MONTHLY};
use nightscout_intelligence::{GoalAssessment, MonthlySummary};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AppResult;
use crate::mcp::schema::{JsonSchema, PropertySchema};
use crate::tools::context::ToolExecutionContext;
use crate::tools::params::{monthly_window, resolve_range, ToolArgs};
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

use super::{
    analysis_json, analyze_readings, fetch_readings, insufficient_data_result, mark_coverage,
    range_json,
};

const TIR_GOAL_NAMES: [&str; 2] = ["tir_goal", "tirGoal"];

fn tir_goal_schema(default: u32) -> PropertySchema {
    PropertySchema::integer(
        "Time-in-range goal in percent",
        i64::from(TIR_GOAL_MIN),
        i64::from(TIR_GOAL_MAX),
        Some(i64::from(default)),
    )
}

// ============================================================================
// AnalyzeTool
// ============================================================================

/// Tool analysing an arbitrary date range.
pub struct AnalyzeTool;

#[async_trait]
impl McpTool for AnalyzeTool {
    fn name(&self) -> &'static str {
        ANALYZE
    }

    fn description(&self) -> &'static str {
        "Analyze glucose over a date range: time in range, time below/above range, average, standard deviation, CV, estimated HbA1c, and assessment against a TIR goal"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                (
                    "start_date",
                    PropertySchema::string(
                        "Start of the period: YYYY-MM-DD, YYYY-MM, or relative (7d, 2w, 3m, 1y). Alias: from",
                        Some(ANALYZE_DEFAULT_FROM),
                    ),
                ),
                (
                    "end_date",
                    PropertySchema::string(
                        "End of the period (inclusive day or month), defaults to now. Alias: to",
                        None,
                    ),
                ),
                ("tir_goal", tir_goal_schema(ANALYZE_TIR_GOAL_DEFAULT)),
            ],
            &[],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_GLUCOSE | ToolCapabilities::ANALYTICS | ToolCapabilities::PAGINATED
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let args = ToolArgs::parse(self.name(), args)?;
        let from = args
            .optional_str(&["start_date", "from"])?
            .unwrap_or(ANALYZE_DEFAULT_FROM);
        let to = args.optional_str(&["end_date", "to"])?;
        let goal = args.bounded_u32(
            &TIR_GOAL_NAMES,
            ANALYZE_TIR_GOAL_DEFAULT,
            TIR_GOAL_MIN,
            TIR_GOAL_MAX,
        )?;

        let glucose = &ctx.resources.config.glucose;
        let range = resolve_range(
            from,
            to,
            glucose.utc_offset,
            ctx.now,
            glucose.max_analysis_days,
        )?;

        let fetched = fetch_readings(ctx, &range).await?;
        let readings = &fetched.readings;
        debug!(from, to, fetched = readings.len(), "fetched readings for analysis");

        let formatter = ctx.resources.formatter();
        let Some(result) = analyze_readings(&ctx.resources.analyzer(), readings, range.days())?
        else {
            let outcome = insufficient_data_result(
                formatter.insufficient_data(&range, readings.len()),
                &range,
                readings,
                json!({ "tir_goal": goal }),
            );
            return Ok(mark_coverage(outcome, &fetched, &formatter));
        };

        let assessment = GoalAssessment::evaluate(&result, f64::from(goal));
        let outcome = ToolResult::with_text(
            formatter.analysis(&range, &result, &assessment),
            json!({
                "insufficient_data": false,
                "range": range_json(&range),
                "tir_goal": goal,
                "analysis": analysis_json(&formatter, &result)?,
                "assessment": assessment,
            }),
        );
        Ok(mark_coverage(outcome, &fetched, &formatter))
    }
}

// ============================================================================
// AnalyzeMonthlyTool
// ============================================================================

/// Tool breaking one year down by calendar month.
pub struct AnalyzeMonthlyTool;

#[async_trait]
impl McpTool for AnalyzeMonthlyTool {
    fn name(&self) -> &'static str {
        ANALYZE_MONTHLY
    }

    fn description(&self) -> &'static str {
        "Month-by-month glucose statistics for one year with averages and the best and worst months by time in range"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::object(
            vec![
                (
                    "year",
                    PropertySchema::integer(
                        "Calendar year to analyze",
                        i64::from(MONTHLY_YEAR_MIN),
                        9999,
                        None,
                    ),
                ),
                (
                    "from_month",
                    PropertySchema::integer("First month (1-12). Alias: fromMonth", 1, 12, Some(1)),
                ),
                (
                    "to_month",
                    PropertySchema::integer("Last month (1-12). Alias: toMonth", 1, 12, Some(12)),
                ),
                ("tir_goal", tir_goal_schema(MONTHLY_TIR_GOAL_DEFAULT)),
            ],
            &["year"],
        )
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_GLUCOSE | ToolCapabilities::ANALYTICS | ToolCapabilities::PAGINATED
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        let glucose = &ctx.resources.config.glucose;
        let current_year = ctx.now.with_timezone(&glucose.utc_offset).year();

        let args = ToolArgs::parse(self.name(), args)?;
        let year = args.required_i32(&["year"], MONTHLY_YEAR_MIN, current_year)?;
        let from_month = args.bounded_u32(&["from_month", "fromMonth"], 1, 1, 12)?;
        let to_month = args.bounded_u32(&["to_month", "toMonth"], 12, 1, 12)?;
        let goal = args.bounded_u32(
            &TIR_GOAL_NAMES,
            MONTHLY_TIR_GOAL_DEFAULT,
            TIR_GOAL_MIN,
            TIR_GOAL_MAX,
        )?;

        let window = monthly_window(year, from_month, to_month, glucose.utc_offset, ctx.now)?;
        let fetched = fetch_readings(ctx, &window).await?;
        let readings = &fetched.readings;
        debug!(year, from_month, to_month, fetched = readings.len(), "fetched readings for monthly analysis");

        let formatter = ctx.resources.formatter();
        let months =
            ctx.resources
                .analyzer()
                .analyze_monthly(readings, &window, glucose.utc_offset)?;
        let summary = MonthlySummary::from_months(&months);
        let goal_pct = f64::from(goal);

        let text = formatter.monthly(
            year,
            (from_month, to_month),
            &months,
            summary.as_ref(),
            goal_pct,
        );
        let request = json!({
            "year": year,
            "from_month": from_month,
            "to_month": to_month,
            "tir_goal": goal,
            "months": [],
            "summary": null,
        });
        if months.is_empty() {
            let outcome = insufficient_data_result(text, &window, readings, request);
            return Ok(mark_coverage(outcome, &fetched, &formatter));
        }

        let month_values = months
            .iter()
            .map(|month| {
                Ok(json!({
                    "label": month.label(),
                    "year": month.year,
                    "month": month.month,
                    "analysis": analysis_json(&formatter, &month.result)?,
                    "assessment": GoalAssessment::evaluate(&month.result, goal_pct),
                }))
            })
            .collect::<AppResult<Vec<Value>>>()?;

        let mut content = request;
        content["insufficient_data"] = Value::Bool(false);
        content["range"] = range_json(&window);
        content["months"] = Value::Array(month_values);
        content["summary"] = summary.map_or(Value::Null, |summary| {
            json!({
                "months": summary.months,
                "total_readings": summary.total_readings,
                "avg_tir_pct": summary.avg_tir_pct,
                "avg_cv_pct": summary.avg_cv_pct,
                "avg_mean_mgdl": summary.avg_mean_mgdl,
                "avg_mean": formatter.display_value(summary.avg_mean_mgdl),
                "avg_a1c_pct": summary.avg_a1c_pct,
                "best_month": summary.best_month,
                "best_tir_pct": summary.best_tir_pct,
                "worst_month": summary.worst_month,
                "worst_tir_pct": summary.worst_tir_pct,
                "goal_met": summary.avg_tir_pct >= goal_pct,
            })
        });
        Ok(mark_coverage(
            ToolResult::with_text(text, content),
            &fetched,
            &formatter,
        ))
    }
}

// ============================================================================
// Module exports
// ============================================================================

/// Create all analytics tools for registration
#[must_use]
pub fn create_analytics_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(AnalyzeTool), Box::new(AnalyzeMonthlyTool)]
}

// ABOUTME: Integration tests for the analyze and analyze_monthly tools
// ABOUTME: Checks statistics, date-range resolution, monthly breakdowns, and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use common::{call_tool, month_of_readings, readings_before, test_now, text_of, FixtureProvider};
use nightscout_core::errors::{ErrorCategory, ErrorCode};
use nightscout_core::models::Reading;
use serde_json::json;

fn provider(readings: Vec<Reading>) -> Arc<FixtureProvider> {
    Arc::new(FixtureProvider::with_readings(readings))
}

fn approx(value: &serde_json::Value, expected: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < 0.01
}

// ============================================================================
// analyze
// ============================================================================

#[tokio::test]
async fn test_analyze_default_period_is_last_seven_days() {
    let readings = readings_before(test_now(), 60, &[100.0, 100.0, 100.0, 100.0]);
    let result = call_tool(provider(readings), "analyze", json!({})).await.unwrap();

    let range = &result.content["range"];
    assert_eq!(range["end"], test_now().to_rfc3339());
    assert_eq!(range["start"], (test_now() - Duration::days(7)).to_rfc3339());
    assert_eq!(result.content["tir_goal"], 70);
    assert_eq!(result.content["truncated"], false);

    let analysis = &result.content["analysis"];
    assert!(approx(&analysis["estimated_a1c_pct"], 5.1));
    assert!(approx(&analysis["time_in_range_pct"], 100.0));
    assert_eq!(analysis["cv_pct"], 0.0);
    assert_eq!(analysis["low_confidence"], true);
    assert_eq!(result.content["assessment"]["tir_status"], "met");

    let text = text_of(&result);
    assert!(text.contains("Estimated HbA1c: 5.1%"), "unexpected text: {text}");
    assert!(text.contains("Low confidence"));
    assert!(text.contains("TIR goal of 70% achieved"));
}

#[tokio::test]
async fn test_analyze_percentages_sum_to_one_hundred() {
    let values: Vec<f64> = (0..200).map(|i| 45.0 + f64::from(i % 50) * 5.0).collect();
    let readings = readings_before(test_now(), 15, &values);
    let result = call_tool(provider(readings), "analyze", json!({ "start_date": "3d" }))
        .await
        .unwrap();

    let analysis = &result.content["analysis"];
    let sum = analysis["time_in_range_pct"].as_f64().unwrap()
        + analysis["time_below_range_pct"].as_f64().unwrap()
        + analysis["time_above_range_pct"].as_f64().unwrap();
    assert!((sum - 100.0).abs() < 0.01);

    let ranges = &analysis["ranges"];
    let bands = ["very_low_pct", "low_pct", "target_pct", "high_pct", "very_high_pct"]
        .iter()
        .map(|band| ranges[*band].as_f64().unwrap())
        .sum::<f64>();
    assert!((bands - 100.0).abs() < 0.01);
}

#[tokio::test]
async fn test_analyze_calendar_dates_are_inclusive() {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    let readings = vec![
        Reading::new(start + Duration::hours(1), 120.0),
        Reading::new(start + Duration::days(9) + Duration::hours(23), 160.0),
        Reading::new(start + Duration::days(10) + Duration::hours(1), 300.0),
    ];
    let result = call_tool(
        provider(readings),
        "analyze",
        json!({ "start_date": "2025-03-01", "end_date": "2025-03-10" }),
    )
    .await
    .unwrap();

    assert_eq!(result.content["range"]["start"], start.to_rfc3339());
    assert_eq!(
        result.content["range"]["end"],
        (start + Duration::days(10)).to_rfc3339()
    );
    assert_eq!(result.content["analysis"]["reading_count"], 2);
    assert!(approx(&result.content["analysis"]["max_mgdl"], 160.0));
}

#[tokio::test]
async fn test_analyze_accepts_aliases() {
    let readings = readings_before(test_now(), 30, &[110.0; 10]);
    let result = call_tool(
        provider(readings),
        "analyze",
        json!({ "from": "2w", "tirGoal": 90 }),
    )
    .await
    .unwrap();
    assert_eq!(result.content["tir_goal"], 90);
    assert_eq!(
        result.content["range"]["start"],
        (test_now() - Duration::days(14)).to_rfc3339()
    );
}

#[tokio::test]
async fn test_analyze_flags_partially_fetched_window() {
    let readings = readings_before(test_now(), 60, &[100.0, 110.0, 120.0]);
    let oldest = readings.iter().map(|r| r.timestamp).min().unwrap();
    let fixture = FixtureProvider {
        truncated_readings: true,
        ..FixtureProvider::with_readings(readings)
    };
    let result = call_tool(Arc::new(fixture), "analyze", json!({ "start_date": "30d" }))
        .await
        .unwrap();

    assert!(!result.is_error);
    assert_eq!(result.content["truncated"], true);
    assert_eq!(result.content["covered_from"], oldest.to_rfc3339());
    let text = text_of(&result);
    assert!(text.contains("Partial data"), "unexpected text: {text}");
}

#[tokio::test]
async fn test_monthly_flags_partially_fetched_window() {
    let fixture = FixtureProvider {
        truncated_readings: true,
        ..FixtureProvider::with_readings(month_of_readings(2024, 12, 31, 24, 110.0))
    };
    let result = call_tool(Arc::new(fixture), "analyze_monthly", json!({ "year": 2024 }))
        .await
        .unwrap();
    assert_eq!(result.content["truncated"], true);
    assert!(text_of(&result).contains("Partial data"));
}

#[tokio::test]
async fn test_analyze_empty_window_reports_insufficient_data() {
    let result = call_tool(provider(vec![]), "analyze", json!({ "start_date": "30d" }))
        .await
        .unwrap();
    assert!(!result.is_error);
    assert_eq!(result.content["insufficient_data"], true);
    assert_eq!(result.content["reading_count"], 0);
    assert!(text_of(&result).starts_with("Not enough data for analysis"));
}

#[tokio::test]
async fn test_analyze_future_end_is_clamped_to_now() {
    let readings = readings_before(test_now(), 30, &[100.0; 6]);
    let result = call_tool(
        provider(readings),
        "analyze",
        json!({ "start_date": "2025-03-14", "end_date": "2025-12-31" }),
    )
    .await
    .unwrap();
    assert_eq!(result.content["range"]["end"], test_now().to_rfc3339());
}

#[tokio::test]
async fn test_analyze_rejects_bad_ranges_without_fetching() {
    let cases = [
        (json!({ "start_date": "2025-13-01" }), ErrorCode::InvalidInput),
        (json!({ "start_date": "yesterday" }), ErrorCode::InvalidInput),
        (json!({ "start_date": "0d" }), ErrorCode::InvalidInput),
        (
            json!({ "start_date": "2025-03-10", "end_date": "2025-03-01" }),
            ErrorCode::InvalidInput,
        ),
        (json!({ "start_date": "2025-04-01" }), ErrorCode::ValueOutOfRange),
        (json!({ "start_date": "2015-01-01" }), ErrorCode::ValueOutOfRange),
        (json!({ "tir_goal": 40 }), ErrorCode::ValueOutOfRange),
        (json!({ "start_date": 7 }), ErrorCode::InvalidInput),
    ];
    for (args, code) in cases {
        let fixture = provider(vec![]);
        let error = call_tool(Arc::clone(&fixture), "analyze", args.clone())
            .await
            .unwrap_err();
        assert_eq!(error.code, code, "args: {args}");
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(fixture.calls(), 0, "args: {args}");
    }
}

// ============================================================================
// analyze_monthly
// ============================================================================

#[tokio::test]
async fn test_monthly_returns_only_months_with_readings() {
    let mut readings = month_of_readings(2025, 1, 31, 24, 100.0);
    readings.extend(month_of_readings(2025, 2, 28, 24, 200.0));

    let result = call_tool(provider(readings), "analyze_monthly", json!({ "year": 2025 }))
        .await
        .unwrap();

    let months = result.content["months"].as_array().unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["month"], 1);
    assert_eq!(months[0]["analysis"]["reading_count"], 31 * 24);
    assert!(approx(&months[0]["analysis"]["time_in_range_pct"], 100.0));
    assert_eq!(months[1]["month"], 2);
    assert_eq!(months[1]["analysis"]["reading_count"], 28 * 24);
    assert!(approx(&months[1]["analysis"]["time_above_range_pct"], 100.0));

    let summary = &result.content["summary"];
    assert_eq!(summary["months"], 2);
    assert_eq!(summary["best_month"], "2025-01");
    assert_eq!(summary["worst_month"], "2025-02");
    assert!(approx(&summary["avg_tir_pct"], 50.0));
    assert_eq!(summary["goal_met"], false);
    assert_eq!(result.content["tir_goal"], 85);

    let text = text_of(&result);
    assert!(text.contains("Glucose Analysis for 2025"));
    assert!(text.contains("Mar   │ No data"), "unexpected text: {text}");
}

#[tokio::test]
async fn test_monthly_month_bounds_and_aliases() {
    let mut readings = month_of_readings(2024, 5, 31, 24, 120.0);
    readings.extend(month_of_readings(2024, 6, 30, 24, 130.0));
    readings.extend(month_of_readings(2024, 7, 31, 24, 140.0));

    let result = call_tool(
        provider(readings),
        "analyze_monthly",
        json!({ "year": "2024", "fromMonth": 6, "toMonth": 6 }),
    )
    .await
    .unwrap();

    let months = result.content["months"].as_array().unwrap();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0]["month"], 6);
    assert_eq!(result.content["from_month"], 6);
    assert_eq!(result.content["to_month"], 6);
}

#[tokio::test]
async fn test_monthly_without_readings_is_insufficient_data() {
    let result = call_tool(provider(vec![]), "analyze_monthly", json!({ "year": 2024 }))
        .await
        .unwrap();
    assert!(!result.is_error);
    assert_eq!(result.content["insufficient_data"], true);
    assert_eq!(result.content["months"], json!([]));
    assert!(result.content["summary"].is_null());
}

#[tokio::test]
async fn test_monthly_validation() {
    let cases = [
        (json!({}), ErrorCode::MissingRequiredField),
        (json!({ "year": 2014 }), ErrorCode::ValueOutOfRange),
        (json!({ "year": 2026 }), ErrorCode::ValueOutOfRange),
        (json!({ "year": 2024, "from_month": 13 }), ErrorCode::ValueOutOfRange),
        (
            json!({ "year": 2024, "from_month": 6, "to_month": 3 }),
            ErrorCode::InvalidInput,
        ),
        (json!({ "year": 2025, "from_month": 4 }), ErrorCode::ValueOutOfRange),
    ];
    for (args, code) in cases {
        let fixture = provider(vec![]);
        let error = call_tool(Arc::clone(&fixture), "analyze_monthly", args.clone())
            .await
            .unwrap_err();
        assert_eq!(error.code, code, "args: {args}");
        assert_eq!(fixture.calls(), 0, "args: {args}");
    }
}

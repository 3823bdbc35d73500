// ABOUTME: Shared test utilities for the MCP server integration tests
// ABOUTME: Provides an in-memory Nightscout fixture, configuration, and tool invocation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `nightscout_mcp_server`
//!
//! Tests run against [`FixtureProvider`], an in-memory stand-in for a
//! Nightscout site that counts how often it is called.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use nightscout_core::errors::{AppError, AppResult};
use nightscout_core::models::{
    DateRange, DeviceStatus, Reading, ServerStatus, ServerThresholds, Treatment,
};
use nightscout_mcp_server::config::{ConfigOverrides, ServerConfig};
use nightscout_mcp_server::mcp::schema::Content;
use nightscout_mcp_server::mcp::{McpRequestProcessor, ServerResources};
use nightscout_mcp_server::tools::{ToolExecutionContext, ToolRegistry, ToolResult};
use nightscout_providers::{NightscoutProvider, ParsedBatch};
use serde_json::{json, Value};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

/// Fixed clock used by tool-level tests: 2025-03-15 12:00 UTC
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

/// In-memory Nightscout site
#[derive(Default)]
pub struct FixtureProvider {
    pub readings: Vec<Reading>,
    pub skipped_readings: usize,
    pub truncated_readings: bool,
    pub treatments: Vec<Treatment>,
    pub devices: Vec<DeviceStatus>,
    pub status: Option<ServerStatus>,
    pub fail_with: Option<fn() -> AppError>,
    pub calls: AtomicUsize,
}

impl FixtureProvider {
    pub fn with_readings(readings: Vec<Reading>) -> Self {
        Self {
            readings,
            ..Self::default()
        }
    }

    pub fn failing(error: fn() -> AppError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    /// Number of provider calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with {
            Some(error) => Err(error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NightscoutProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn latest_reading(&self) -> AppResult<Option<Reading>> {
        self.record_call()?;
        Ok(self.readings.iter().max_by_key(|r| r.timestamp).cloned())
    }

    async fn readings_in_range(&self, range: &DateRange) -> AppResult<ParsedBatch<Reading>> {
        self.record_call()?;
        let mut items: Vec<Reading> = self
            .readings
            .iter()
            .filter(|reading| range.contains(reading.timestamp))
            .cloned()
            .collect();
        items.sort_by_key(|reading| reading.timestamp);
        Ok(ParsedBatch {
            items,
            skipped: self.skipped_readings,
            truncated: self.truncated_readings,
        })
    }

    async fn treatments_since(
        &self,
        since: DateTime<Utc>,
        count: u32,
    ) -> AppResult<ParsedBatch<Treatment>> {
        self.record_call()?;
        let mut items: Vec<Treatment> = self
            .treatments
            .iter()
            .filter(|treatment| treatment.timestamp >= since)
            .cloned()
            .collect();
        items.sort_by_key(|treatment| Reverse(treatment.timestamp));
        items.truncate(count as usize);
        Ok(ParsedBatch::new(items))
    }

    async fn device_status(&self, count: u32) -> AppResult<ParsedBatch<DeviceStatus>> {
        self.record_call()?;
        let mut items = self.devices.clone();
        items.sort_by_key(|status| Reverse(status.timestamp));
        items.truncate(count as usize);
        Ok(ParsedBatch::new(items))
    }

    async fn server_status(&self) -> AppResult<ServerStatus> {
        self.record_call()?;
        Ok(self.status.clone().unwrap_or_else(sample_status))
    }
}

pub fn sample_status() -> ServerStatus {
    ServerStatus {
        name: Some("Test Site".to_owned()),
        version: Some("15.0.2".to_owned()),
        server_time: Some("2025-03-15T12:00:00.000Z".to_owned()),
        units: Some("mg/dl".to_owned()),
        thresholds: Some(ServerThresholds {
            bg_high: Some(260.0),
            bg_target_top: Some(180.0),
            bg_target_bottom: Some(80.0),
            bg_low: Some(55.0),
        }),
        api_enabled: Some(true),
        settings: json!({ "units": "mg/dl" }),
    }
}

/// Configuration for tests, mg/dL display and a UTC reporting offset
pub fn test_config(extra: &[(&str, &str)]) -> ServerConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("NIGHTSCOUT_URL".to_owned(), "https://ns.example.com".to_owned());
    vars.insert("GLUCOSE_UNITS".to_owned(), "mgdl".to_owned());
    for (key, value) in extra {
        vars.insert((*key).to_owned(), (*value).to_owned());
    }
    ServerConfig::from_lookup(|key| vars.get(key).cloned(), &ConfigOverrides::default()).unwrap()
}

pub fn resources_with(provider: Arc<FixtureProvider>, config: ServerConfig) -> Arc<ServerResources> {
    Arc::new(ServerResources::new(config, provider))
}

pub fn processor_with(provider: Arc<FixtureProvider>) -> McpRequestProcessor {
    init_test_logging();
    McpRequestProcessor::with_builtin_tools(resources_with(provider, test_config(&[])))
}

/// Execute a tool directly at [`test_now`]
pub async fn call_tool(
    provider: Arc<FixtureProvider>,
    tool: &str,
    args: Value,
) -> AppResult<ToolResult> {
    call_tool_with_config(provider, test_config(&[]), tool, args).await
}

pub async fn call_tool_with_config(
    provider: Arc<FixtureProvider>,
    config: ServerConfig,
    tool: &str,
    args: Value,
) -> AppResult<ToolResult> {
    init_test_logging();
    let registry = ToolRegistry::with_builtin_tools();
    let context = ToolExecutionContext::new(resources_with(provider, config)).at(test_now());
    registry.execute(tool, args, &context).await
}

/// One reading per value, `step_minutes` apart, the last one `step_minutes` before `end`
pub fn readings_before(end: DateTime<Utc>, step_minutes: i64, values: &[f64]) -> Vec<Reading> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let back = i64::try_from(values.len() - i).unwrap() * step_minutes;
            Reading::new(end - Duration::minutes(back), *value)
        })
        .collect()
}

/// `per_day` evenly spaced readings of `value` on every day of a month
pub fn month_of_readings(year: i32, month: u32, days: u32, per_day: u32, value: f64) -> Vec<Reading> {
    let step = 24 * 60 / i64::from(per_day);
    (1..=days)
        .flat_map(|day| {
            let midnight = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap();
            (0..per_day).map(move |slot| {
                Reading::new(midnight + Duration::minutes(step * i64::from(slot)), value)
            })
        })
        .collect()
}

/// Text of the first content block
pub fn text_of(result: &ToolResult) -> String {
    let response = result.clone().into_response();
    let Content::Text { text } = &response.content[0];
    text.clone()
}

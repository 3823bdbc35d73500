// ABOUTME: Data-source trait the MCP tools call into
// ABOUTME: Implemented over HTTP by NightscoutClient and by in-memory fixtures in tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nightscout_core::errors::AppResult;
use nightscout_core::models::{DateRange, DeviceStatus, Reading, ServerStatus, Treatment};

use crate::parse::ParsedBatch;

/// Read-only access to one Nightscout site
#[async_trait]
pub trait NightscoutProvider: Send + Sync {
    /// Human-readable identifier of the data source
    fn name(&self) -> &str;

    /// Most recent sensor glucose value, `None` when the site has none
    async fn latest_reading(&self) -> AppResult<Option<Reading>>;

    /// All readings in `range`, ascending by timestamp
    async fn readings_in_range(&self, range: &DateRange) -> AppResult<ParsedBatch<Reading>>;

    /// Treatments at or after `since`, newest first, at most `count`
    async fn treatments_since(
        &self,
        since: DateTime<Utc>,
        count: u32,
    ) -> AppResult<ParsedBatch<Treatment>>;

    /// Latest `count` device status records, newest first
    async fn device_status(&self, count: u32) -> AppResult<ParsedBatch<DeviceStatus>>;

    /// Server identity and settings
    async fn server_status(&self) -> AppResult<ServerStatus>;
}

// ABOUTME: HTTP implementation of NightscoutProvider over the v1 REST API
// ABOUTME: Paginates entry queries backwards from the range end in bounded steps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use nightscout_core::errors::AppResult;
use nightscout_core::models::{DateRange, DeviceStatus, Reading, ServerStatus, Treatment};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::NightscoutConfig;
use crate::errors::{NightscoutError, NightscoutResult};
use crate::http_client::{initialize_shared_client, shared_client};
use crate::parse::{parse_records, ParsedBatch};
use crate::provider::NightscoutProvider;
use crate::wire;

/// Sensor glucose entries
pub const ENTRIES_ENDPOINT: &str = "/api/v1/entries.json";
/// Treatments log
pub const TREATMENTS_ENDPOINT: &str = "/api/v1/treatments.json";
/// Device status log
pub const DEVICE_STATUS_ENDPOINT: &str = "/api/v1/devicestatus.json";
/// Server status
pub const STATUS_ENDPOINT: &str = "/api/v1/status.json";

/// Longest response body excerpt kept in error messages
const ERROR_BODY_LIMIT: usize = 200;

/// Nightscout REST client
#[derive(Debug, Clone)]
pub struct NightscoutClient {
    config: NightscoutConfig,
    client: Client,
}

impl NightscoutClient {
    /// Client on the shared connection pool
    ///
    /// The first client created fixes the pool's timeouts.
    #[must_use]
    pub fn new(config: NightscoutConfig) -> Self {
        initialize_shared_client(config.timeout_secs, config.connect_timeout_secs);
        Self::with_client(config, shared_client().clone())
    }

    /// Client reusing an existing `reqwest` client
    #[must_use]
    pub const fn with_client(config: NightscoutConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &NightscoutConfig {
        &self.config
    }

    /// Issue a GET request and decode the JSON body
    async fn get_json(&self, endpoint: &str, query: &[(&str, String)]) -> NightscoutResult<Value> {
        let url = format!("{}{endpoint}", self.config.base_url);
        let request = self.config.credentials.apply(self.client.get(&url).query(query));

        let started = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| NightscoutError::Network {
                endpoint: endpoint.to_owned(),
                reason: e.to_string(),
                timed_out: e.is_timeout(),
            })?;
        let status = response.status();
        debug!(
            nightscout.endpoint = endpoint,
            http.status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "nightscout request completed"
        );

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(NightscoutError::AuthenticationFailed {
                endpoint: endpoint.to_owned(),
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| NightscoutError::Network {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
            timed_out: e.is_timeout(),
        })?;

        if !status.is_success() {
            return Err(NightscoutError::HttpStatus {
                endpoint: endpoint.to_owned(),
                status_code: status.as_u16(),
                message: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| NightscoutError::Parse {
            endpoint: endpoint.to_owned(),
            reason: format!("invalid JSON: {e}"),
        })
    }

    /// Fetch every sensor entry in `range`, ascending and deduplicated
    ///
    /// Pages are requested newest-first with `find[date][$lt]` moving back to
    /// the oldest entry of the previous page. Paging stops on an empty or
    /// short page, once the range start is reached, or at `max_pages`.
    ///
    /// # Errors
    ///
    /// Returns the first transport or payload error encountered.
    pub async fn fetch_entries_in_range(
        &self,
        range: &DateRange,
    ) -> NightscoutResult<ParsedBatch<Reading>> {
        let start_ms = range.start().timestamp_millis();
        let mut end_ms = range.end().timestamp_millis();
        let page_size = self.config.page_size;
        let mut batch = ParsedBatch::default();
        let mut pages = 0_u32;

        loop {
            let query = [
                ("count", page_size.to_string()),
                ("find[date][$gte]", start_ms.to_string()),
                ("find[date][$lt]", end_ms.to_string()),
                ("find[type]", "sgv".to_owned()),
            ];
            let body = self.get_json(ENTRIES_ENDPOINT, &query).await?;
            pages += 1;

            let returned = body.as_array().map_or(0, Vec::len);
            let oldest_ms = oldest_entry_millis(&body);
            let page = parse_records(ENTRIES_ENDPOINT, body, wire::reading_from_value)?;
            batch.extend(page);

            if returned < page_size as usize {
                break;
            }
            match oldest_ms {
                Some(oldest) if oldest > start_ms && oldest < end_ms => end_ms = oldest,
                _ => break,
            }
            if pages >= self.config.max_pages {
                warn!(
                    pages,
                    readings = batch.items.len(),
                    "page limit reached, returning partial range"
                );
                batch.truncated = true;
                break;
            }
        }

        batch.items.retain(|r| range.contains(r.timestamp));
        batch.items.sort_by_key(|r| r.timestamp);
        batch.items.dedup_by_key(|r| r.timestamp);
        info!(
            readings = batch.items.len(),
            skipped = batch.skipped,
            truncated = batch.truncated,
            pages,
            "fetched glucose entries"
        );
        Ok(batch)
    }
}

/// Oldest `date` on a raw entries page, counting records that fail to parse
fn oldest_entry_millis(body: &Value) -> Option<i64> {
    body.as_array()?
        .iter()
        .filter_map(wire::entry_millis)
        .min()
}

fn iso_millis(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl NightscoutProvider for NightscoutClient {
    fn name(&self) -> &str {
        &self.config.base_url
    }

    async fn latest_reading(&self) -> AppResult<Option<Reading>> {
        let query = [("count", "1".to_owned()), ("find[type]", "sgv".to_owned())];
        let body = self.get_json(ENTRIES_ENDPOINT, &query).await?;
        let batch = parse_records(ENTRIES_ENDPOINT, body, wire::reading_from_value)?;
        Ok(batch.items.into_iter().max_by_key(|r| r.timestamp))
    }

    async fn readings_in_range(&self, range: &DateRange) -> AppResult<ParsedBatch<Reading>> {
        Ok(self.fetch_entries_in_range(range).await?)
    }

    async fn treatments_since(
        &self,
        since: DateTime<Utc>,
        count: u32,
    ) -> AppResult<ParsedBatch<Treatment>> {
        let query = [
            ("count", count.to_string()),
            ("find[created_at][$gte]", iso_millis(since)),
        ];
        let body = self.get_json(TREATMENTS_ENDPOINT, &query).await?;
        let mut batch = parse_records(TREATMENTS_ENDPOINT, body, wire::treatment_from_value)?;
        batch.items.retain(|t| t.timestamp >= since);
        batch.items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        batch.items.truncate(count as usize);
        Ok(batch)
    }

    async fn device_status(&self, count: u32) -> AppResult<ParsedBatch<DeviceStatus>> {
        let query = [("count", count.to_string())];
        let body = self.get_json(DEVICE_STATUS_ENDPOINT, &query).await?;
        let mut batch = parse_records(DEVICE_STATUS_ENDPOINT, body, wire::device_status_from_value)?;
        batch.items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        batch.items.truncate(count as usize);
        Ok(batch)
    }

    async fn server_status(&self) -> AppResult<ServerStatus> {
        let body = self.get_json(STATUS_ENDPOINT, &[]).await?;
        Ok(wire::server_status_from_value(&body).map_err(|reason| NightscoutError::Parse {
            endpoint: STATUS_ENDPOINT.to_owned(),
            reason,
        })?)
    }
}

// ABOUTME: Lenient array parsing that skips malformed records
// ABOUTME: Skipped records are counted and logged, a non-array payload is an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::{NightscoutError, NightscoutResult};

/// Records parsed from one or more payloads
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedBatch<T> {
    /// Successfully parsed records
    pub items: Vec<T>,
    /// Records that were dropped as malformed
    pub skipped: usize,
    /// Paging stopped at its limit before the requested range was covered
    pub truncated: bool,
}

impl<T> Default for ParsedBatch<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: 0,
            truncated: false,
        }
    }
}

impl<T> ParsedBatch<T> {
    /// Batch with no skipped records
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self {
            items,
            skipped: 0,
            truncated: false,
        }
    }

    /// Append another batch
    pub fn extend(&mut self, other: Self) {
        self.items.extend(other.items);
        self.skipped += other.skipped;
        self.truncated |= other.truncated;
    }
}

/// Parse every element of a JSON array with `convert`
///
/// # Errors
///
/// Returns `NightscoutError::Parse` if `body` is not an array.
pub fn parse_records<T, F>(endpoint: &str, body: Value, convert: F) -> NightscoutResult<ParsedBatch<T>>
where
    F: Fn(&Value) -> Result<T, String>,
{
    let records = match body {
        Value::Array(records) => records,
        other => {
            return Err(NightscoutError::Parse {
                endpoint: endpoint.to_owned(),
                reason: format!("expected a JSON array, got {}", type_name(&other)),
            });
        }
    };

    let mut batch = ParsedBatch::default();
    for (index, record) in records.iter().enumerate() {
        match convert(record) {
            Ok(item) => batch.items.push(item),
            Err(reason) => {
                warn!(endpoint, index, reason = %reason, "skipping malformed record");
                batch.skipped += 1;
            }
        }
    }
    Ok(batch)
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ABOUTME: Connection settings for the Nightscout client
// ABOUTME: Built once from server configuration and never mutated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use nightscout_core::constants::limits::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};

use crate::auth::Credentials;
use crate::errors::NightscoutError;
use crate::http_client::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};

/// Everything the client needs to reach one Nightscout site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightscoutConfig {
    /// Base URL without credentials or trailing slash
    pub base_url: String,
    /// Credentials attached to each request
    pub credentials: Credentials,
    /// Entries requested per page
    pub page_size: u32,
    /// Maximum sequential page requests per range
    pub max_pages: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl NightscoutConfig {
    /// Configuration with default paging and timeouts
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is unusable.
    pub fn new(raw_url: &str, secret: Option<&str>) -> Result<Self, NightscoutError> {
        let (base_url, credentials) = Credentials::resolve(raw_url, secret)?;
        Ok(Self {
            base_url,
            credentials,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        })
    }

    /// Override paging limits, both clamped to at least 1
    #[must_use]
    pub fn with_paging(mut self, page_size: u32, max_pages: u32) -> Self {
        self.page_size = page_size.max(1);
        self.max_pages = max_pages.max(1);
        self
    }

    /// Override HTTP timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeout_secs: u64, connect_timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self.connect_timeout_secs = connect_timeout_secs;
        self
    }
}

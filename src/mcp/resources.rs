// ABOUTME: Centralized resource container for dependency injection in the MCP server
// ABOUTME: Holds the immutable configuration and the Nightscout data provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Server Resources Module
//!
//! Everything a tool needs is built once at startup and shared through an
//! `Arc<ServerResources>`. Tests swap the provider for an in-memory fixture.

use std::fmt;
use std::sync::Arc;

use nightscout_intelligence::GlucoseAnalyzer;
use nightscout_providers::{NightscoutClient, NightscoutProvider};

use crate::config::ServerConfig;
use crate::formatters::GlucoseFormatter;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Immutable server configuration
    pub config: Arc<ServerConfig>,
    /// Source of glucose, treatment, and device data
    pub provider: Arc<dyn NightscoutProvider>,
}

impl ServerResources {
    /// Create resources around an existing provider
    #[must_use]
    pub fn new(config: ServerConfig, provider: Arc<dyn NightscoutProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// Create resources backed by the HTTP client for the configured site
    #[must_use]
    pub fn from_config(config: ServerConfig) -> Self {
        let client = NightscoutClient::new(config.nightscout.clone());
        Self::new(config, Arc::new(client))
    }

    /// Statistics engine configured with the server's target range
    #[must_use]
    pub fn analyzer(&self) -> GlucoseAnalyzer {
        GlucoseAnalyzer::new(self.config.glucose.tir)
            .with_min_readings_per_day(self.config.glucose.min_readings_per_day)
    }

    /// Text formatter for the configured display unit and reporting offset
    #[must_use]
    pub fn formatter(&self) -> GlucoseFormatter {
        GlucoseFormatter::new(
            self.config.glucose.display_units,
            self.config.glucose.utc_offset,
        )
    }
}

impl fmt::Debug for ServerResources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerResources")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .finish()
    }
}

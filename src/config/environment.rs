// ABOUTME: Environment configuration for the Nightscout MCP server
// ABOUTME: Reads every setting once at startup into an immutable ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! Environment-based configuration
//!
//! Configuration is read once, validated, and then shared read-only through
//! `ServerResources`. Nothing re-reads the environment after startup.

use std::env;
use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};
use nightscout_core::units::GlucoseUnit;
use nightscout_intelligence::TirConfig;
use nightscout_providers::http_client::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use nightscout_providers::NightscoutConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::env_config;
use crate::constants::glucose::{
    DEFAULT_MIN_READINGS_PER_DAY, DEFAULT_TARGET_HIGH_MGDL, DEFAULT_TARGET_LOW_MGDL,
};
use crate::constants::limits::{DEFAULT_MAX_ANALYSIS_DAYS, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::constants::protocol::{DEFAULT_MCP_PROTOCOL_VERSION, DEFAULT_SERVER_NAME, SERVER_VERSION};
use crate::errors::{AppError, AppResult};

/// Largest accepted UTC offset in hours
const MAX_OFFSET_HOURS: i32 = 14;

/// Environment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    /// Local development
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// MCP identity advertised on `initialize`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Protocol revision
    pub mcp_version: String,
    /// Server name
    pub server_name: String,
    /// Server version (from Cargo.toml)
    pub server_version: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            mcp_version: DEFAULT_MCP_PROTOCOL_VERSION.to_owned(),
            server_name: DEFAULT_SERVER_NAME.to_owned(),
            server_version: SERVER_VERSION.to_owned(),
        }
    }
}

/// Glucose display and analysis settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlucoseConfig {
    /// Unit used in text output
    pub display_units: GlucoseUnit,
    /// Time-in-range bounds in mg/dL
    pub tir: TirConfig,
    /// Readings per day expected before a result counts as complete
    pub min_readings_per_day: u32,
    /// Reporting time zone for calendar dates and months
    pub utc_offset: FixedOffset,
    /// Longest analysable date range in days
    pub max_analysis_days: u32,
}

impl Default for GlucoseConfig {
    fn default() -> Self {
        Self {
            display_units: GlucoseUnit::Mmol,
            tir: TirConfig::default(),
            min_readings_per_day: DEFAULT_MIN_READINGS_PER_DAY,
            utc_offset: utc(),
            max_analysis_days: DEFAULT_MAX_ANALYSIS_DAYS,
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Command-line values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `NIGHTSCOUT_URL`
    pub nightscout_url: Option<String>,
    /// Replaces `GLUCOSE_UNITS`
    pub units: Option<GlucoseUnit>,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Nightscout connection settings
    pub nightscout: NightscoutConfig,
    /// Glucose display and analysis settings
    pub glucose: GlucoseConfig,
    /// MCP identity
    pub protocol: ProtocolConfig,
    /// Deployment environment
    pub environment: Environment,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `NIGHTSCOUT_URL` is missing or any
    /// variable holds an invalid value.
    pub fn from_env() -> AppResult<Self> {
        Self::from_env_with(&ConfigOverrides::default())
    }

    /// Load configuration from environment variables with command-line overrides
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_env_with(overrides: &ConfigOverrides) -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        let config = Self::from_lookup(|key| env::var(key).ok(), overrides)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build configuration from an arbitrary variable source
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let url = overrides
            .nightscout_url
            .clone()
            .or_else(|| get(env_config::NIGHTSCOUT_URL))
            .ok_or_else(|| AppError::config_missing(env_config::NIGHTSCOUT_URL))?;
        let secret = get(env_config::NIGHTSCOUT_API_SECRET);

        let timeout_secs = parse_or(&get, env_config::NIGHTSCOUT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS)?;
        let connect_timeout_secs = parse_or(
            &get,
            env_config::NIGHTSCOUT_CONNECT_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;
        let page_size: u32 = parse_or(&get, env_config::NIGHTSCOUT_PAGE_SIZE, DEFAULT_PAGE_SIZE)?;
        let max_pages: u32 = parse_or(&get, env_config::NIGHTSCOUT_MAX_PAGES, DEFAULT_MAX_PAGES)?;
        require_positive(env_config::NIGHTSCOUT_TIMEOUT_SECS, timeout_secs)?;
        require_positive(env_config::NIGHTSCOUT_CONNECT_TIMEOUT_SECS, connect_timeout_secs)?;
        require_positive(env_config::NIGHTSCOUT_PAGE_SIZE, u64::from(page_size))?;
        require_positive(env_config::NIGHTSCOUT_MAX_PAGES, u64::from(max_pages))?;

        let nightscout = NightscoutConfig::new(&url, secret.as_deref())?
            .with_paging(page_size, max_pages)
            .with_timeouts(timeout_secs, connect_timeout_secs);

        let glucose = Self::glucose_from(&get, overrides)?;

        let protocol = ProtocolConfig {
            mcp_version: get(env_config::MCP_PROTOCOL_VERSION)
                .unwrap_or_else(|| DEFAULT_MCP_PROTOCOL_VERSION.to_owned()),
            server_name: get(env_config::SERVER_NAME)
                .unwrap_or_else(|| DEFAULT_SERVER_NAME.to_owned()),
            server_version: SERVER_VERSION.to_owned(),
        };

        let environment = get(env_config::ENVIRONMENT)
            .map_or_else(Environment::default, |raw| {
                Environment::from_str_or_default(&raw)
            });

        Ok(Self {
            nightscout,
            glucose,
            protocol,
            environment,
        })
    }

    fn glucose_from<G>(get: &G, overrides: &ConfigOverrides) -> AppResult<GlucoseConfig>
    where
        G: Fn(&str) -> Option<String>,
    {
        let display_units = match overrides.units {
            Some(units) => units,
            None => get(env_config::GLUCOSE_UNITS)
                .map(|raw| {
                    raw.parse::<GlucoseUnit>().map_err(|_| {
                        AppError::config(format!(
                            "Invalid {} value '{raw}': expected mmol or mgdl",
                            env_config::GLUCOSE_UNITS
                        ))
                    })
                })
                .transpose()?
                .unwrap_or(GlucoseUnit::Mmol),
        };

        let low: f64 = parse_or(get, env_config::GLUCOSE_LOW, DEFAULT_TARGET_LOW_MGDL)?;
        let high: f64 = parse_or(get, env_config::GLUCOSE_HIGH, DEFAULT_TARGET_HIGH_MGDL)?;
        let tir = TirConfig::from_configured(low, high).map_err(|e| {
            AppError::config(format!(
                "Invalid {}/{} values: {}",
                env_config::GLUCOSE_LOW,
                env_config::GLUCOSE_HIGH,
                e.message
            ))
        })?;

        let min_readings_per_day = parse_or(
            get,
            env_config::GLUCOSE_MIN_READINGS_PER_DAY,
            DEFAULT_MIN_READINGS_PER_DAY,
        )?;

        let utc_offset = match get(env_config::NIGHTSCOUT_UTC_OFFSET) {
            Some(raw) => parse_utc_offset(&raw).ok_or_else(|| {
                AppError::config(format!(
                    "Invalid {} value '{raw}': expected an offset such as +02:00",
                    env_config::NIGHTSCOUT_UTC_OFFSET
                ))
            })?,
            None => utc(),
        };

        let max_analysis_days: u32 = parse_or(
            get,
            env_config::MAX_ANALYSIS_DAYS,
            DEFAULT_MAX_ANALYSIS_DAYS,
        )?;
        require_positive(env_config::MAX_ANALYSIS_DAYS, u64::from(max_analysis_days))?;

        Ok(GlucoseConfig {
            display_units,
            tir,
            min_readings_per_day,
            utc_offset,
            max_analysis_days,
        })
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        let credentials = self.nightscout.credentials.describe();
        format!(
            "Nightscout MCP Server Configuration:\n\
             - Nightscout URL: {}\n\
             - Credentials: {}\n\
             - Display Units: {}\n\
             - Target Range: {}-{} mg/dL\n\
             - Min Readings/Day: {}\n\
             - Reporting Offset: {}\n\
             - Max Analysis Days: {}\n\
             - Paging: {} x {}\n\
             - Timeouts: {}s (connect {}s)\n\
             - Protocol Version: {}\n\
             - Environment: {}",
            self.nightscout.base_url,
            if credentials.is_empty() {
                "none".to_owned()
            } else {
                credentials.join(", ")
            },
            self.glucose.display_units,
            self.glucose.tir.low_mgdl(),
            self.glucose.tir.high_mgdl(),
            self.glucose.min_readings_per_day,
            self.glucose.utc_offset,
            self.glucose.max_analysis_days,
            self.nightscout.max_pages,
            self.nightscout.page_size,
            self.nightscout.timeout_secs,
            self.nightscout.connect_timeout_secs,
            self.protocol.mcp_version,
            self.environment,
        )
    }
}

/// Parse a variable, falling back to `default` when unset
fn parse_or<T, G>(get: &G, key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid {key} value '{raw}'")))
    })
}

fn require_positive(key: &str, value: u64) -> AppResult<()> {
    if value == 0 {
        return Err(AppError::config(format!("{key} must be greater than zero")));
    }
    Ok(())
}

/// Parse `Z`, `UTC`, `+HH`, `+HHMM` or `+HH:MM` into a fixed offset
#[must_use]
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(utc());
    }
    let (sign, rest) = if let Some(rest) = raw.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = raw.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if !(0..=MAX_OFFSET_HOURS).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

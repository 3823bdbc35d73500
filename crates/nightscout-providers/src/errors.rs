// ABOUTME: Error types for Nightscout API calls
// ABOUTME: Classifies transport, authentication, status, and payload failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use nightscout_core::errors::{AppError, ErrorCode};
use serde_json::json;
use thiserror::Error;

/// Failures talking to a Nightscout server
#[derive(Debug, Error)]
pub enum NightscoutError {
    /// The client cannot be built from the given settings
    #[error("Invalid Nightscout configuration: {reason}")]
    Configuration {
        /// What is wrong
        reason: String,
    },

    /// Connection failure or timeout
    #[error("Request to {endpoint} failed: {reason}")]
    Network {
        /// Endpoint path
        endpoint: String,
        /// Underlying failure
        reason: String,
        /// Whether the request timed out
        timed_out: bool,
    },

    /// The server rejected the credentials
    #[error("Nightscout rejected the credentials for {endpoint} (HTTP {status_code})")]
    AuthenticationFailed {
        /// Endpoint path
        endpoint: String,
        /// 401 or 403
        status_code: u16,
    },

    /// Any other non-success status
    #[error("Nightscout returned HTTP {status_code} for {endpoint}: {message}")]
    HttpStatus {
        /// Endpoint path
        endpoint: String,
        /// Response status
        status_code: u16,
        /// Truncated response body
        message: String,
    },

    /// The payload is not the expected JSON shape
    #[error("Unexpected payload from {endpoint}: {reason}")]
    Parse {
        /// Endpoint path
        endpoint: String,
        /// What could not be parsed
        reason: String,
    },
}

impl NightscoutError {
    /// Whether a later identical request could plausibly succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { status_code, .. } => *status_code == 429 || *status_code >= 500,
            Self::Configuration { .. } | Self::AuthenticationFailed { .. } | Self::Parse { .. } => {
                false
            }
        }
    }

    const fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { .. } => ErrorCode::ConfigInvalid,
            Self::Network { .. } => ErrorCode::ExternalServiceUnavailable,
            Self::AuthenticationFailed { .. } => ErrorCode::ExternalAuthFailed,
            Self::HttpStatus { .. } => ErrorCode::ExternalServiceError,
            Self::Parse { .. } => ErrorCode::InvalidFormat,
        }
    }
}

impl From<NightscoutError> for AppError {
    fn from(error: NightscoutError) -> Self {
        let mut details = json!({ "retryable": error.is_retryable() });
        match &error {
            NightscoutError::Network {
                endpoint,
                timed_out,
                ..
            } => {
                details["endpoint"] = json!(endpoint);
                details["timed_out"] = json!(timed_out);
            }
            NightscoutError::AuthenticationFailed {
                endpoint,
                status_code,
            }
            | NightscoutError::HttpStatus {
                endpoint,
                status_code,
                ..
            } => {
                details["endpoint"] = json!(endpoint);
                details["status_code"] = json!(status_code);
            }
            NightscoutError::Parse { endpoint, .. } => {
                details["endpoint"] = json!(endpoint);
            }
            NightscoutError::Configuration { .. } => {}
        }
        Self::new(error.code(), error.to_string()).with_details(details)
    }
}

/// Result alias for client internals
pub type NightscoutResult<T> = Result<T, NightscoutError>;

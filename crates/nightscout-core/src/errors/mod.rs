// ABOUTME: Unified error types with stable error codes and failure categories
// ABOUTME: AppError is the single error currency passed between crates and tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Unified Error Handling System
//!
//! Every fallible operation in the server eventually produces an [`AppError`].
//! Each error carries an [`ErrorCode`], and every code belongs to exactly one
//! [`ErrorCategory`] so callers can tell configuration problems, bad tool
//! input, upstream failures, malformed payloads and insufficient data apart.

/// Tool-specific error types
pub mod tool;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

pub use tool::ToolError;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field was not supplied
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// A value was outside its allowed bounds
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // Parse (4000-4999)
    /// Upstream payload did not have the expected shape
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 4000,
    /// Serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 4001,

    // External services (5000-5999)
    /// Upstream returned a non-success status
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Upstream could not be reached or timed out
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,
    /// Upstream rejected the configured credentials
    #[serde(rename = "EXTERNAL_AUTH_FAILED")]
    ExternalAuthFailed = 5002,

    // Configuration (6000-6999)
    /// Generic configuration failure
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// A required setting is absent
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// A setting is present but unusable
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Computation (7000-7999)
    /// No valid readings were available for a statistic
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData = 7000,

    // Internal (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

/// Broad failure category an [`ErrorCode`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing or invalid server configuration, fatal at startup
    Configuration,
    /// Bad tool input, rejected before any upstream request
    Validation,
    /// Upstream unreachable, timed out, or returned a failure status
    Transport,
    /// Upstream payload could not be interpreted
    Parse,
    /// Statistics could not be computed from the data available
    Computation,
    /// Anything else
    Internal,
}

impl ErrorCategory {
    /// Stable lowercase name used in structured tool output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Validation => "validation",
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::Computation => "computation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCode {
    /// Category this code is reported under
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => {
                ErrorCategory::Validation
            }
            Self::InvalidFormat | Self::SerializationError => ErrorCategory::Parse,
            Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::ExternalAuthFailed => ErrorCategory::Transport,
            Self::ConfigError | Self::ConfigMissing | Self::ConfigInvalid => {
                ErrorCategory::Configuration
            }
            Self::InsufficientData => ErrorCategory::Computation,
            Self::InternalError => ErrorCategory::Internal,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::InvalidFormat => "The data format is invalid",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::ExternalServiceError => "The Nightscout server returned an error",
            Self::ExternalServiceUnavailable => "The Nightscout server is unreachable",
            Self::ExternalAuthFailed => "Authentication with the Nightscout server failed",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InsufficientData => "Not enough data to compute statistics",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional structured details, `Value::Null` when absent
    pub details: Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Value::Null,
            source: None,
        }
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Category of this error
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Serializable summary used in tool error payloads
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "code": self.code,
            "category": self.category(),
            "message": self.message,
        });
        if !self.details.is_null() {
            body["details"] = self.details.clone();
        }
        body
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Value outside its allowed bounds
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Required configuration missing
    #[must_use]
    pub fn config_missing(variable: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("{variable} environment variable is required"),
        )
    }

    /// No valid readings available
    #[must_use]
    pub fn insufficient_data(reading_count: usize) -> Self {
        Self::new(
            ErrorCode::InsufficientData,
            "No valid glucose readings in the requested period",
        )
        .with_details(json!({ "reading_count": reading_count }))
    }

    /// Malformed upstream payload
    #[must_use]
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<ToolError> for AppError {
    fn from(error: ToolError) -> Self {
        let code = match &error {
            ToolError::NotFound { .. } => ErrorCode::InvalidInput,
            ToolError::InvalidParameter { .. } => ErrorCode::ValueOutOfRange,
            ToolError::MissingParameter { .. } => ErrorCode::MissingRequiredField,
            ToolError::ExecutionFailed { .. } | ToolError::AlreadyRegistered { .. } => {
                ErrorCode::InternalError
            }
        };
        let details = json!({ "tool": error.tool_name() });
        Self::new(code, error.to_string()).with_details(details)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_spec_kind_has_a_code() {
        assert_eq!(ErrorCode::ConfigMissing.category(), ErrorCategory::Configuration);
        assert_eq!(ErrorCode::ValueOutOfRange.category(), ErrorCategory::Validation);
        assert_eq!(ErrorCode::ExternalAuthFailed.category(), ErrorCategory::Transport);
        assert_eq!(ErrorCode::InvalidFormat.category(), ErrorCategory::Parse);
        assert_eq!(ErrorCode::InsufficientData.category(), ErrorCategory::Computation);
    }

    #[test]
    fn test_tool_error_conversion_keeps_tool_name() {
        let error: AppError = ToolError::missing_parameter("analyze_monthly", "year").into();
        assert_eq!(error.code, ErrorCode::MissingRequiredField);
        assert_eq!(error.details["tool"], "analyze_monthly");
        assert!(error.message.contains("year"));
    }

    #[test]
    fn test_error_json_shape() {
        let json = AppError::insufficient_data(0).to_json();
        assert_eq!(json["code"], "INSUFFICIENT_DATA");
        assert_eq!(json["category"], "computation");
        assert_eq!(json["details"]["reading_count"], 0);
    }
}

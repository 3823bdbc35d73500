// ABOUTME: Nightscout REST API client and the provider trait tools depend on
// ABOUTME: Handles credentials, paginated history, and lenient record parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

#![deny(unsafe_code)]

//! # Nightscout Providers
//!
//! The [`NightscoutProvider`] trait is the seam between the tool layer and
//! the data source. [`NightscoutClient`] implements it over HTTP against the
//! Nightscout v1 REST API.
//!
//! Payloads are parsed record by record: a malformed record is skipped and
//! counted, a payload that is not a JSON array is an error.

/// Credential resolution from URL and API secret
pub mod auth;

/// HTTP implementation of the provider
pub mod client;

/// Client configuration
pub mod config;

/// Provider error types
pub mod errors;

/// Shared HTTP client with connection pooling
pub mod http_client;

/// Per-record parsing with skip counting
pub mod parse;

/// The provider trait
pub mod provider;

/// Nightscout wire formats
pub mod wire;

pub use auth::Credentials;
pub use client::NightscoutClient;
pub use config::NightscoutConfig;
pub use errors::NightscoutError;
pub use parse::ParsedBatch;
pub use provider::NightscoutProvider;

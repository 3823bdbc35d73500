// ABOUTME: Stdio MCP server binary for a single Nightscout site
// ABOUTME: Loads configuration, wires the HTTP provider to the tool registry, and serves stdin/stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

//! # Nightscout MCP Server Binary
//!
//! Launched by an MCP client as a child process. Requests arrive on stdin,
//! responses leave on stdout, logs go to stderr.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use nightscout_core::units::GlucoseUnit;
use nightscout_mcp_server::{
    config::{ConfigOverrides, ServerConfig},
    logging,
    mcp::{McpRequestProcessor, ServerResources, StdioTransport},
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "nightscout-mcp-server")]
#[command(about = "Nightscout MCP server - CGM glucose data and analytics for LLMs")]
#[command(version)]
pub struct Args {
    /// Nightscout site URL, overrides `NIGHTSCOUT_URL`
    #[arg(long)]
    nightscout_url: Option<String>,

    /// Display units (mmol or mgdl), overrides `GLUCOSE_UNITS`
    #[arg(long)]
    units: Option<GlucoseUnit>,

    /// Validate configuration and exit without serving
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let overrides = ConfigOverrides {
        nightscout_url: args.nightscout_url,
        units: args.units,
    };
    let config = match ServerConfig::from_env_with(&overrides) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    info!("{}", config.summary());

    if args.check_config {
        info!("Configuration is valid");
        return Ok(());
    }

    let resources = Arc::new(ServerResources::from_config(config));
    let processor = McpRequestProcessor::with_builtin_tools(resources);
    info!(
        "Starting Nightscout MCP server with {} tools",
        processor.registry().len()
    );

    if let Err(e) = StdioTransport::new(processor).run().await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Nightscout MCP server stopped");
    Ok(())
}

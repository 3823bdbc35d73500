// ABOUTME: Nightscout server status tool.
// ABOUTME: Reports site identity, units, and configured alarm thresholds.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use async_trait::async_trait;
use nightscout_core::constants::tools::STATUS;
use serde_json::{json, Value};

use crate::errors::AppResult;
use crate::mcp::schema::JsonSchema;
use crate::tools::context::ToolExecutionContext;
use crate::tools::params::ToolArgs;
use crate::tools::result::ToolResult;
use crate::tools::traits::{McpTool, ToolCapabilities};

/// Tool reporting the Nightscout server status.
pub struct StatusTool;

#[async_trait]
impl McpTool for StatusTool {
    fn name(&self) -> &'static str {
        STATUS
    }

    fn description(&self) -> &'static str {
        "Get Nightscout server status: site name, version, server time, units, and glucose alarm thresholds"
    }

    fn input_schema(&self) -> JsonSchema {
        JsonSchema::empty()
    }

    fn capabilities(&self) -> ToolCapabilities {
        ToolCapabilities::READS_STATUS
    }

    async fn execute(&self, args: Value, ctx: &ToolExecutionContext) -> AppResult<ToolResult> {
        ToolArgs::parse(self.name(), args)?;
        let status = ctx.resources.provider.server_status().await?;
        let formatter = ctx.resources.formatter();
        let tir = ctx.resources.config.glucose.tir;

        Ok(ToolResult::with_text(
            formatter.status(&status),
            json!({
                "name": status.name,
                "version": status.version,
                "server_time": status.server_time,
                "units": status.units,
                "api_enabled": status.api_enabled,
                "thresholds": status.thresholds,
                "server": {
                    "provider": ctx.resources.provider.name(),
                    "display_units": formatter.unit().label(),
                    "target_low_mgdl": tir.low_mgdl(),
                    "target_high_mgdl": tir.high_mgdl(),
                    "utc_offset": formatter.offset().to_string(),
                },
            }),
        ))
    }
}

/// Create all system tools for registration
#[must_use]
pub fn create_system_tools() -> Vec<Box<dyn McpTool>> {
    vec![Box::new(StatusTool)]
}

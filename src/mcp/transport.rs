// ABOUTME: Newline-delimited JSON-RPC transport over stdin/stdout
// ABOUTME: Reads one message per line and writes one response per line, sequentially
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nightscout MCP Contributors

use std::str::from_utf8;

use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult};
use crate::jsonrpc::JsonRpcResponse;

use super::request_processor::McpRequestProcessor;

/// Handles stdio transport for MCP communication
///
/// stdout carries only protocol messages; all logging goes to stderr.
pub struct StdioTransport {
    processor: McpRequestProcessor,
}

impl StdioTransport {
    /// Creates a new stdio transport instance
    #[must_use]
    pub const fn new(processor: McpRequestProcessor) -> Self {
        Self { processor }
    }

    /// Run on the process's stdin and stdout until stdin closes
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read or stdout cannot be written
    pub async fn run(&self) -> AppResult<()> {
        info!(
            tools = self.processor.registry().len(),
            "MCP stdio transport ready - listening on stdin/stdout"
        );
        self.serve(BufReader::new(stdin()), stdout()).await
    }

    /// Serve requests from `reader`, writing responses to `writer`
    ///
    /// A line that is not valid UTF-8 gets a parse error reply and serving continues.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            let read = reader
                .read_until(b'\n', &mut buffer)
                .await
                .map_err(|e| AppError::internal(format!("Failed to read from stdin: {e}")))?;
            if read == 0 {
                break;
            }

            let response = match from_utf8(&buffer) {
                Ok(line) => self.processor.handle_line(line).await,
                Err(e) => {
                    warn!("Discarding stdin line that is not valid UTF-8: {}", e);
                    Some(JsonRpcResponse::parse_error(e.to_string()))
                }
            };
            if let Some(response) = response {
                Self::write_response(&mut writer, &response).await?;
            }
        }
        debug!("stdin closed, stopping stdio transport");
        Ok(())
    }

    async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> AppResult<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut json = serde_json::to_string(response)?;
        json.push('\n');
        writer
            .write_all(json.as_bytes())
            .await
            .map_err(|e| AppError::internal(format!("Failed to write to stdout: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| AppError::internal(format!("Failed to flush stdout: {e}")))
    }
}

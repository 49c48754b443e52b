//! Stdin/stdout JSON bridge for the tool registry.
//!
//! Reads newline-delimited JSON [`ToolRequest`] messages from stdin,
//! dispatches each through the [`ToolRegistry`], and writes one
//! [`ToolResponse`] line per request to stdout. A request for the reserved
//! `list_tools` name is answered with the registry's tool schemas.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use crate::error::{Result, RunAiError};
use crate::host::contract::{LIST_TOOLS, ToolRequest, ToolResponse};
use crate::tools::ToolRegistry;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

/// Run the bridge on the process stdin/stdout until stdin closes.
///
/// # Errors
///
/// Returns [`RunAiError::Channel`] if stdin cannot be read or stdout
/// cannot be written.
pub async fn run_stdio_bridge(registry: ToolRegistry) -> Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = BufWriter::new(tokio::io::stdout());
    serve(&registry, reader, writer).await
}

/// Serve requests from `reader` and write responses to `writer` until EOF.
///
/// Requests are handled one at a time, so responses come back in request
/// order. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`RunAiError::Channel`] on read or write failure.
pub async fn serve<R, W>(registry: &ToolRegistry, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| RunAiError::Channel(format!("failed to read from stdin: {e}")))?;

        // EOF
        if bytes_read == 0 {
            tracing::info!("stdin closed (EOF); shutting down stdio bridge");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let response = handle_line(registry, trimmed).await;
        let json = serde_json::to_string(&response)
            .map_err(|e| RunAiError::Channel(format!("failed to serialize response: {e}")))?;
        write_line(&mut writer, &json).await?;
    }

    Ok(())
}

async fn handle_line(registry: &ToolRegistry, line: &str) -> ToolResponse {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse tool request from stdin");
            return ToolResponse::error(Value::Null, format!("failed to parse tool request: {e}"));
        }
    };

    if request.tool == LIST_TOOLS {
        return ToolResponse::tools(request.id, registry.schemas_for_api());
    }

    match registry.dispatch(&request.tool, request.args).await {
        Some(text) => ToolResponse::ok(request.id, text),
        None => {
            tracing::warn!(tool = %request.tool, "request for unknown or disabled tool");
            ToolResponse::error(
                request.id,
                format!("unknown or disabled tool: {}", request.tool),
            )
        }
    }
}

/// Write a single JSON line and flush.
async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, json: &str) -> Result<()> {
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| RunAiError::Channel(format!("failed to write to stdout: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| RunAiError::Channel(format!("failed to write newline to stdout: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| RunAiError::Channel(format!("failed to flush stdout: {e}")))?;
    Ok(())
}

//! Headless host bridge binary for stdin/stdout JSON tool calls.
//!
//! Reads `ToolRequest` lines from stdin, runs them through the tool
//! registry, and writes `ToolResponse` lines to stdout. Provider keys come
//! from the environment, optionally loaded from a `.env` file.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use anyhow::Context;
use clap::Parser;
use runai::config::RunAiConfig;
use runai::host::stdio::run_stdio_bridge;
use runai::tools::ToolRegistry;
use std::path::PathBuf;

const DEFAULT_LOG_FILTER: &str = "runai=info,runai_search=info";

/// Headless tool host: JSON tool calls on stdin, results on stdout.
#[derive(Debug, Parser)]
#[command(name = "runai-host", version, about)]
struct Cli {
    /// Path to TOML configuration file (falls back to `RUNAI_CONFIG`, then
    /// the platform config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is normal; keys may already be in the environment.
    let dotenv = dotenvy::dotenv();

    // Initialise tracing to stderr only (stdout is reserved for the JSON
    // protocol).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let config = RunAiConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let registry = ToolRegistry::from_config(&config);

    tracing::info!(tools = ?registry.list_available(), "runai-host starting");

    run_stdio_bridge(registry).await.map_err(|e| {
        tracing::error!(error = %e, "runai-host exited with error");
        anyhow::anyhow!("runai-host failed: {e}")
    })?;

    tracing::info!("runai-host shut down cleanly");
    Ok(())
}

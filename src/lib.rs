//! RunAI: evidence retrieval host for a running-shoe research agent.
//!
//! The retrieval core lives in the `runai-search` crate. This crate wraps it
//! for an external agent process:
//!
//! - **config**: TOML tunables plus environment credentials
//! - **tools**: `tavily_search` and `google_shopping` with lenient argument
//!   parsing
//! - **host**: a newline-delimited JSON bridge on stdin/stdout

pub mod config;
pub mod error;
pub mod host;
pub mod tools;

pub use config::RunAiConfig;
pub use error::{Result, RunAiError};
pub use tools::{Tool, ToolRegistry};

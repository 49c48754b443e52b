//! Agent-facing tools over the search core.
//!
//! # Tools
//!
//! - **tavily_search**: batched web search with optional source filter
//! - **google_shopping**: batched two-phase price lookup (only when
//!   `shopping.enabled`)
//!
//! Tools never fail at the call level: bad arguments and provider trouble
//! come back as text for the agent to read.

pub mod args;
pub mod registry;
pub mod shopping;
pub mod web_search;

pub use registry::ToolRegistry;
pub use shopping::GoogleShoppingTool;
pub use web_search::TavilySearchTool;

use futures_util::future::BoxFuture;

/// Core trait for agent tools.
///
/// The trait is object safe so a [`ToolRegistry`] can hold tools of
/// different types; `execute` returns a boxed future for that reason.
pub trait Tool: Send + Sync {
    /// Returns the tool name the agent calls it by.
    fn name(&self) -> &str;

    /// Returns a description of when the agent should use the tool.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's arguments.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given JSON arguments and return the text
    /// handed back to the agent.
    fn execute(&self, args: serde_json::Value) -> BoxFuture<'_, String>;
}

//! Tool registry built from host configuration.
//!
//! The [`ToolRegistry`] holds registered tools, provides lookup by name,
//! dispatches calls, and exports JSON schemas for the agent.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RunAiConfig;

use super::{GoogleShoppingTool, TavilySearchTool, Tool};

/// Registry of available tools keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the tools enabled by `config`.
    ///
    /// Web search is always offered; shopping only when `shopping.enabled`.
    pub fn from_config(config: &RunAiConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(TavilySearchTool::new(config.web_search.clone())));
        if config.shopping.enabled {
            registry.register(Arc::new(GoogleShoppingTool::new(config.shopping.clone())));
        } else {
            tracing::info!("shopping disabled; google_shopping not registered");
        }
        registry
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// List names of all registered tools, sorted.
    pub fn list_available(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.values().map(|t| t.name()).collect();
        names.sort_unstable();
        names
    }

    /// Export JSON schemas for all tools.
    ///
    /// Each entry contains `name`, `description`, and `parameters` (the schema).
    pub fn schemas_for_api(&self) -> Vec<serde_json::Value> {
        let mut schemas: Vec<(String, serde_json::Value)> = self
            .tools
            .values()
            .map(|t| {
                let entry = serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.schema(),
                });
                (t.name().to_string(), entry)
            })
            .collect();
        schemas.sort_by(|a, b| a.0.cmp(&b.0));
        schemas.into_iter().map(|(_, v)| v).collect()
    }

    /// Run the named tool, or return `None` if it is not registered.
    pub async fn dispatch(&self, name: &str, args: serde_json::Value) -> Option<String> {
        let tool = self.get(name)?;
        tracing::debug!(tool = name, "dispatching tool call");
        Some(tool.execute(args).await)
    }
}

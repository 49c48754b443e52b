//! `tavily_search`: batched web search for reviews and comparisons.

use futures_util::future::BoxFuture;
use runai_search::WebSearchConfig;
use serde_json::Value;

use super::Tool;
use super::args;

const DESCRIPTION: &str = "Search the web using Tavily. Best for:
- Running shoe reviews from RunRepeat, Believe in the Run, Doctors of Running
- Reddit discussions from r/running, r/runningshoegeeks
- Expert comparisons and analysis

Supports:
- Batch queries (queries: list[str]) searched concurrently
- Priority sources (sources: list[str] or \"high_priority\")

Tips:
- Use \"vs\" for comparisons (e.g. \"Bondi 8 vs Nimbus 26\")
- Add sources=\"high_priority\" for prioritized reviews from RunRepeat, Reddit, etc.";

/// Tool that fans a batch of queries out to the web search provider.
///
/// # Arguments (JSON)
///
/// - `queries` (list of strings, required)
/// - `sources` (list of domains, or `"high_priority"`, optional)
/// - `max_results` (integer, optional): per query, capped at 10
pub struct TavilySearchTool {
    config: WebSearchConfig,
}

impl TavilySearchTool {
    /// Create the tool over a web search configuration.
    pub fn new(config: WebSearchConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: Value) -> String {
        let raw_queries = args.get("queries");
        let Some(queries) = args::string_list(raw_queries) else {
            return format!(
                "Error: queries is required and must be a list (got: {})",
                args::type_name(raw_queries)
            );
        };
        let filter = args::source_filter(args.get("sources"));
        let limit = args::integer(args.get("max_results")).and_then(|n| usize::try_from(n).ok());

        runai_search::search(&queries, filter, limit, &self.config).await
    }
}

impl Tool for TavilySearchTool {
    fn name(&self) -> &str {
        "tavily_search"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "queries": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Search queries, searched concurrently"
                },
                "sources": {
                    "description": "Domains to restrict results to, or \"high_priority\"",
                    "oneOf": [
                        {"type": "array", "items": {"type": "string"}},
                        {"type": "string", "enum": ["high_priority"]}
                    ]
                },
                "max_results": {
                    "type": "integer",
                    "description": "Results per query (default 5, max 10)"
                }
            },
            "required": ["queries"]
        })
    }

    fn execute(&self, args: Value) -> BoxFuture<'_, String> {
        Box::pin(self.run(args))
    }
}

//! `google_shopping`: batched price and store lookup.

use futures_util::future::BoxFuture;
use runai_search::ShoppingConfig;
use serde_json::Value;

use super::Tool;
use super::args;

const DESCRIPTION: &str = "Search Google Shopping for current prices and purchase links. Returns:
- Product name and price (USD)
- Direct purchase links to retailers (Amazon, Zappos, etc.)
- Rating and review count

IMPORTANT: Only use specific shoe model names. Do NOT use generic terms like \"best running shoes\".";

/// Tool that runs the two-phase shopping lookup for a batch of products.
///
/// # Arguments (JSON)
///
/// - `queries` (list of shoe model names, required)
/// - `min_price`, `max_price` (integers, optional): ignored unless positive
pub struct GoogleShoppingTool {
    config: ShoppingConfig,
}

impl GoogleShoppingTool {
    /// Create the tool over a shopping configuration.
    pub fn new(config: ShoppingConfig) -> Self {
        Self { config }
    }

    async fn run(&self, args: Value) -> String {
        let Some(queries) = args::string_list(args.get("queries")) else {
            return "Error: queries is required and must be a list of shoe names".to_owned();
        };
        let min_price = args::integer(args.get("min_price"));
        let max_price = args::integer(args.get("max_price"));

        runai_search::shopping_search(&queries, min_price, max_price, &self.config).await
    }
}

impl Tool for GoogleShoppingTool {
    fn name(&self) -> &str {
        "google_shopping"
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
                    "description": "Specific shoe model names"
                },
                "max_price": {
                    "type": "integer",
                    "description": "Upper price bound in USD"
                },
                "min_price": {
                    "type": "integer",
                    "description": "Lower price bound in USD"
                }
            },
            "required": ["queries"]
        })
    }

    fn execute(&self, args: Value) -> BoxFuture<'_, String> {
        Box::pin(self.run(args))
    }
}

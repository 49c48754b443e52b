//! # runai-search
//!
//! Concurrent research lookups for the RunAI running-shoe agent.
//!
//! Two tools sit on top of two orchestration strategies:
//!
//! - [`search`] fans a batch of queries out to the Tavily web search API under
//!   a fixed concurrency bound and renders one section per query.
//! - [`shopping_search`] runs a two-phase SerpApi lookup per query (product
//!   list, then store listings per product) under a smaller bound, with
//!   backoff on rate limiting and graceful degradation when enrichment fails.
//!
//! Both return plain text for an LLM to read. Output sections always appear
//! in input order, and a failure in one query never affects its siblings.
//!
//! ## Security
//!
//! - API keys come from the environment and are never serialized
//! - Query text is logged only at trace level

pub mod config;
pub mod error;
pub mod format;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod types;

pub use config::{ShoppingConfig, WebSearchConfig};
pub use error::{Result, SearchError};
pub use orchestrator::chained::ChainedLookupSearcher;
pub use orchestrator::fanout::BoundedFanoutSearcher;
pub use provider::{ShoppingProvider, WebSearchProvider};
pub use retry::RetryPolicy;
pub use types::{PriceRange, QueryBatch, SearchOutcome, SourceFilter, SourcePreset};

/// Run a batch of web searches and render the combined result text.
///
/// Never fails: an invalid batch or missing key yields a single
/// `Error: ...` line, and per-query failures render as inline error
/// sections.
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// use runai_search::{SourceFilter, SourcePreset, WebSearchConfig};
///
/// let config = WebSearchConfig::default().with_api_key("tvly-...");
/// let text = runai_search::search(
///     &["Hoka Bondi 9 review".to_owned()],
///     Some(SourceFilter::Preset(SourcePreset::HighPriority)),
///     None,
///     &config,
/// )
/// .await;
/// println!("{text}");
/// # }
/// ```
pub async fn search(
    queries: &[String],
    source_filter: Option<SourceFilter>,
    result_limit: Option<usize>,
    config: &WebSearchConfig,
) -> String {
    let batch = match QueryBatch::new(queries) {
        Ok(batch) => batch,
        Err(err) => return boundary_error(&err, WEB_LABEL),
    };
    if let Err(err) = config.require_api_key() {
        return boundary_error(&err, WEB_LABEL);
    }
    match BoundedFanoutSearcher::from_config(config) {
        Ok(searcher) => {
            searcher
                .search(&batch, source_filter.as_ref(), result_limit)
                .await
        }
        Err(err) => boundary_error(&err, WEB_LABEL),
    }
}

/// Run a batch of two-phase shopping lookups and render the combined text.
///
/// Non-positive price bounds are ignored. Like [`search`], this never fails.
pub async fn shopping_search(
    queries: &[String],
    min_price: Option<i64>,
    max_price: Option<i64>,
    config: &ShoppingConfig,
) -> String {
    let batch = match QueryBatch::new(queries) {
        Ok(batch) => batch,
        Err(err) => return boundary_error(&err, SHOPPING_LABEL),
    };
    if let Err(err) = config.require_api_key() {
        return boundary_error(&err, SHOPPING_LABEL);
    }
    match ChainedLookupSearcher::from_config(config) {
        Ok(searcher) => {
            searcher
                .search(&batch, PriceRange::new(min_price, max_price))
                .await
        }
        Err(err) => boundary_error(&err, SHOPPING_LABEL),
    }
}

const WEB_LABEL: &str = "Tavily search";
const SHOPPING_LABEL: &str = "Google Shopping search";

/// Single-line text for a call that never reached the provider.
///
/// Rejections of the call itself read `Error: ...`; a searcher that could
/// not be built reads `{label} failed: ...`.
fn boundary_error(err: &SearchError, label: &str) -> String {
    match err {
        SearchError::InvalidInput(detail) => format!("Error: {detail}"),
        err if err.is_pre_dispatch() => format!("Error: {err}"),
        err => format!("{label} failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_batch_is_rejected_before_credentials() {
        let text = search(&[], None, None, &WebSearchConfig::default()).await;
        assert_eq!(text, "Error: queries must be a non-empty list of strings");
    }

    #[tokio::test]
    async fn blank_only_batch_is_rejected() {
        let queries = vec!["  ".to_owned(), String::new()];
        let config = ShoppingConfig::default().with_api_key("key");
        let text = shopping_search(&queries, None, None, &config).await;
        assert_eq!(text, "Error: queries must be a non-empty list of strings");
    }

    #[tokio::test]
    async fn missing_keys_are_reported_by_name() {
        let queries = vec!["Bondi 9".to_owned()];
        assert_eq!(
            search(&queries, None, None, &WebSearchConfig::default()).await,
            "Error: TAVILY_API_KEY not configured"
        );
        assert_eq!(
            shopping_search(&queries, None, None, &ShoppingConfig::default()).await,
            "Error: SERPAPI_KEY not configured"
        );
    }

    #[test]
    fn boundary_error_separates_rejections_from_setup_failures() {
        let rejected = SearchError::MissingCredential("SERPAPI_KEY".into());
        assert!(rejected.is_pre_dispatch());
        assert_eq!(
            boundary_error(&rejected, SHOPPING_LABEL),
            "Error: SERPAPI_KEY not configured"
        );

        let setup = SearchError::Config("bad base_url".into());
        assert!(!setup.is_pre_dispatch());
        assert_eq!(
            boundary_error(&setup, WEB_LABEL),
            "Tavily search failed: config error: bad base_url"
        );
    }

    #[tokio::test]
    async fn invalid_config_is_reported_as_search_failure() {
        let queries = vec!["Bondi 9".to_owned()];
        let config = WebSearchConfig::default()
            .with_api_key("key")
            .with_base_url("not a url");
        let text = search(&queries, None, None, &config).await;
        assert!(text.starts_with("Tavily search failed: "), "{text}");

        let config = ShoppingConfig::default()
            .with_api_key("key")
            .with_base_url("not a url");
        let text = shopping_search(&queries, None, None, &config).await;
        assert!(text.starts_with("Google Shopping search failed: "), "{text}");
    }
}

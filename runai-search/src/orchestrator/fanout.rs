//! Bounded fan-out web search across a batch of queries.
//!
//! Every query is sent once to a single-phase provider with at most
//! `concurrency` requests in flight. A failed query degrades to an inline
//! error section; its siblings are unaffected. No retries: the provider is
//! treated as best-effort.

use crate::config::WebSearchConfig;
use crate::error::SearchError;
use crate::format::{self, SectionKind};
use crate::provider::WebSearchProvider;
use crate::providers::TavilyProvider;
use crate::types::{QueryBatch, SearchOutcome, SearchRequest, SourceFilter, SourcePreset};
use tokio::sync::Semaphore;

use super::gather;

/// Web searcher with a fixed concurrency bound.
#[derive(Debug)]
pub struct BoundedFanoutSearcher<P> {
    provider: P,
    permits: Semaphore,
    concurrency: usize,
    default_max_results: usize,
    snippet_chars: usize,
    high_priority_sources: Vec<String>,
}

impl BoundedFanoutSearcher<TavilyProvider> {
    /// Build a searcher backed by the Tavily API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingCredential`] if no API key is configured,
    /// or [`SearchError::Config`] if the configuration is invalid.
    pub fn from_config(config: &WebSearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let provider = TavilyProvider::from_config(config)?;
        Ok(Self::new(provider, config))
    }
}

impl<P: WebSearchProvider> BoundedFanoutSearcher<P> {
    /// Build a searcher around any provider.
    ///
    /// A configured concurrency of zero is raised to one.
    pub fn new(provider: P, config: &WebSearchConfig) -> Self {
        let concurrency = config.concurrency.max(1);
        Self {
            provider,
            permits: Semaphore::new(concurrency),
            concurrency,
            default_max_results: config.max_results,
            snippet_chars: config.snippet_chars,
            high_priority_sources: config.high_priority_sources.clone(),
        }
    }

    /// Maximum number of requests this searcher keeps in flight.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Expand a source filter into the domain list sent with each request.
    pub fn resolve_domains(&self, filter: Option<&SourceFilter>) -> Vec<String> {
        match filter {
            None => Vec::new(),
            Some(SourceFilter::Domains(domains)) => domains.clone(),
            Some(SourceFilter::Preset(SourcePreset::HighPriority)) => {
                self.high_priority_sources.clone()
            }
        }
    }

    /// Search every query in the batch and render one section per query.
    ///
    /// Never fails once given a valid batch: per-query errors are rendered
    /// inline.
    pub async fn search(
        &self,
        batch: &QueryBatch,
        filter: Option<&SourceFilter>,
        result_limit: Option<usize>,
    ) -> String {
        let outcomes = self.search_outcomes(batch, filter, result_limit).await;
        let sections = batch.iter().zip(outcomes).map(|(query, outcome)| match outcome {
            SearchOutcome::Success(text) => text,
            SearchOutcome::Failure(detail) => {
                format::failure_section(SectionKind::Web, query, &detail)
            }
        });
        format::join_sections(sections)
    }

    /// Search every query and return the per-query outcomes in input order.
    pub async fn search_outcomes(
        &self,
        batch: &QueryBatch,
        filter: Option<&SourceFilter>,
        result_limit: Option<usize>,
    ) -> Vec<SearchOutcome> {
        let domains = self.resolve_domains(filter);
        let max_results = result_limit.unwrap_or(self.default_max_results);
        tracing::info!(
            provider = self.provider.name(),
            queries = batch.len(),
            concurrency = self.concurrency,
            domains = domains.len(),
            "dispatching web search batch"
        );

        let requests: Vec<SearchRequest> = batch
            .iter()
            .map(|query| SearchRequest::new(query, domains.clone(), max_results))
            .collect();
        let outcomes = gather(requests.iter().map(|request| self.search_one(request))).await;

        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, SearchOutcome::Failure(_)))
            .count();
        tracing::info!(queries = outcomes.len(), failed, "web search batch complete");
        outcomes
    }

    async fn search_one(&self, request: &SearchRequest) -> SearchOutcome {
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => return SearchOutcome::Failure("search semaphore closed".into()),
        };
        tracing::trace!(query = %request.query, "web search request");

        match self.provider.search(request).await {
            Ok(response) => {
                tracing::debug!(results = response.results.len(), "web search query succeeded");
                SearchOutcome::Success(format::web_section(
                    &request.query,
                    &response,
                    self.snippet_chars,
                ))
            }
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    code = err.code(),
                    error = %err,
                    "web search query failed"
                );
                SearchOutcome::Failure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{WebResult, WebSearchResponse};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Stub provider: per-query canned results, per-query latency, and
    /// in-flight tracking.
    #[derive(Default)]
    struct StubProvider {
        failures: HashMap<String, SearchError>,
        latency_ms: HashMap<String, u64>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        seen_queries: Mutex<Vec<String>>,
        seen_limits: Mutex<Vec<usize>>,
    }

    impl StubProvider {
        fn fail(mut self, query: &str, err: SearchError) -> Self {
            self.failures.insert(query.to_owned(), err);
            self
        }

        fn slow(mut self, query: &str, ms: u64) -> Self {
            self.latency_ms.insert(query.to_owned(), ms);
            self
        }
    }

    impl WebSearchProvider for StubProvider {
        async fn search(&self, request: &SearchRequest) -> Result<WebSearchResponse, SearchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.seen_queries
                .lock()
                .expect("lock")
                .push(request.provider_query());
            self.seen_limits.lock().expect("lock").push(request.max_results);

            let latency = self.latency_ms.get(&request.query).copied().unwrap_or(10);
            tokio::time::sleep(Duration::from_millis(latency)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if let Some(err) = self.failures.get(&request.query) {
                return Err(err.clone());
            }
            Ok(WebSearchResponse {
                answer: None,
                results: vec![WebResult {
                    title: Some(format!("Review of {}", request.query)),
                    url: Some("https://runrepeat.com/review".into()),
                    score: 0.87,
                    content: "Cushioned daily trainer.".into(),
                }],
            })
        }

        fn name(&self) -> &'static str {
            "stub"
        }
    }

    fn searcher(provider: StubProvider, concurrency: usize) -> BoundedFanoutSearcher<StubProvider> {
        let config = WebSearchConfig {
            concurrency,
            ..Default::default()
        };
        BoundedFanoutSearcher::new(provider, &config)
    }

    #[tokio::test(start_paused = true)]
    async fn sections_follow_input_order_not_completion_order() {
        let provider = StubProvider::default()
            .slow("first", 300)
            .slow("second", 10)
            .slow("third", 100);
        let s = searcher(provider, 4);
        let batch = QueryBatch::new(["first", "second", "third"]).expect("batch");
        let text = s.search(&batch, None, None).await;

        let first = text.find("\"first\"").expect("first");
        let second = text.find("\"second\"").expect("second");
        let third = text.find("\"third\"").expect("third");
        assert!(first < second && second < third);
        assert_eq!(text.matches("## Search Results for").count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_never_exceeds_concurrency() {
        let s = searcher(StubProvider::default(), 3);
        let queries: Vec<String> = (0..10).map(|i| format!("q{i}")).collect();
        let batch = QueryBatch::new(&queries).expect("batch");
        let outcomes = s.search_outcomes(&batch, None, None).await;

        assert_eq!(outcomes.len(), 10);
        assert_eq!(s.provider.max_in_flight.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn one_failure_does_not_affect_siblings() {
        let provider = StubProvider::default().fail(
            "broken",
            SearchError::Server {
                status: 502,
                message: "bad gateway".into(),
            },
        );
        let s = searcher(provider, 2);
        let batch = QueryBatch::new(["ok one", "broken", "ok two"]).expect("batch");
        let outcomes = s.search_outcomes(&batch, None, None).await;

        assert!(matches!(outcomes[0], SearchOutcome::Success(_)));
        assert!(matches!(&outcomes[1], SearchOutcome::Failure(m) if m.contains("HTTP 502")));
        assert!(matches!(outcomes[2], SearchOutcome::Success(_)));

        let text = s.search(&batch, None, None).await;
        assert!(text.contains(
            "## Search Results for \"broken\"\n\nError: server error (HTTP 502): bad gateway\n\n"
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_retried() {
        let provider =
            StubProvider::default().fail("throttled", SearchError::RateLimited("HTTP 429".into()));
        let s = searcher(provider, 2);
        let batch = QueryBatch::new(["throttled"]).expect("batch");
        let _ = s.search(&batch, None, None).await;
        assert_eq!(s.provider.seen_queries.lock().expect("lock").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn preset_expands_to_site_clauses() {
        let s = searcher(StubProvider::default(), 2);
        let batch = QueryBatch::new(["Bondi 8 vs Nimbus 26"]).expect("batch");
        let filter = SourceFilter::Preset(SourcePreset::HighPriority);
        let _ = s.search(&batch, Some(&filter), None).await;

        let seen = s.provider.seen_queries.lock().expect("lock");
        assert!(seen[0].starts_with("Bondi 8 vs Nimbus 26 (site:runrepeat.com OR "));
        assert!(seen[0].ends_with("site:reddit.com/r/AskRunningShoeGeeks)"));
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_domains_expand_the_same_way() {
        let s = searcher(StubProvider::default(), 2);
        let batch = QueryBatch::new(["Novablast 5"]).expect("batch");
        let filter = SourceFilter::Domains(vec!["runrepeat.com".into(), "".into()]);
        let _ = s.search(&batch, Some(&filter), None).await;

        let seen = s.provider.seen_queries.lock().expect("lock");
        assert_eq!(seen[0], "Novablast 5 (site:runrepeat.com)");
    }

    #[tokio::test(start_paused = true)]
    async fn result_limit_defaults_and_clamps() {
        let s = searcher(StubProvider::default(), 1);
        let batch = QueryBatch::new(["a"]).expect("batch");
        let _ = s.search(&batch, None, None).await;
        let _ = s.search(&batch, None, Some(25)).await;
        let _ = s.search(&batch, None, Some(3)).await;
        assert_eq!(*s.provider.seen_limits.lock().expect("lock"), vec![5, 10, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_calls_are_byte_identical() {
        let s = searcher(StubProvider::default().slow("b", 50), 2);
        let batch = QueryBatch::new(["a", "b", "c"]).expect("batch");
        let first = s.search(&batch, None, None).await;
        let second = s.search(&batch, None, None).await;
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn single_query_example_section() {
        let s = searcher(StubProvider::default(), 4);
        let batch = QueryBatch::new(["Shoe A vs Shoe B"]).expect("batch");
        let text = s.search(&batch, None, None).await;
        assert!(text.contains("**1. Review of Shoe A vs Shoe B**\n"));
        assert!(text.contains("URL: https://runrepeat.com/review\n"));
        assert!(text.contains("Score: 0.87\n"));
        assert!(text.contains("Cushioned daily trainer.\n"));
        assert!(!text.contains("Answer"));
    }

    #[test]
    fn zero_concurrency_is_raised_to_one() {
        let s = searcher(StubProvider::default(), 0);
        assert_eq!(s.concurrency(), 1);
    }

    #[test]
    fn from_config_without_key_is_missing_credential() {
        let err = BoundedFanoutSearcher::from_config(&WebSearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::MissingCredential(_)));
    }
}

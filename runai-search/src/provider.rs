//! Trait definitions for pluggable search provider backends.
//!
//! The searchers are generic over these traits so the orchestration logic
//! runs unchanged against the HTTP providers in [`crate::providers`] or an
//! in-process stub.

use crate::error::SearchError;
use crate::types::{Candidate, PriceRange, SearchRequest, StoreListing, WebSearchResponse};
use std::future::Future;

/// A single-phase web search backend.
///
/// Implementations classify their failures into the [`SearchError`]
/// taxonomy (429 → `RateLimited`, 5xx/network → transient, other 4xx →
/// `Provider`); callers rely on that to decide what is retried.
pub trait WebSearchProvider: Send + Sync {
    /// Run one search request.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<WebSearchResponse, SearchError>> + Send;

    /// Short provider name for log lines.
    fn name(&self) -> &'static str;
}

/// A two-phase shopping backend: product list, then per-product stores.
pub trait ShoppingProvider: Send + Sync {
    /// Phase 1: list candidate products for `query`, in provider order.
    fn products(
        &self,
        query: &str,
        price_range: PriceRange,
    ) -> impl Future<Output = Result<Vec<Candidate>, SearchError>> + Send;

    /// Phase 2: redeem an enrichment token for store listings, in provider order.
    fn store_listings(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<StoreListing>, SearchError>> + Send;

    /// Short provider name for log lines.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WebResult;

    /// A canned provider for exercising trait bounds and async execution.
    struct MockProvider {
        response: Option<WebSearchResponse>,
    }

    impl WebSearchProvider for MockProvider {
        async fn search(&self, _request: &SearchRequest) -> Result<WebSearchResponse, SearchError> {
            self.response
                .clone()
                .ok_or_else(|| SearchError::Provider("mock provider failure".into()))
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    #[test]
    fn mock_provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockProvider>();
    }

    #[tokio::test]
    async fn mock_provider_returns_results() {
        let provider = MockProvider {
            response: Some(WebSearchResponse {
                answer: None,
                results: vec![WebResult {
                    title: Some("Test".into()),
                    url: Some("https://test.com".into()),
                    score: 0.5,
                    content: "A test result".into(),
                }],
            }),
        };
        let request = SearchRequest::new("test", vec![], 5);
        let response = provider.search(&request).await.expect("should succeed");
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].title.as_deref(), Some("Test"));
    }

    #[tokio::test]
    async fn mock_provider_propagates_errors() {
        let provider = MockProvider { response: None };
        let request = SearchRequest::new("test", vec![], 5);
        let err = provider.search(&request).await.unwrap_err();
        assert!(err.to_string().contains("mock provider failure"));
    }
}

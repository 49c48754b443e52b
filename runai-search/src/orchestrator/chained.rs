//! Chained two-phase shopping lookup.
//!
//! Phase 1 lists candidate products per query; phase 2 redeems each
//! candidate's enrichment token for store listings. Both phases run under
//! the configured [`RetryPolicy`]. A query holds its concurrency permit for
//! the whole flow, so phase-2 requests never push the in-flight count past
//! the bound.
//!
//! Degradation rules:
//!
//! - phase 1 rate limited → a notice pointing at web search for prices
//! - phase 1 returns nothing → a "no products" section
//! - phase 2 fails for a candidate → that candidate keeps its product link

use crate::config::ShoppingConfig;
use crate::error::SearchError;
use crate::format::{self, SectionKind};
use crate::provider::ShoppingProvider;
use crate::providers::SerpApiProvider;
use crate::retry::RetryPolicy;
use crate::types::{
    Candidate, EnrichedCandidate, Enrichment, PriceRange, QueryBatch, SearchOutcome,
};
use tokio::sync::Semaphore;

use super::gather;

const PHASE_ONE_LABEL: &str = "google_shopping";
const PHASE_TWO_LABEL: &str = "google_immersive_product";

/// Two-phase shopping searcher with a fixed concurrency bound.
#[derive(Debug)]
pub struct ChainedLookupSearcher<P> {
    provider: P,
    permits: Semaphore,
    concurrency: usize,
    retry: RetryPolicy,
    max_products: usize,
    max_stores: usize,
}

impl ChainedLookupSearcher<SerpApiProvider> {
    /// Build a searcher backed by SerpApi.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingCredential`] if no API key is configured,
    /// or [`SearchError::Config`] if the configuration is invalid.
    pub fn from_config(config: &ShoppingConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let provider = SerpApiProvider::from_config(config)?;
        Ok(Self::new(provider, config))
    }
}

impl<P: ShoppingProvider> ChainedLookupSearcher<P> {
    /// Build a searcher around any provider.
    ///
    /// A configured concurrency of zero is raised to one.
    pub fn new(provider: P, config: &ShoppingConfig) -> Self {
        let concurrency = config.concurrency.max(1);
        Self {
            provider,
            permits: Semaphore::new(concurrency),
            concurrency,
            retry: config.retry.clone(),
            max_products: config.max_products,
            max_stores: config.max_stores,
        }
    }

    /// Maximum number of queries this searcher runs at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Look up every query in the batch and render one section per query.
    pub async fn search(&self, batch: &QueryBatch, price_range: PriceRange) -> String {
        let outcomes = self.search_outcomes(batch, price_range).await;
        let sections = batch.iter().zip(outcomes).map(|(query, outcome)| match outcome {
            SearchOutcome::Success(text) => text,
            SearchOutcome::Failure(detail) => {
                format::failure_section(SectionKind::Shopping, query, &detail)
            }
        });
        format::join_sections(sections)
    }

    /// Look up every query and return the per-query outcomes in input order.
    pub async fn search_outcomes(
        &self,
        batch: &QueryBatch,
        price_range: PriceRange,
    ) -> Vec<SearchOutcome> {
        tracing::info!(
            provider = self.provider.name(),
            queries = batch.len(),
            concurrency = self.concurrency,
            price_min = ?price_range.min,
            price_max = ?price_range.max,
            "dispatching shopping batch"
        );
        let outcomes = gather(batch.iter().map(|query| self.lookup_one(query, price_range))).await;
        tracing::info!(queries = outcomes.len(), "shopping batch complete");
        outcomes
    }

    async fn lookup_one(&self, query: &str, price_range: PriceRange) -> SearchOutcome {
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => return SearchOutcome::Failure("shopping semaphore closed".into()),
        };
        tracing::trace!(query, "shopping phase 1 request");

        let products = self
            .retry
            .execute(PHASE_ONE_LABEL, || self.provider.products(query, price_range))
            .await;

        let mut candidates = match products {
            Ok(candidates) => candidates,
            Err(SearchError::RateLimited(detail)) => {
                tracing::warn!(
                    %detail,
                    "shopping lookup rate limited; returning degradation notice"
                );
                return SearchOutcome::Success(format::rate_limited_section(query));
            }
            Err(SearchError::Provider(detail)) => {
                tracing::warn!(%detail, "shopping provider rejected query");
                return SearchOutcome::Success(format::provider_error_section(query, &detail));
            }
            Err(err) => {
                tracing::warn!(code = err.code(), error = %err, "shopping lookup failed");
                return SearchOutcome::Failure(err.to_string());
            }
        };

        candidates.truncate(self.max_products);
        if candidates.is_empty() {
            return SearchOutcome::Success(format::no_products_section(query));
        }

        let mut enriched = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            enriched.push(self.enrich(candidate).await);
        }
        let with_stores = enriched
            .iter()
            .filter(|c| !c.enrichment.listings().is_empty())
            .count();
        tracing::debug!(
            candidates = enriched.len(),
            with_stores,
            "shopping query enriched"
        );
        SearchOutcome::Success(format::shopping_section(query, &enriched))
    }

    /// Run phase 2 for one candidate. Never fails: errors leave the
    /// candidate in [`Enrichment::EnrichmentFailed`].
    async fn enrich(&self, candidate: Candidate) -> EnrichedCandidate {
        let token = candidate.enrichment_token.as_deref();
        let enrichment = match (Enrichment::initial(&candidate), token) {
            (Enrichment::NeedsEnrichment, Some(token)) => {
                match self
                    .retry
                    .execute(PHASE_TWO_LABEL, || self.provider.store_listings(token))
                    .await
                {
                    Ok(mut listings) => {
                        listings.truncate(self.max_stores);
                        Enrichment::Enriched(listings)
                    }
                    Err(err) => {
                        tracing::debug!(
                            code = err.code(),
                            error = %err,
                            "store listing lookup failed; falling back to product link"
                        );
                        Enrichment::EnrichmentFailed
                    }
                }
            }
            (state, _) => state,
        };
        EnrichedCandidate {
            candidate,
            enrichment,
        }
    }
}

//! Core types: query batches, requests, provider results, and outcomes.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard cap on results the web search provider will return per query.
pub const PROVIDER_MAX_RESULTS: usize = 10;

/// An ordered, non-empty batch of trimmed query strings.
///
/// Blank entries are dropped on construction. Duplicates are kept and the
/// input order is preserved, since output sections are keyed by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBatch {
    queries: Vec<String>,
}

impl QueryBatch {
    /// Build a batch, trimming each entry and dropping blank ones.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] if nothing is left after filtering.
    pub fn new<I, S>(queries: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let queries: Vec<String> = queries
            .into_iter()
            .map(|q| q.as_ref().trim().to_owned())
            .filter(|q| !q.is_empty())
            .collect();
        if queries.is_empty() {
            return Err(SearchError::InvalidInput(
                "queries must be a non-empty list of strings".into(),
            ));
        }
        Ok(Self { queries })
    }

    /// Number of queries in the batch.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Always false; a constructed batch holds at least one query.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Iterate over the queries in input order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(String::as_str)
    }
}

/// Named source presets understood by the web searcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePreset {
    /// Expert review sites and running subreddits.
    HighPriority,
}

impl SourcePreset {
    /// Returns the wire name of this preset.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HighPriority => "high_priority",
        }
    }

    /// Look up a preset by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "high_priority" => Some(Self::HighPriority),
            _ => None,
        }
    }
}

impl fmt::Display for SourcePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Restricts a web search to a set of domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFilter {
    /// Caller-supplied domains.
    Domains(Vec<String>),
    /// A named preset, expanded from configuration.
    Preset(SourcePreset),
}

/// One web search request, ready for a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// The query as the caller wrote it.
    pub query: String,
    /// Domains the search is restricted to. Empty means unrestricted.
    pub domains: Vec<String>,
    /// Result count, already clamped to `1..=PROVIDER_MAX_RESULTS`.
    pub max_results: usize,
}

impl SearchRequest {
    /// Build a request, clamping `max_results` to the provider maximum.
    pub fn new(query: impl Into<String>, domains: Vec<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            domains: domains
                .into_iter()
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty())
                .collect(),
            max_results: max_results.clamp(1, PROVIDER_MAX_RESULTS),
        }
    }

    /// The query text sent to the provider, with `site:` clauses appended.
    ///
    /// `shoes` restricted to `a.com` and `b.com` becomes
    /// `shoes (site:a.com OR site:b.com)`.
    pub fn provider_query(&self) -> String {
        if self.domains.is_empty() {
            return self.query.clone();
        }
        let sites: Vec<String> = self.domains.iter().map(|d| format!("site:{d}")).collect();
        format!("{} ({})", self.query, sites.join(" OR "))
    }
}

/// One itemised web search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    /// Page title.
    pub title: Option<String>,
    /// Page URL.
    pub url: Option<String>,
    /// Provider-native relevance score.
    pub score: f64,
    /// Content snippet.
    pub content: String,
}

/// A provider response for one web search query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSearchResponse {
    /// Synthesised answer summary, if the provider produced one.
    pub answer: Option<String>,
    /// Itemised results in provider order.
    pub results: Vec<WebResult>,
}

/// Optional price bounds for a shopping lookup.
///
/// Non-positive bounds are treated as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    /// Lower price bound.
    pub min: Option<i64>,
    /// Upper price bound.
    pub max: Option<i64>,
}

impl PriceRange {
    /// Build a range, discarding non-positive bounds.
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            min: min.filter(|v| *v > 0),
            max: max.filter(|v| *v > 0),
        }
    }

    /// Provider range-filter syntax, or `None` when unbounded.
    pub fn to_filter(&self) -> Option<String> {
        if self.min.is_none() && self.max.is_none() {
            return None;
        }
        let mut tbs = String::from("mr:1,price:1");
        if let Some(min) = self.min {
            tbs.push_str(&format!(",ppr_min:{min}"));
        }
        if let Some(max) = self.max {
            tbs.push_str(&format!(",ppr_max:{max}"));
        }
        Some(tbs)
    }
}

/// One phase-1 shopping result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Product title.
    pub title: Option<String>,
    /// Display price in the provider's currency.
    pub price: Option<String>,
    /// Retailer or source name.
    pub source: Option<String>,
    /// Average rating.
    pub rating: Option<f64>,
    /// Number of reviews behind `rating`.
    pub reviews: u64,
    /// Product image URL.
    pub thumbnail: Option<String>,
    /// Product page link used when no store listings are available.
    pub product_link: Option<String>,
    /// Opaque token redeemable for store listings.
    pub enrichment_token: Option<String>,
}

/// One store offer from a phase-2 lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreListing {
    /// Store name.
    pub name: String,
    /// Display price.
    pub price: Option<String>,
    /// Link to the offer.
    pub link: Option<String>,
}

/// Phase-2 state for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    /// The candidate carries no enrichment token.
    NotEnrichable,
    /// A token is present and the detail lookup has not run yet.
    NeedsEnrichment,
    /// Store listings were fetched (possibly none).
    Enriched(Vec<StoreListing>),
    /// The detail lookup failed; phase-1 data stands alone.
    EnrichmentFailed,
}

impl Enrichment {
    /// Initial state for a freshly fetched candidate.
    pub fn initial(candidate: &Candidate) -> Self {
        if candidate.enrichment_token.is_some() {
            Self::NeedsEnrichment
        } else {
            Self::NotEnrichable
        }
    }

    /// Store listings to render, empty unless enrichment produced some.
    pub fn listings(&self) -> &[StoreListing] {
        match self {
            Self::Enriched(listings) => listings,
            _ => &[],
        }
    }
}

/// A candidate together with its phase-2 outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCandidate {
    /// The phase-1 data.
    pub candidate: Candidate,
    /// Phase-2 state.
    pub enrichment: Enrichment,
}

/// Per-query result, keyed by position in the [`QueryBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A rendered section.
    Success(String),
    /// Error detail, rendered inline as an error section.
    Failure(String),
}

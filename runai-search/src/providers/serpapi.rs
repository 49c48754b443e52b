//! SerpApi Google Shopping: product list, then immersive product stores.
//!
//! Both phases are `GET /search` with different `engine` parameters. SerpApi
//! can answer 200 with an `error` field; that is reported as
//! [`SearchError::Provider`].

use crate::config::ShoppingConfig;
use crate::error::SearchError;
use crate::http::{build_client, send_json};
use crate::provider::ShoppingProvider;
use crate::types::{Candidate, PriceRange, StoreListing};
use serde::Deserialize;
use serde_json::Value;

use super::endpoint;

const SHOPPING_ENGINE: &str = "google_shopping";
const PRODUCT_ENGINE: &str = "google_immersive_product";
const LOCATION: &str = "United States";
const LANGUAGE: &str = "en";
const COUNTRY: &str = "us";

/// SerpApi client for the two shopping engines.
#[derive(Debug, Clone)]
pub struct SerpApiProvider {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ShoppingResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    shopping_results: Vec<RawProduct>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProduct {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    extracted_price: Option<Value>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    reviews: Option<u64>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    product_link: Option<String>,
    #[serde(default)]
    immersive_product_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    product_results: ProductResults,
}

#[derive(Debug, Default, Deserialize)]
struct ProductResults {
    #[serde(default)]
    stores: Vec<RawStore>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStore {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    base_price: Option<Value>,
    #[serde(default)]
    link: Option<String>,
}

/// Render a JSON string or number as display text; blanks and other shapes are `None`.
fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RawProduct> for Candidate {
    fn from(raw: RawProduct) -> Self {
        let price = value_text(raw.price.as_ref())
            .or_else(|| value_text(raw.extracted_price.as_ref()));
        Self {
            title: non_blank(raw.title),
            price,
            source: non_blank(raw.source),
            rating: raw.rating.filter(|r| *r > 0.0),
            reviews: raw.reviews.unwrap_or(0),
            thumbnail: non_blank(raw.thumbnail),
            product_link: non_blank(raw.product_link),
            enrichment_token: non_blank(raw.immersive_product_page_token),
        }
    }
}

impl From<RawStore> for StoreListing {
    fn from(raw: RawStore) -> Self {
        Self {
            name: non_blank(raw.name).unwrap_or_else(|| "Unknown".to_owned()),
            price: value_text(raw.price.as_ref()).or_else(|| value_text(raw.base_price.as_ref())),
            link: non_blank(raw.link),
        }
    }
}

impl SerpApiProvider {
    /// Create a provider with an explicit client and key.
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            url: endpoint(base_url, "search"),
        }
    }

    /// Create a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingCredential`] if no key is configured, or
    /// [`SearchError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: &ShoppingConfig) -> Result<Self, SearchError> {
        let api_key = config.require_api_key()?;
        let client = build_client(config.timeout_seconds)?;
        Ok(Self::new(client, api_key, &config.base_url))
    }

    fn shopping_params<'a>(
        &'a self,
        query: &'a str,
        tbs: Option<&'a str>,
    ) -> Vec<(&'a str, &'a str)> {
        let mut params = vec![
            ("api_key", self.api_key.as_str()),
            ("engine", SHOPPING_ENGINE),
            ("q", query),
            ("location", LOCATION),
            ("hl", LANGUAGE),
            ("gl", COUNTRY),
        ];
        if let Some(tbs) = tbs {
            params.push(("tbs", tbs));
        }
        params
    }

    fn product_params<'a>(&'a self, token: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("api_key", self.api_key.as_str()),
            ("engine", PRODUCT_ENGINE),
            ("page_token", token),
            ("hl", LANGUAGE),
            ("gl", COUNTRY),
        ]
    }
}

impl ShoppingProvider for SerpApiProvider {
    async fn products(
        &self,
        query: &str,
        price_range: PriceRange,
    ) -> Result<Vec<Candidate>, SearchError> {
        let tbs = price_range.to_filter();
        let params = self.shopping_params(query, tbs.as_deref());
        let raw: ShoppingResponse = send_json(self.client.get(&self.url).query(&params)).await?;
        if let Some(error) = non_blank(raw.error) {
            return Err(SearchError::Provider(error));
        }
        Ok(raw.shopping_results.into_iter().map(Candidate::from).collect())
    }

    async fn store_listings(&self, token: &str) -> Result<Vec<StoreListing>, SearchError> {
        let params = self.product_params(token);
        let raw: ProductResponse = send_json(self.client.get(&self.url).query(&params)).await?;
        if let Some(error) = non_blank(raw.error) {
            return Err(SearchError::Provider(error));
        }
        Ok(raw
            .product_results
            .stores
            .into_iter()
            .map(StoreListing::from)
            .collect())
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }
}

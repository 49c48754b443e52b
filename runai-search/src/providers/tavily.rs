//! Tavily web search: one POST per query, optional synthesised answer.

use crate::config::WebSearchConfig;
use crate::error::SearchError;
use crate::http::{build_client, send_json};
use crate::provider::WebSearchProvider;
use crate::types::{SearchRequest, WebResult, WebSearchResponse};
use serde::{Deserialize, Serialize};

use super::endpoint;

/// Tavily search API client.
#[derive(Debug, Clone)]
pub struct TavilyProvider {
    client: reqwest::Client,
    api_key: String,
    url: String,
}

/// Request body for `POST /search`.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: String,
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
    include_images: bool,
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Default, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    content: Option<String>,
}

impl TavilyProvider {
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
    pub fn from_config(config: &WebSearchConfig) -> Result<Self, SearchError> {
        let api_key = config.require_api_key()?;
        let client = build_client(config.timeout_seconds)?;
        Ok(Self::new(client, api_key, &config.base_url))
    }
}

impl From<TavilyResponse> for WebSearchResponse {
    fn from(raw: TavilyResponse) -> Self {
        Self {
            answer: raw.answer.filter(|a| !a.trim().is_empty()),
            results: raw
                .results
                .into_iter()
                .map(|r| WebResult {
                    title: r.title,
                    url: r.url,
                    score: r.score.unwrap_or(0.0),
                    content: r.content.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

impl WebSearchProvider for TavilyProvider {
    async fn search(&self, request: &SearchRequest) -> Result<WebSearchResponse, SearchError> {
        let body = TavilyRequest {
            api_key: &self.api_key,
            query: request.provider_query(),
            max_results: request.max_results,
            include_answer: true,
            include_raw_content: false,
            include_images: false,
        };
        let raw: TavilyResponse = send_json(self.client.post(&self.url).json(&body)).await?;
        Ok(raw.into())
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = TavilyRequest {
            api_key: "k",
            query: "q".into(),
            max_results: 5,
            include_answer: true,
            include_raw_content: false,
            include_images: false,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["max_results"], 5);
        assert_eq!(json["include_answer"], true);
        assert_eq!(json["include_raw_content"], false);
        assert_eq!(json["include_images"], false);
    }

    #[test]
    fn response_fills_missing_fields() {
        let raw: TavilyResponse =
            serde_json::from_str(r#"{"results": [{"title": "T"}], "answer": "  "}"#)
                .expect("deserialize");
        let response = WebSearchResponse::from(raw);
        assert_eq!(response.answer, None);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].score, 0.0);
        assert_eq!(response.results[0].url, None);
        assert_eq!(response.results[0].content, "");
    }

    #[test]
    fn null_answer_is_none() {
        let raw: TavilyResponse =
            serde_json::from_str(r#"{"answer": null, "results": []}"#).expect("deserialize");
        assert_eq!(WebSearchResponse::from(raw).answer, None);
    }

    #[test]
    fn from_config_requires_key() {
        let err = TavilyProvider::from_config(&WebSearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::MissingCredential(_)));
    }
}

//! Search configuration with sensible defaults.
//!
//! [`WebSearchConfig`] drives the bounded fan-out web searcher and
//! [`ShoppingConfig`] the two-phase shopping lookup. Both deserialize from
//! TOML sections with every field optional. API keys are never serialized;
//! they are injected from the environment by the host.

use crate::error::SearchError;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Environment variable holding the web search provider key.
pub const TAVILY_API_KEY_ENV: &str = "TAVILY_API_KEY";

/// Environment variable holding the shopping provider key.
pub const SERPAPI_KEY_ENV: &str = "SERPAPI_KEY";

/// Review sites and communities expanded by the `high_priority` preset.
pub const DEFAULT_HIGH_PRIORITY_SOURCES: &[&str] = &[
    "runrepeat.com",
    "solereview.com",
    "believeintherun.com",
    "doctorsofrunning.com",
    "reddit.com/r/runningshoegeeks",
    "reddit.com/r/running",
    "reddit.com/r/AskRunningShoeGeeks",
];

/// Configuration for the bounded fan-out web searcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    /// Provider API key. Read from [`TAVILY_API_KEY_ENV`], never from disk.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Base URL of the provider API.
    pub base_url: String,
    /// Maximum number of requests in flight at once.
    pub concurrency: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Result count used when the caller does not pass one.
    pub max_results: usize,
    /// Snippet length bound, in characters.
    pub snippet_chars: usize,
    /// Domains expanded by the `high_priority` preset.
    pub high_priority_sources: Vec<String>,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.tavily.com".into(),
            concurrency: 4,
            timeout_seconds: 30,
            max_results: 5,
            snippet_chars: 300,
            high_priority_sources: DEFAULT_HIGH_PRIORITY_SOURCES
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

impl WebSearchConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the provider base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the API key, or [`SearchError::MissingCredential`] if absent or blank.
    pub fn require_api_key(&self) -> Result<&str, SearchError> {
        non_blank_key(self.api_key.as_deref(), TAVILY_API_KEY_ENV)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.concurrency == 0 {
            return Err(SearchError::Config(
                "web_search.concurrency must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "web_search.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "web_search.max_results must be greater than 0".into(),
            ));
        }
        validate_base_url(&self.base_url, "web_search.base_url")
    }
}

/// Configuration for the two-phase shopping lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShoppingConfig {
    /// Whether the shopping tool is offered to the agent at all.
    pub enabled: bool,
    /// Provider API key. Read from [`SERPAPI_KEY_ENV`], never from disk.
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Base URL of the provider API.
    pub base_url: String,
    /// Maximum number of queries in their two-phase flow at once.
    pub concurrency: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Candidates kept per query.
    pub max_products: usize,
    /// Store listings kept per candidate.
    pub max_stores: usize,
    /// Retry schedule applied to both phases.
    pub retry: RetryPolicy,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            base_url: "https://serpapi.com".into(),
            concurrency: 2,
            timeout_seconds: 30,
            max_products: 3,
            max_stores: 3,
            retry: RetryPolicy::default(),
        }
    }
}

impl ShoppingConfig {
    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the provider base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the retry schedule.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the API key, or [`SearchError::MissingCredential`] if absent or blank.
    pub fn require_api_key(&self) -> Result<&str, SearchError> {
        non_blank_key(self.api_key.as_deref(), SERPAPI_KEY_ENV)
    }

    /// Validates this configuration, returning an error if any field is invalid.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.concurrency == 0 {
            return Err(SearchError::Config(
                "shopping.concurrency must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "shopping.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_products == 0 {
            return Err(SearchError::Config(
                "shopping.max_products must be greater than 0".into(),
            ));
        }
        self.retry.validate()?;
        validate_base_url(&self.base_url, "shopping.base_url")
    }
}

fn non_blank_key<'a>(key: Option<&'a str>, var: &str) -> Result<&'a str, SearchError> {
    match key {
        Some(k) if !k.trim().is_empty() => Ok(k),
        _ => Err(SearchError::MissingCredential(var.to_owned())),
    }
}

fn validate_base_url(base_url: &str, field: &str) -> Result<(), SearchError> {
    url::Url::parse(base_url)
        .map(|_| ())
        .map_err(|e| SearchError::Config(format!("{field} is not a valid URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_defaults() {
        let config = WebSearchConfig::default();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.snippet_chars, 300);
        assert_eq!(config.high_priority_sources.len(), 7);
        assert!(config.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn shopping_defaults() {
        let config = ShoppingConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.max_products, 3);
        assert_eq!(config.max_stores, 3);
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.retry.base_delay_ms, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_concurrency_rejected() {
        let web = WebSearchConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(web.validate().unwrap_err().to_string().contains("concurrency"));

        let shopping = ShoppingConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(shopping
            .validate()
            .unwrap_err()
            .to_string()
            .contains("concurrency"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = WebSearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn bad_base_url_rejected() {
        let config = ShoppingConfig::default().with_base_url("not a url");
        assert!(config.validate().unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn missing_or_blank_key_is_missing_credential() {
        let config = WebSearchConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert_eq!(err.to_string(), "TAVILY_API_KEY not configured");

        let config = ShoppingConfig::default().with_api_key("   ");
        let err = config.require_api_key().unwrap_err();
        assert_eq!(err.to_string(), "SERPAPI_KEY not configured");
    }

    #[test]
    fn present_key_is_returned() {
        let config = WebSearchConfig::default().with_api_key("tvly-123");
        assert_eq!(config.require_api_key().ok(), Some("tvly-123"));
    }

    #[test]
    fn api_key_is_never_serialized() {
        let config = WebSearchConfig::default().with_api_key("secret");
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(!json.contains("secret"));
    }

    #[test]
    fn partial_section_fills_defaults() {
        let config: ShoppingConfig =
            serde_json::from_str(r#"{"enabled": true, "max_products": 5}"#).expect("deserialize");
        assert!(config.enabled);
        assert_eq!(config.max_products, 5);
        assert_eq!(config.concurrency, 2);
    }
}

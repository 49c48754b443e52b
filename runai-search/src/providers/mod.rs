//! HTTP search provider implementations.
//!
//! Each module provides a struct implementing one of the traits in
//! [`crate::provider`] against a hosted search API.

pub mod serpapi;
pub mod tavily;

pub use serpapi::SerpApiProvider;
pub use tavily::TavilyProvider;

/// Join a provider base URL and an endpoint path, tolerating a trailing slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

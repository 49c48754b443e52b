//! Shared HTTP client and response classification for provider requests.
//!
//! One [`reqwest::Client`] is built per searcher and shared by every
//! concurrent request in a batch, so requests reuse the connection pool.

use crate::error::SearchError;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// User-Agent sent with every provider request.
const USER_AGENT: &str = concat!("runai-search/", env!("CARGO_PKG_VERSION"));

/// Longest response-body excerpt carried into an error message.
const ERROR_BODY_LIMIT: usize = 500;

/// Build a [`reqwest::Client`] for provider API calls.
///
/// The timeout bounds each individual request, including body download.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if the client cannot be constructed.
pub fn build_client(timeout_seconds: u64) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))
}

/// Map a transport-level failure to a transient error.
pub fn transport_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Network(format!("request timed out: {err}"))
    } else if err.is_connect() {
        SearchError::Network(format!("connection failed: {err}"))
    } else {
        SearchError::Network(err.to_string())
    }
}

/// Classify a non-success status into the error taxonomy.
///
/// 429 is rate limiting, 5xx is transient, anything else is a provider
/// rejection that should not be retried.
pub fn status_error(status: reqwest::StatusCode, body: &str) -> SearchError {
    let message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        SearchError::RateLimited(format!("HTTP 429: {message}"))
    } else if status.is_server_error() {
        SearchError::Server {
            status: status.as_u16(),
            message,
        }
    } else {
        SearchError::Provider(format!("HTTP {}: {message}", status.as_u16()))
    }
}

/// Send a prepared request and decode a 2xx JSON body.
///
/// # Errors
///
/// Transport failures map through [`transport_error`], non-2xx statuses
/// through [`status_error`], and undecodable bodies to [`SearchError::Parse`].
pub async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, SearchError> {
    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    let body = response.text().await.map_err(transport_error)?;
    serde_json::from_str(&body).map_err(|e| SearchError::Parse(e.to_string()))
}

//! Error types for the runai-search crate.
//!
//! Every variant carries a stable error code (SCREAMING_SNAKE_CASE) available
//! through [`SearchError::code()`]. Messages never include API keys.

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Empty or malformed query batch.
    pub const INVALID_INPUT: &str = "INVALID_INPUT";

    /// Provider API key absent from the environment.
    pub const MISSING_CREDENTIAL: &str = "MISSING_CREDENTIAL";

    /// Provider returned HTTP 429 until the retry budget ran out.
    pub const RATE_LIMITED: &str = "RATE_LIMITED";

    /// Network failure or 5xx response.
    pub const TRANSIENT_PROVIDER_ERROR: &str = "TRANSIENT_PROVIDER_ERROR";

    /// Provider rejected the request (4xx other than 429, or an in-body error).
    pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";

    /// Provider response body could not be decoded.
    pub const PARSE_ERROR: &str = "PARSE_ERROR";

    /// Invalid component configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
}

/// Errors that can occur while querying search providers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The query batch was empty after filtering blank entries.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The named credential is not configured.
    #[error("{0} not configured")]
    MissingCredential(String),

    /// The provider throttled the request (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Connection, timeout, or body-read failure.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a 5xx status.
    #[error("server error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        message: String,
    },

    /// The provider rejected the request.
    #[error("provider error: {0}")]
    Provider(String),

    /// The response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => error_codes::INVALID_INPUT,
            Self::MissingCredential(_) => error_codes::MISSING_CREDENTIAL,
            Self::RateLimited(_) => error_codes::RATE_LIMITED,
            Self::Network(_) | Self::Server { .. } => error_codes::TRANSIENT_PROVIDER_ERROR,
            Self::Provider(_) => error_codes::PROVIDER_ERROR,
            Self::Parse(_) => error_codes::PARSE_ERROR,
            Self::Config(_) => error_codes::CONFIG_INVALID,
        }
    }

    /// Returns true for network failures and 5xx responses.
    ///
    /// Rate limiting is retried too, but on its own schedule, so it is not
    /// reported as transient here.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }

    /// Returns true for errors that reject a whole call before dispatch.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::MissingCredential(_))
    }
}

/// Convenience type alias for runai-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

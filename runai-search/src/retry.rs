//! Retry with backoff for throttled and transient provider failures.
//!
//! [`RetryPolicy::execute`] wraps any request closure. HTTP 429 waits grow
//! linearly with the attempt index; network failures and 5xx responses wait
//! the current delay and then grow it by a per-kind multiplier. Anything
//! else is returned immediately.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Default number of attempts, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 2000;

/// Default growth of the base delay after a rate-limited attempt.
pub const DEFAULT_RATE_LIMIT_MULTIPLIER: f64 = 1.0;

/// Default growth of the delay after a 5xx response.
pub const DEFAULT_SERVER_ERROR_MULTIPLIER: f64 = 1.0;

/// Default growth of the delay after a network failure.
pub const DEFAULT_NETWORK_ERROR_MULTIPLIER: f64 = 1.6;

/// Attempt budget and delay schedule for one request.
///
/// # Examples
///
/// ```
/// use runai_search::retry::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts, 2);
/// assert_eq!(policy.base_delay_ms, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Starting delay in milliseconds.
    pub base_delay_ms: u64,
    /// Applied to the delay after each 429 wait.
    pub rate_limit_multiplier: f64,
    /// Applied to the delay after each 5xx wait.
    pub server_error_multiplier: f64,
    /// Applied to the delay after each network-failure wait.
    pub network_error_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            rate_limit_multiplier: DEFAULT_RATE_LIMIT_MULTIPLIER,
            server_error_multiplier: DEFAULT_SERVER_ERROR_MULTIPLIER,
            network_error_multiplier: DEFAULT_NETWORK_ERROR_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base delay in milliseconds.
    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Set the multiplier applied after a network-failure wait.
    pub fn with_network_error_multiplier(mut self, multiplier: f64) -> Self {
        self.network_error_multiplier = multiplier;
        self
    }

    /// Set the multiplier applied after a 5xx wait.
    pub fn with_server_error_multiplier(mut self, multiplier: f64) -> Self {
        self.server_error_multiplier = multiplier;
        self
    }

    /// Set the multiplier applied after a 429 wait.
    pub fn with_rate_limit_multiplier(mut self, multiplier: f64) -> Self {
        self.rate_limit_multiplier = multiplier;
        self
    }

    /// Validates the multipliers: each must be finite and at least 1.0.
    pub fn validate(&self) -> Result<(), SearchError> {
        for (name, value) in [
            ("rate_limit_multiplier", self.rate_limit_multiplier),
            ("server_error_multiplier", self.server_error_multiplier),
            ("network_error_multiplier", self.network_error_multiplier),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(SearchError::Config(format!(
                    "retry.{name} must be a finite value >= 1.0"
                )));
            }
        }
        Ok(())
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Run `request` until it succeeds, fails permanently, or the budget runs out.
    ///
    /// `label` names the request in log lines.
    ///
    /// # Errors
    ///
    /// - [`SearchError::RateLimited`] if the last attempt was throttled.
    /// - The last transient error if network/5xx failures used up the budget.
    /// - Any non-retryable error, as soon as it occurs.
    pub async fn execute<T, F, Fut>(&self, label: &str, mut request: F) -> Result<T, SearchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SearchError>>,
    {
        let attempts = self.attempts();
        let mut delay = Duration::from_millis(self.base_delay_ms);
        let mut last_error: Option<SearchError> = None;

        for attempt in 1..=attempts {
            let err = match request().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            let remaining = attempt < attempts;

            match err {
                SearchError::RateLimited(detail) => {
                    if !remaining {
                        return Err(SearchError::RateLimited(format!(
                            "{label}: {detail} (after {attempts} attempts)"
                        )));
                    }
                    let wait = delay.mul_f64(f64::from(attempt));
                    tracing::warn!(
                        request = label,
                        attempt,
                        max_attempts = attempts,
                        wait_ms = wait.as_millis() as u64,
                        "rate limited (429); retrying"
                    );
                    tokio::time::sleep(wait).await;
                    delay = delay.mul_f64(growth(self.rate_limit_multiplier));
                }
                err if err.is_transient() => {
                    if remaining {
                        let multiplier = match err {
                            SearchError::Server { .. } => self.server_error_multiplier,
                            _ => self.network_error_multiplier,
                        };
                        tracing::warn!(
                            request = label,
                            attempt,
                            max_attempts = attempts,
                            wait_ms = delay.as_millis() as u64,
                            error = %err,
                            "transient provider error; retrying"
                        );
                        tokio::time::sleep(delay).await;
                        delay = delay.mul_f64(growth(multiplier));
                    }
                    last_error = Some(err);
                }
                err => return Err(err),
            }
        }

        Err(last_error
            .unwrap_or_else(|| SearchError::Network(format!("{label}: request failed"))))
    }
}

/// Multiplier actually applied: values that would shrink, overflow, or
/// poison the delay fall back to 1.0.
fn growth(multiplier: f64) -> f64 {
    if multiplier.is_finite() {
        multiplier.max(1.0)
    } else {
        1.0
    }
}

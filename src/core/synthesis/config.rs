//! Synthesis client configuration.

use std::time::Duration;

use super::{
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    LISTENHUB_API_BASE,
};

/// Configuration for [`super::SynthesisClient`].
///
/// # Parameters
///
/// - **api_key**: ListenHub API key (required, non-empty)
/// - **base_url**: API base URL; overridable for tests and self-hosted
///   deployments
/// - **poll_interval**: fixed delay between job status polls
/// - **poll_timeout**: total budget for polling one job
/// - **request_timeout**: per-HTTP-request timeout
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use castpress::core::synthesis::SynthesisConfig;
///
/// let config = SynthesisConfig::new("lh_sk_test")
///     .with_poll_interval(Duration::from_secs(2))
///     .with_poll_timeout(Duration::from_secs(120));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// ListenHub API key.
    pub api_key: String,

    /// API base URL, without a trailing slash.
    pub base_url: String,

    /// Fixed delay between job status polls.
    pub poll_interval: Duration,

    /// Total polling budget for one job.
    pub poll_timeout: Duration,

    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl SynthesisConfig {
    /// Creates a configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: LISTENHUB_API_BASE.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            poll_timeout: Duration::from_secs(DEFAULT_POLL_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Sets the API base URL. A trailing slash is stripped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sets the polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the total polling budget.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Sets the per-request HTTP timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `api_key` is empty
    /// - `base_url` is empty
    /// - `poll_interval` is zero
    /// - `poll_timeout` is smaller than `poll_interval`
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("api_key is required for ListenHub authentication".to_string());
        }
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if self.poll_interval.is_zero() {
            return Err("poll_interval must be greater than zero".to_string());
        }
        if self.poll_timeout < self.poll_interval {
            return Err(format!(
                "poll_timeout ({:?}) must be at least poll_interval ({:?})",
                self.poll_timeout, self.poll_interval
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Retry policy for the taxonomy client
//!
//! One bounded loop covers both rate limiting and transient failures: the
//! initial request plus at most `max_retries` retries. A 429 waits for the
//! server's `Retry-After`; other retryable outcomes back off exponentially.

use crate::config::RetryConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Statuses that are retried rather than surfaced immediately
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Pause between attempts
///
/// Abstracted so tests can record the requested delays instead of waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Bounded retry policy
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub backoff_factor: Duration,
    pub default_retry_after: Duration,
    pub max_retry_after: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: Duration::from_millis(config.backoff_factor_ms),
            default_retry_after: Duration::from_secs(config.default_retry_after_seconds),
            max_retry_after: Duration::from_secs(config.max_retry_after_seconds),
        }
    }

    pub fn is_retryable_status(status: u16) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }

    /// Exponential delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: usize) -> Duration {
        let exponent = retry.saturating_sub(1).min(16) as u32;
        self.backoff_factor.saturating_mul(2u32.pow(exponent))
    }

    /// Delay requested by a `Retry-After` header value, in whole seconds
    ///
    /// Missing or non-numeric values (including HTTP dates) fall back to the
    /// configured default. The result never exceeds `max_retry_after`.
    pub fn retry_after(&self, header: Option<&str>) -> Duration {
        header
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(self.default_retry_after)
            .min(self.max_retry_after)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

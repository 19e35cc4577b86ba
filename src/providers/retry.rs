/*!
 * Retry with exponential backoff for provider requests.
 *
 * Only transient failures (connection problems, timeouts, rate limiting and
 * server errors) are retried. Client errors fail immediately.
 */

use std::future::Future;
use std::time::Duration;

use log::warn;
use rand::Rng;

use crate::errors::ProviderError;

// @const: Largest backoff exponent, keeps the shift in range
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Retry settings of one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,

    /// Base backoff time in milliseconds for exponential backoff
    pub backoff_base_ms: u64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base_ms,
        }
    }

    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Delay before retry number `attempt` (1-based)
    ///
    /// `backoff_base_ms * 2^(attempt - 1)` plus up to a quarter of the base as jitter.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        let backoff_ms = self.backoff_base_ms.saturating_mul(1u64 << exponent);
        let jitter_max = self.backoff_base_ms / 4;
        let jitter_ms = if jitter_max > 0 {
            rand::rng().random_range(0..=jitter_max)
        } else {
            0
        };
        Duration::from_millis(backoff_ms.saturating_add(jitter_ms))
    }

    /// Run `operation`, retrying transient failures
    ///
    /// # Arguments
    /// * `label` - Description of the request, used in log messages
    /// * `operation` - Produces a fresh request future on each attempt
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff_for(attempt);
                    warn!(
                        "{} failed: {} - retry {}/{} in {} ms",
                        label,
                        e,
                        attempt,
                        self.max_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 1000)
    }
}

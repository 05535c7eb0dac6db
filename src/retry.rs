//! Retry helper for transient RPC failures on idempotent reads.

use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::consts::{
    DEFAULT_MAX_RETRY_ATTEMPTS, DEFAULT_READ_RETRY_DELAY_SECS, DEFAULT_RETRY_DELAY_SECS,
};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts. 0 means infinite retries.
    pub max_attempts: u32,
    /// Initial delay between retries.
    pub delay: Duration,
    /// Multiplier for exponential backoff. 1.0 = fixed delay.
    pub backoff_multiplier: f64,
    /// Cap on the backoff delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_secs(300),
        }
    }
}

impl RetryConfig {
    /// Fixed-delay retry.
    pub fn fixed(delay_secs: u64, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::from_secs(delay_secs),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_secs(delay_secs),
        }
    }

    /// Short fixed delay suited to fast, idempotent contract reads.
    pub fn for_reads() -> Self {
        Self::fixed(DEFAULT_READ_RETRY_DELAY_SECS, DEFAULT_MAX_RETRY_ATTEMPTS)
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if self.backoff_multiplier <= 1.0 {
            return self.delay;
        }
        let multiplier = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1) as i32);
        let delay = Duration::from_millis((self.delay.as_millis() as f64 * multiplier) as u64);
        std::cmp::min(delay, self.max_delay)
    }
}

/// Run an async operation, retrying on failure until it succeeds or the
/// attempt budget is exhausted. All errors are treated as retryable.
pub async fn retry<F, Fut, T, E>(
    config: RetryConfig,
    operation_name: &str,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => {
                if config.max_attempts > 0 && attempt >= config.max_attempts {
                    warn!(
                        operation = operation_name,
                        attempt,
                        error = %e,
                        "retry attempts exhausted"
                    );
                    return Err(e);
                }
                let delay = config.delay_for_attempt(attempt);
                debug!(
                    operation = operation_name,
                    attempt,
                    delay_secs = delay.as_secs(),
                    error = %e,
                    "operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

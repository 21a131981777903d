// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded exponential-backoff retry for transport operations.
//!
//! Only transient failures are retried; validation-class errors re-raise
//! immediately because retrying cannot fix them and would waste the
//! serialized lane's only slot. Classification comes from
//! [`NdiraError::is_retryable`], not from message text.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use ndira_core::NdiraError;

/// Retry bounds for a single transport operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retries after the first attempt (total attempts = retries + 1).
    pub max_retries: u32,
    /// Base backoff delay; attempt `n` sleeps `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Pure exponential backoff, no jitter.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `operation` under the retry policy, labeling log lines with `label`.
///
/// Invokes the operation at most `max_retries + 1` times for retryable
/// errors and exactly once for non-retryable ones; the last observed error
/// surfaces when attempts are exhausted.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, NdiraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, NdiraError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() => return Err(err),
            Err(err) if attempt >= policy.max_retries => {
                warn!(
                    operation = label,
                    attempts = attempt + 1,
                    error = %err,
                    "retries exhausted"
                );
                return Err(err);
            }
            Err(err) => {
                let delay = policy.backoff_delay(attempt);
                warn!(
                    operation = label,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

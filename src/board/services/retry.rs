//! Bounded retry with capped geometric backoff for task store calls.

use super::BoardSyncError;
use crate::board::ports::TaskStoreResult;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// How many times a failing store call is attempted, and how long to wait
/// between attempts.
///
/// Only transport failures are retried; `NotFound` and validation failures
/// are returned immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves as one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Upper bound on any single delay.
    pub max_backoff: Duration,
    /// Growth factor applied to the delay after each failed attempt.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// Single attempt, no retry.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1,
        }
    }

    /// Up to `attempts` attempts with backoff doubling from 200 ms to 5 s.
    #[must_use]
    pub const fn bounded(attempts: u32) -> Self {
        Self {
            max_attempts: attempts,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            multiplier: 2,
        }
    }

    /// Sets the initial and maximum backoff.
    #[must_use]
    pub const fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Returns the delay after the given failed attempt (1-based).
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let growth = self.multiplier.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(growth)
            .min(self.max_backoff)
    }

    /// Runs `call` until it succeeds, fails permanently, or attempts run out.
    pub(super) async fn execute<T, F, Fut>(
        &self,
        operation: &str,
        mut call: F,
    ) -> Result<T, BoardSyncError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TaskStoreResult<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.backoff_after(attempt);
                    warn!(
                        operation,
                        attempt,
                        ?delay,
                        error = %err,
                        "task store call failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) if err.is_transient() && attempt > 1 => {
                    return Err(BoardSyncError::RetriesExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

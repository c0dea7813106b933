//! Configuration for board synchronization.

use super::RetryPolicy;

/// Tunables for [`super::BoardSyncService`].
///
/// # Examples
///
/// ```
/// use ozikanban::board::services::{BoardSyncConfig, RetryPolicy};
///
/// let config = BoardSyncConfig::default();
/// assert_eq!(config.retry, RetryPolicy::none());
///
/// let durable = BoardSyncConfig::with_retry(RetryPolicy::bounded(3));
/// assert_eq!(durable.retry.max_attempts, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSyncConfig {
    /// Policy wrapped around every task store call.
    pub retry: RetryPolicy,
}

impl BoardSyncConfig {
    /// Creates a configuration using the given retry policy.
    #[must_use]
    pub const fn with_retry(retry: RetryPolicy) -> Self {
        Self { retry }
    }
}

//! Configuration for the REST task store.

use std::time::Duration;

/// Connection settings for [`super::HttpTaskStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStoreConfig {
    /// Base URL of the task collection, e.g. `http://localhost:5000/api/tasks`.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpStoreConfig {
    /// Environment variable overriding the endpoint.
    pub const ENDPOINT_ENV: &'static str = "OZIKANBAN_API_URL";

    const DEFAULT_ENDPOINT: &'static str = "http://localhost:5000/api/tasks";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Creates a configuration for the given endpoint with the default
    /// timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Reads the endpoint from [`Self::ENDPOINT_ENV`], falling back to the
    /// default when unset or blank.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(Self::ENDPOINT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(Self::default, Self::new)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ENDPOINT)
    }
}

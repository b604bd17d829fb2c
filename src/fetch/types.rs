//! The fetch capability consumed by the identify pipeline

use std::future::Future;
use std::time::Duration;

/// Error type for fetch failures
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Resource not found (404): {0}")]
    NotFound(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP error {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Io(String),
}

impl FetchError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Network access for the pipeline
///
/// Implementations must be cheap to clone; the orchestrator hands every
/// detail worker its own handle via [`Fetcher::fork`].
pub trait Fetcher: Clone + Send + Sync + 'static {
    /// Download the body of `url`
    fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;

    /// Existence check for `url`, returning the HTTP status code
    fn probe(&self, url: &str, timeout: Duration) -> impl Future<Output = Result<u16, FetchError>> + Send;

    /// Handle with its own connection state for one worker
    fn fork(&self) -> Self {
        self.clone()
    }
}

//! reqwest-backed implementation of [`Fetcher`]

use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::types::{FetchError, Fetcher};

/// HTTP fetcher with browser-like headers and gzip support
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agent: String,
}

impl HttpFetcher {
    /// Create a fetcher sending `user_agent` on every request
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Io` if the TLS backend cannot be initialised.
    pub fn new(user_agent: impl Into<String>) -> Result<Self, FetchError> {
        let user_agent = user_agent.into();
        let client = Client::builder()
            .user_agent(user_agent.clone())
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Io(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, user_agent })
    }

    fn classify(url: &str, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else if error.status() == Some(StatusCode::NOT_FOUND) {
            FetchError::NotFound(url.to_string())
        } else {
            FetchError::Io(format!("{url}: {error}"))
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header("Accept", "text/html,application/xhtml+xml,image/*,*/*;q=0.8")
            .header("Accept-Language", "zh-CN,zh;q=0.9,en;q=0.5")
            .send()
            .await
            .map_err(|e| Self::classify(url, &e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| Self::classify(url, &e))?;
        log::trace!("Fetched {} bytes from {url}", body.len());
        Ok(body.to_vec())
    }

    async fn probe(&self, url: &str, timeout: Duration) -> Result<u16, FetchError> {
        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Self::classify(url, &e))?;
        Ok(response.status().as_u16())
    }

    fn fork(&self) -> Self {
        // A fresh client gets its own connection pool; fall back to sharing
        // the pool if the TLS backend refuses a second client.
        Self::new(self.user_agent.clone()).unwrap_or_else(|e| {
            log::warn!("Failed to create worker HTTP client, sharing pool: {e}");
            self.clone()
        })
    }
}

//! Builder for `CatalogConfig`
//!
//! Every field has a working default, so `CatalogConfig::builder().build()`
//! yields a configuration for the live storefront. Tests point `base_url`
//! and `image_base_url` at local servers.

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_MAX_EDITIONS,
    DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, DEFAULT_WORKER_STAGGER, LOCALE_MARKER,
    PRIMARY_IDENTIFIER_ALIASES, PRIMARY_IDENTIFIER_KEY, REJECTED_TITLE_MARKERS, is_valid_url,
};
use anyhow::{Result, anyhow};
use std::time::Duration;
use url::Url;

use super::types::CatalogConfig;

pub struct CatalogConfigBuilder {
    pub(crate) base_url: String,
    pub(crate) image_base_url: String,
    pub(crate) max_editions: usize,
    pub(crate) worker_stagger: Duration,
    pub(crate) poll_interval: Duration,
    pub(crate) default_timeout: Duration,
    pub(crate) user_agent: String,
    pub(crate) primary_identifier_key: String,
    pub(crate) identifier_aliases: Vec<String>,
    pub(crate) rejected_title_markers: Vec<String>,
    pub(crate) locale_marker: (String, String),
}

impl Default for CatalogConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            max_editions: DEFAULT_MAX_EDITIONS,
            worker_stagger: DEFAULT_WORKER_STAGGER,
            poll_interval: DEFAULT_POLL_INTERVAL,
            default_timeout: DEFAULT_TIMEOUT,
            user_agent: CHROME_USER_AGENT.to_string(),
            primary_identifier_key: PRIMARY_IDENTIFIER_KEY.to_string(),
            identifier_aliases: PRIMARY_IDENTIFIER_ALIASES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            rejected_title_markers: REJECTED_TITLE_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            locale_marker: (LOCALE_MARKER.0.to_string(), LOCALE_MARKER.1.to_string()),
        }
    }
}

impl CatalogConfig {
    /// Create a builder for configuring a `CatalogConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }
}

impl CatalogConfigBuilder {
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    #[must_use]
    pub fn max_editions(mut self, max: usize) -> Self {
        self.max_editions = max;
        self
    }

    #[must_use]
    pub fn worker_stagger(mut self, delay: Duration) -> Self {
        self.worker_stagger = delay;
        self
    }

    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn primary_identifier_key(mut self, key: impl Into<String>) -> Self {
        self.primary_identifier_key = key.into();
        self
    }

    /// Replace the accepted primary identifier aliases (matched case-insensitively)
    #[must_use]
    pub fn identifier_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_aliases = aliases.into_iter().map(|a| a.into().to_lowercase()).collect();
        self
    }

    #[must_use]
    pub fn rejected_title_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejected_title_markers = markers.into_iter().map(|m| m.into().to_lowercase()).collect();
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if either base URL does not parse, if `max_editions`
    /// or `poll_interval` is zero, or if no primary identifier alias is left.
    pub fn build(self) -> Result<CatalogConfig> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid catalog base URL '{}': {e}", self.base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(anyhow!("Catalog base URL must be http(s): {}", self.base_url));
        }
        if !is_valid_url(&self.image_base_url) {
            return Err(anyhow!("Invalid image base URL '{}'", self.image_base_url));
        }
        if self.max_editions == 0 {
            return Err(anyhow!("max_editions must be at least 1"));
        }
        if self.poll_interval.is_zero() {
            return Err(anyhow!("poll_interval must be non-zero"));
        }
        if self.identifier_aliases.is_empty() {
            return Err(anyhow!("at least one primary identifier alias is required"));
        }

        Ok(self.assemble(base_url))
    }

    /// Build from the hardcoded defaults, which never fail validation.
    pub(crate) fn into_default_config(self) -> CatalogConfig {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .expect("BUG: hardcoded DEFAULT_BASE_URL is not a valid URL");
        self.assemble(base_url)
    }

    fn assemble(self, base_url: Url) -> CatalogConfig {
        CatalogConfig {
            base_url,
            image_base_url: self.image_base_url,
            max_editions: self.max_editions,
            worker_stagger: self.worker_stagger,
            poll_interval: self.poll_interval,
            default_timeout: self.default_timeout,
            user_agent: self.user_agent,
            primary_identifier_key: self.primary_identifier_key,
            identifier_aliases: self.identifier_aliases,
            rejected_title_markers: self.rejected_title_markers,
            locale_marker: self.locale_marker,
        }
    }
}

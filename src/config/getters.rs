//! Getter methods for `CatalogConfig`

use std::time::Duration;
use url::Url;

use super::types::CatalogConfig;

impl CatalogConfig {
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    #[must_use]
    pub fn max_editions(&self) -> usize {
        self.max_editions
    }

    #[must_use]
    pub fn worker_stagger(&self) -> Duration {
        self.worker_stagger
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn primary_identifier_key(&self) -> &str {
        &self.primary_identifier_key
    }

    #[must_use]
    pub fn identifier_aliases(&self) -> &[String] {
        &self.identifier_aliases
    }

    #[must_use]
    pub fn rejected_title_markers(&self) -> &[String] {
        &self.rejected_title_markers
    }

    #[must_use]
    pub fn locale_marker(&self) -> (&str, &str) {
        (&self.locale_marker.0, &self.locale_marker.1)
    }

    /// Predictable full-size cover URL for a primary identifier
    #[must_use]
    pub fn direct_cover_url(&self, primary_id: &str) -> String {
        format!("{}{primary_id}.01.MAIN._SCRM_.jpg", self.image_base_url)
    }

    /// Canonical detail page URL for a primary identifier
    #[must_use]
    pub fn detail_url(&self, primary_id: &str) -> String {
        format!("{}/dp/{primary_id}", self.base_url.as_str().trim_end_matches('/'))
    }
}

//! Core configuration types for catalog lookups

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::builder::CatalogConfigBuilder;

/// Main configuration struct for the identify pipeline
///
/// Constructed once per host session and shared (behind an `Arc`) by the
/// orchestrator and every detail worker it spawns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Storefront root used for search URLs and to resolve relative hrefs.
    ///
    /// **INVARIANT:** Always a parseable absolute URL (checked in builder).
    pub(crate) base_url: Url,

    /// Prefix of the predictable per-identifier cover image URL
    pub(crate) image_base_url: String,

    /// Maximum number of candidates taken from one results page
    ///
    /// Default: 5
    pub(crate) max_editions: usize,

    /// Pause between starting consecutive detail workers
    ///
    /// Default: 100 ms
    pub(crate) worker_stagger: Duration,

    /// Longest single wait on a worker before the abort flag is re-checked
    ///
    /// Bounds how long `identify` keeps running after an abort.
    ///
    /// Default: 200 ms
    pub(crate) poll_interval: Duration,

    /// Timeout applied when the caller does not pass one
    ///
    /// Default: 30 seconds
    pub(crate) default_timeout: Duration,

    pub(crate) user_agent: String,

    /// Key the catalog's edition identifier is reported under
    pub(crate) primary_identifier_key: String,

    /// Input keys accepted as the catalog's edition identifier (lower case)
    pub(crate) identifier_aliases: Vec<String>,

    /// Lower-cased title fragments that disqualify a search result
    pub(crate) rejected_title_markers: Vec<String>,

    /// Locale switch parameter appended to every search query
    pub(crate) locale_marker: (String, String),
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfigBuilder::default().into_default_config()
    }
}

//! Shared configuration constants for bookmeta
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

use std::time::Duration;

/// Catalog storefront that serves search and detail pages
pub const DEFAULT_BASE_URL: &str = "https://www.amazon.cn";

/// Image host serving covers addressable by primary identifier
///
/// `{IMAGE_BASE}{id}.01.MAIN._SCRM_.jpg` is the full-size main image when the
/// catalog has one.
pub const DEFAULT_IMAGE_BASE_URL: &str = "http://z2-ec2.images-amazon.com/images/P/";

/// Maximum number of candidate editions taken from one results page
///
/// Results are sorted by relevance, so anything past the first few is
/// rarely the queried book.
pub const DEFAULT_MAX_EDITIONS: usize = 5;

/// Delay between starting consecutive detail workers
///
/// Keeps the burst of detail requests below what the storefront treats as
/// scraping.
pub const DEFAULT_WORKER_STAGGER: Duration = Duration::from_millis(100);

/// Upper bound on a single wait for a worker before re-checking the abort flag
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Default network timeout for one identify call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Identifier key under which the catalog's edition id is reported
pub const PRIMARY_IDENTIFIER_KEY: &str = "amazon_cn";

/// Identifier keys accepted as the catalog's edition id on input
pub const PRIMARY_IDENTIFIER_ALIASES: [&str; 2] = ["amazon_cn", "asin"];

/// Identifier key for ISBNs
pub const ISBN_KEY: &str = "isbn";

/// Query parameter that switches the storefront into its Chinese locale
///
/// The value must be sent UTF-8 encoded, which also fixes the byte encoding
/// the storefront uses to decode every other parameter.
pub const LOCALE_MARKER: (&str, &str) = ("__mk_zh_CN", "亚马逊网站");

/// Lower-cased title fragments that disqualify a search result
pub const REJECTED_TITLE_MARKERS: [&str; 2] = ["(spanish edition)", "(german edition)"];

/// Chrome user agent string
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

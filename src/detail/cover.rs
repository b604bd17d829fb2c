//! Cover image resolution
//!
//! The DOM scan runs with the rest of the synchronous page parse; the
//! network probe of the predictable image URL happens afterwards in
//! [`resolve`], once the parsed document has been dropped.

use regex::bytes::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use super::errors::Extracted;
use crate::config::CatalogConfig;
use crate::fetch::Fetcher;
use crate::utils::resolve_href;

static MAIN_IMAGE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "img#prodImage[src], img#original-main-image[src], img#main-image[src]",
        r#"div[class="main-image-inner-wrapper"] > img[src]"#,
        "div#main-image-container img[src]",
    ]
    .iter()
    .map(|css| Selector::parse(css).expect("BUG: hardcoded main image selector is invalid"))
    .collect()
});

static LARGE_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""largeImage":"(https?://[^"]+)","#).expect("LARGE_IMAGE_RE: hardcoded regex is valid")
});

const LAZY_LOADING_MARKER: &str = "loading-";

/// Source substrings of storefront placeholder images
const PLACEHOLDER_MARKERS: &[&str] = &["/no-image-avail", LAZY_LOADING_MARKER, "/no-img-sm"];

/// Main product image from the page, normalized to its full-size URL
///
/// `raw` is the undecoded page, searched for the script-embedded image when
/// the `<img>` is still a lazy-loading placeholder.
pub fn scan_document(document: &Html, raw: &[u8], config: &CatalogConfig) -> Extracted<String> {
    let Some(src) = MAIN_IMAGE_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())
        .and_then(|img| img.value().attr("src"))
    else {
        return Ok(None);
    };

    let mut src = src.trim().to_string();
    if src.contains(LAZY_LOADING_MARKER)
        && let Some(caps) = LARGE_IMAGE_RE.captures(raw)
    {
        src = String::from_utf8_lossy(&caps[1]).into_owned();
    }

    if PLACEHOLDER_MARKERS.iter().any(|marker| src.contains(marker)) {
        debug!("Ignoring placeholder image {src}");
        return Ok(None);
    }

    Ok(resolve_href(config.base_url(), &src).map(|url| normalize_image_url(&url)))
}

/// Drop the size and quality directives embedded in an image filename
///
/// `.../I/51abc._SX300_QL70_.jpg` becomes `.../I/51abc.jpg`. URLs without
/// directives are returned unchanged.
#[must_use]
pub fn normalize_image_url(src: &str) -> String {
    let parts: Vec<&str> = src.split('/').collect();
    if parts.len() <= 3 {
        return src.to_string();
    }
    let Some((file, dir)) = parts.split_last() else {
        return src.to_string();
    };
    let segments: Vec<&str> = file.split('_').collect();
    if segments.len() <= 2 {
        return src.to_string();
    }
    let mut file = format!("{}{}", segments[0], segments[segments.len() - 1]);
    if let Some(stem) = file.strip_suffix("..jpg") {
        file = format!("{stem}.jpg");
    }
    format!("{}/{file}", dir.join("/"))
}

/// Pick the cover URL for an edition
///
/// The predictable full-size image URL wins when the image host confirms it
/// exists; otherwise the URL found by [`scan_document`] is used.
pub async fn resolve<F: Fetcher>(
    fetcher: &F,
    config: &CatalogConfig,
    primary_id: &str,
    scanned: Option<String>,
    timeout: Duration,
) -> Option<String> {
    let direct = config.direct_cover_url(primary_id);
    match fetcher.probe(&direct, timeout).await {
        Ok(200) => return Some(direct),
        Ok(status) => debug!("Direct cover {direct} answered {status}"),
        Err(e) => debug!("Direct cover probe failed: {e}"),
    }
    scanned
}

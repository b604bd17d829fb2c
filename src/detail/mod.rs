//! Detail page parsing
//!
//! [`parse_detail_page`] is synchronous: the `scraper` document is not
//! `Send`, so everything that needs the DOM happens here and only owned
//! values cross back into the async worker. Each field extractor reports
//! its own failure; a failed field is logged and left empty while the
//! remaining extractors still run.

pub mod cover;
pub mod dates;
pub mod description;
pub mod errors;
pub mod extractors;
pub mod language;
pub mod layout;

pub use errors::{DetailPageError, ExtractError, Extracted};
pub use layout::DetailLayout;

use scraper::Html;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::document::{NOT_FOUND_TITLE_MARKER, error_message};
use crate::record::RecordDraft;
use crate::utils::decode_page;

/// Everything read from a detail page before the cover probe
#[derive(Debug, Clone, Default)]
pub struct ParsedDetail {
    pub draft: RecordDraft,
    /// Image URL found in the page markup, if any
    pub scanned_cover: Option<String>,
}

/// Run every field extractor over a downloaded detail page
///
/// # Errors
///
/// Returns `DetailPageError` when the catalog served its not-found template
/// or an error message instead of a product page.
pub fn parse_detail_page(
    raw: &[u8],
    url: &str,
    config: &CatalogConfig,
) -> Result<ParsedDetail, DetailPageError> {
    let text = decode_page(raw);
    if text.contains(NOT_FOUND_TITLE_MARKER) {
        return Err(DetailPageError::NotFound {
            url: url.to_string(),
        });
    }

    let document = Html::parse_document(&text);
    if let Some(message) = error_message(&document) {
        return Err(DetailPageError::ErrorPage {
            url: url.to_string(),
            message,
        });
    }

    let mut draft = RecordDraft {
        primary_id: attempt("primary identifier", url, extractors::primary_id(&document)),
        title: attempt("title", url, extractors::title(&document)),
        authors: attempt("authors", url, extractors::authors(&document)).unwrap_or_default(),
        rating: attempt("rating", url, extractors::rating(&document)),
        description: attempt("description", url, description::description(&document)),
        series: attempt("series", url, extractors::series(&document)),
        tags: attempt("tags", url, extractors::tags(&document)).unwrap_or_default(),
        ..RecordDraft::default()
    };
    let scanned_cover = attempt("cover", url, cover::scan_document(&document, raw, config));

    match DetailLayout::probe(&document) {
        Ok(layout) => {
            debug!("Reading {} product details from {url}", layout.name());
            draft.isbn = attempt("isbn", url, layout.isbn());
            draft.publisher = attempt("publisher", url, layout.publisher());
            draft.published = attempt("publication date", url, layout.published());
            draft.language = attempt("language", url, layout.language());
        }
        Err(e) => warn!("Failed to find product details for {url}: {e}"),
    }

    Ok(ParsedDetail {
        draft,
        scanned_cover,
    })
}

/// Unwrap one extractor's result, logging its failure against the page
fn attempt<T>(field: &'static str, url: &str, result: Extracted<T>) -> Option<T> {
    match result {
        Ok(value) => {
            if value.is_none() {
                debug!("No {field} on {url}");
            }
            value
        }
        Err(e) => {
            warn!("Error parsing {field} for {url}: {e}");
            None
        }
    }
}

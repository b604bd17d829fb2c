//! Search query construction
//!
//! Exactly one search term family is used per query, in priority order:
//! catalog edition identifier, then checksum-valid ISBN, then free-text
//! title and first-author tokens restricted to digital items.

use tracing::debug;

use super::isbn::check_isbn;
use super::tokens::{first_author_tokens, title_tokens};
use super::types::{IdentifyRequest, QueryKind, SearchQuery};
use crate::config::CatalogConfig;
use crate::identify::IdentifyError;
use crate::utils::ISBN_KEY;

/// Look up the catalog edition identifier under any configured alias
#[must_use]
pub fn primary_identifier<'a>(
    config: &CatalogConfig,
    identifiers: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Option<&'a str> {
    identifiers.into_iter().find_map(|(key, value)| {
        let key = key.to_lowercase();
        let value = value.trim();
        (config.identifier_aliases().iter().any(|a| *a == key) && !value.is_empty())
            .then_some(value)
    })
}

/// Canonical detail page for a request that already names an edition
///
/// Returns `(identifier type, identifier, url)`.
#[must_use]
pub fn book_url(config: &CatalogConfig, request: &IdentifyRequest) -> Option<(String, String, String)> {
    let id = primary_identifier(config, &request.identifiers)?;
    Some((
        config.primary_identifier_key().to_string(),
        id.to_string(),
        config.detail_url(id),
    ))
}

/// Build the search URL for a request
///
/// # Errors
///
/// Returns `IdentifyError::InsufficientMetadata` when the request holds no
/// usable identifier, ISBN or title token; no request must be made then.
pub fn build_query(
    config: &CatalogConfig,
    request: &IdentifyRequest,
) -> Result<SearchQuery, IdentifyError> {
    let mut params: Vec<(&str, String)> = vec![
        ("search-alias", "aps".to_string()),
        ("unfiltered", "1".to_string()),
        ("sort", "relevance_rank".to_string()),
    ];

    let isbn = request
        .identifiers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(ISBN_KEY))
        .and_then(|(_, v)| check_isbn(v));

    let kind = if let Some(id) = primary_identifier(config, &request.identifiers) {
        params.push(("field-keywords", id.to_string()));
        QueryKind::PrimaryIdentifier
    } else if let Some(isbn) = isbn {
        params.push(("field-isbn", isbn));
        QueryKind::Isbn
    } else {
        params[0].1 = "digital-text".to_string();
        let title = request.title.as_deref().map(title_tokens).unwrap_or_default();
        if title.is_empty() {
            return Err(IdentifyError::InsufficientMetadata);
        }
        params.push(("field-title", title.join(" ")));
        let author = first_author_tokens(&request.authors);
        if !author.is_empty() {
            params.push(("field-author", author.join(" ")));
        }
        QueryKind::FreeText
    };

    let (marker_key, marker_value) = config.locale_marker();
    params.push((marker_key, marker_value.to_string()));

    let mut url = config
        .base_url()
        .join("/s/")
        .map_err(|e| IdentifyError::MalformedQuery(format!("{}: {e}", config.base_url())))?;
    url.query_pairs_mut().extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));

    debug!("Built {kind:?} query: {url}");
    Ok(SearchQuery { kind, url })
}

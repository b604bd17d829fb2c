//! Candidate extraction from a search results page
//!
//! Result containers are scanned in document order and the first title link
//! of each container becomes a candidate. The storefront has shipped several
//! markup revisions, so each step has a fallback selector, and a separate
//! table-based scheme (served to clients it considers less capable) is tried
//! when the container scan finds nothing.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

use crate::config::CatalogConfig;
use crate::document::{NOT_FOUND_TITLE_MARKER, element_text, error_message, has_class};
use crate::identify::IdentifyError;
use crate::utils::{decode_page, resolve_href, safe_truncate_chars};

static RESULT_CONTAINER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[id^="result_"], div[data-component-type="s-search-result"]"#)
        .expect("BUG: hardcoded result container selector is invalid")
});

static TITLE_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[class="title"][href]"#)
        .expect("BUG: hardcoded title link selector is invalid")
});

static HEADING_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h3 > a[href], h2 a[href]")
        .expect("BUG: hardcoded heading link selector is invalid")
});

static TABLE_CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div#Results td[id^="search:Td:"]"#)
        .expect("BUG: hardcoded results table cell selector is invalid")
});

static DATA_COLUMN_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"td[class="dataColumn"] a[href]"#)
        .expect("BUG: hardcoded data column link selector is invalid")
});

/// One candidate edition, in the order the catalog ranked it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRef {
    /// Position among accepted candidates (0 = most relevant)
    pub rank: usize,
    /// Absolute detail page URL
    pub url: String,
}

/// Outcome of reading a results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsPage {
    /// The catalog served its not-found template or an error message
    NotFound { message: Option<String> },
    /// Candidates in relevance order; may be empty
    Candidates(Vec<CandidateRef>),
}

impl ResultsPage {
    /// Candidates, treating a not-found page as having none
    #[must_use]
    pub fn into_candidates(self) -> Vec<CandidateRef> {
        match self {
            Self::NotFound { .. } => Vec::new(),
            Self::Candidates(candidates) => candidates,
        }
    }
}

/// Decode, parse and scan a downloaded results page
///
/// # Errors
///
/// Returns `IdentifyError::ParseFailure` when the body holds no document
/// at all.
pub fn read_results_page(raw: &[u8], config: &CatalogConfig) -> Result<ResultsPage, IdentifyError> {
    let text = decode_page(raw);
    if text.is_empty() {
        return Err(IdentifyError::ParseFailure("empty response body".to_string()));
    }
    if text.contains(NOT_FOUND_TITLE_MARKER) {
        return Ok(ResultsPage::NotFound { message: None });
    }

    let document = Html::parse_document(&text);
    if let Some(message) = error_message(&document) {
        warn!(
            "Results page carries an error message: {}",
            safe_truncate_chars(&message, 200)
        );
        return Ok(ResultsPage::NotFound {
            message: Some(message),
        });
    }

    Ok(ResultsPage::Candidates(parse_results_page(&document, config)))
}

/// Extract at most `config.max_editions()` candidate URLs, preserving order
#[must_use]
pub fn parse_results_page(document: &Html, config: &CatalogConfig) -> Vec<CandidateRef> {
    let base = config.base_url();
    let max = config.max_editions();
    let title_ok = |title: &str| title_acceptable(title, config.rejected_title_markers());

    let mut urls = Vec::new();
    for container in document.select(&RESULT_CONTAINER_SELECTOR) {
        if urls.len() >= max {
            break;
        }
        let link = container
            .select(&TITLE_LINK_SELECTOR)
            .next()
            .or_else(|| container.select(&HEADING_LINK_SELECTOR).next());
        if let Some(url) = link.and_then(|a| accepted_href(a, base, &title_ok)) {
            urls.push(url);
        }
    }

    if urls.is_empty() {
        debug!("No result containers matched, trying results table markup");
        for cell in document.select(&TABLE_CELL_SELECTOR) {
            if urls.len() >= max {
                break;
            }
            let link = cell
                .select(&DATA_COLUMN_LINK_SELECTOR)
                .find(|a| has_title_span(*a));
            if let Some(url) = link.and_then(|a| accepted_href(a, base, &title_ok)) {
                urls.push(url);
            }
        }
    }

    urls.truncate(max);
    urls.into_iter()
        .enumerate()
        .map(|(rank, url)| CandidateRef { rank, url })
        .collect()
}

/// Whether a result title is free of every rejected marker
#[must_use]
pub fn title_acceptable(title: &str, rejected_markers: &[String]) -> bool {
    let title = title.to_lowercase();
    !rejected_markers.iter().any(|marker| title.contains(marker.as_str()))
}

fn accepted_href<F>(link: ElementRef<'_>, base: &Url, title_ok: &F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    if !title_ok(&element_text(link)) {
        return None;
    }
    link.value().attr("href").and_then(|href| resolve_href(base, href))
}

fn has_title_span(link: ElementRef<'_>) -> bool {
    link.children()
        .filter_map(ElementRef::wrap)
        .any(|child| child.value().name() == "span" && has_class(child, "srTitle"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_markers_are_case_insensitive() {
        let markers = vec!["(spanish edition)".to_string()];
        assert!(!title_acceptable("Fundación (Spanish Edition)", &markers));
        assert!(title_acceptable("Foundation", &markers));
    }
}

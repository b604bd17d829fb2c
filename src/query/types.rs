//! Inputs and outputs of query construction

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// What the host knows about the book it wants metadata for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyRequest {
    pub title: Option<String>,
    pub authors: Vec<String>,
    /// Known identifiers keyed by type, e.g. `isbn`, `amazon_cn`
    pub identifiers: BTreeMap<String, String>,
}

impl IdentifyRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    #[must_use]
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors.extend(authors.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_identifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.identifiers.insert(key.into(), value.into());
        self
    }

    fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    fn has_authors(&self) -> bool {
        self.authors.iter().any(|a| !a.trim().is_empty())
    }

    /// Whether a zero-candidate result may be retried without identifiers
    ///
    /// Only worth it when title and authors are there to search by instead.
    #[must_use]
    pub fn allows_identifier_retry(&self) -> bool {
        !self.identifiers.is_empty() && self.has_title() && self.has_authors()
    }

    /// The same request with every identifier dropped
    #[must_use]
    pub fn without_identifiers(&self) -> Self {
        Self {
            title: self.title.clone(),
            authors: self.authors.clone(),
            identifiers: BTreeMap::new(),
        }
    }
}

/// Which input the search query was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Exact lookup on the catalog's edition identifier
    PrimaryIdentifier,
    /// Exact lookup on a checksum-valid ISBN
    Isbn,
    /// Free-text title/author search over digital items
    FreeText,
}

/// A fully encoded search URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub kind: QueryKind,
    pub url: Url,
}

impl SearchQuery {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Decoded value of one query parameter
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.url.as_str())
    }
}

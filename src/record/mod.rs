//! Metadata records produced by detail workers
//!
//! A `MetadataRecord` can only leave a worker through [`RecordDraft::finish`],
//! which refuses drafts without a title, authors or primary identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::utils::{ISBN_KEY, collapse_whitespace};

/// Series membership; name and index are always set together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub name: String,
    pub index: f64,
}

/// One resolved edition of the queried book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub title: String,
    pub authors: Vec<String>,
    /// Catalog edition identifier, also present in `identifiers`
    pub primary_id: String,
    /// All identifiers keyed by type (`amazon_cn`, `isbn`)
    pub identifiers: BTreeMap<String, String>,
    /// Average customer rating on a 0-5 scale
    pub rating: Option<f64>,
    /// Sanitized HTML description
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub published: Option<NaiveDate>,
    /// Canonical language code
    pub language: Option<String>,
    pub series: Option<SeriesInfo>,
    pub tags: Vec<String>,
    pub cover_url: Option<String>,
    /// Rank of the candidate on the results page (0 = most relevant)
    pub source_relevance: usize,
}

impl MetadataRecord {
    #[must_use]
    pub fn isbn(&self) -> Option<&str> {
        self.identifiers.get(ISBN_KEY).map(String::as_str)
    }

    #[must_use]
    pub fn has_cover(&self) -> bool {
        self.cover_url.is_some()
    }
}

/// A record missing one of its mandatory fields
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("record is missing mandatory fields: {}", missing.join(", "))]
pub struct IncompleteRecord {
    pub missing: Vec<&'static str>,
}

/// Fields gathered while a detail page is being extracted
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub primary_id: Option<String>,
    pub isbn: Option<String>,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub published: Option<NaiveDate>,
    pub language: Option<String>,
    pub series: Option<SeriesInfo>,
    pub tags: Vec<String>,
    pub cover_url: Option<String>,
}

impl RecordDraft {
    /// Names of mandatory fields that are still absent or empty
    #[must_use]
    pub fn missing_mandatory(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            missing.push("title");
        }
        if !self.authors.iter().any(|a| !a.trim().is_empty()) {
            missing.push("authors");
        }
        if self.primary_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            missing.push("primary identifier");
        }
        missing
    }

    /// Clean the draft and turn it into a record
    ///
    /// # Errors
    ///
    /// Returns `IncompleteRecord` when title, authors or primary identifier
    /// is missing after cleaning.
    pub fn finish(
        self,
        primary_key: &str,
        source_relevance: usize,
    ) -> Result<MetadataRecord, IncompleteRecord> {
        let title = self.title.as_deref().map(clean_title).unwrap_or_default();
        let authors = clean_authors(&self.authors);
        let primary_id = self
            .primary_id
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let cleaned = RecordDraft {
            title: Some(title.clone()),
            authors: authors.clone(),
            primary_id: Some(primary_id.clone()),
            ..RecordDraft::default()
        };
        let missing = cleaned.missing_mandatory();
        if !missing.is_empty() {
            return Err(IncompleteRecord { missing });
        }

        let mut identifiers = BTreeMap::new();
        identifiers.insert(primary_key.to_string(), primary_id.clone());
        if let Some(isbn) = self.isbn {
            identifiers.insert(ISBN_KEY.to_string(), isbn);
        }

        Ok(MetadataRecord {
            title,
            authors,
            primary_id,
            identifiers,
            rating: self.rating,
            description: self.description.filter(|d| !d.trim().is_empty()),
            publisher: self.publisher.filter(|p| !p.is_empty()),
            published: self.published,
            language: self.language,
            series: self.series,
            tags: self.tags,
            cover_url: self.cover_url,
            source_relevance,
        })
    }
}

fn clean_title(raw: &str) -> String {
    fix_case(&collapse_whitespace(raw))
}

fn clean_authors(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|a| fix_case(&collapse_whitespace(a)))
        .filter(|a| !a.is_empty() && seen.insert(a.to_lowercase()))
        .collect()
}

/// Title-case text that arrived entirely upper- or lower-case.
///
/// Text without cased letters (CJK) and mixed-case text is left alone.
#[must_use]
pub fn fix_case(text: &str) -> String {
    let has_upper = text.chars().any(char::is_uppercase);
    let has_lower = text.chars().any(char::is_lowercase);
    if has_upper == has_lower {
        return text.to_string();
    }
    text.split(' ').map(title_case_word).collect::<Vec<_>>().join(" ")
}

/// Upper-case the first letter of `word`, lower-case the rest
///
/// Leading punctuation is skipped, so `(BOOK` becomes `(Book`.
fn title_case_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut seen_letter = false;
    for c in word.chars() {
        if !seen_letter && c.is_alphabetic() {
            seen_letter = true;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

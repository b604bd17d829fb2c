//! Error types for detail page extraction

use thiserror::Error;

/// Failure of a single field extractor
///
/// Never propagated past the detail parser: the field is left empty and the
/// error is logged against the page URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("expected element not found: {0}")]
    MissingElement(&'static str),

    #[error("unusable {field} value: '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error("unparseable date: '{0}'")]
    InvalidDate(String),
}

/// Extractor output: `Ok(None)` when the page simply lacks the field
pub type Extracted<T> = Result<Option<T>, ExtractError>;

/// A detail page that is not worth extracting from
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DetailPageError {
    #[error("Detail page not found: {url}")]
    NotFound { url: String },

    #[error("Detail page {url} reported an error: {message}")]
    ErrorPage { url: String, message: String },
}

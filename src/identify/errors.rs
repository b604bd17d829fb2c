//! Terminal errors of an identify call

use thiserror::Error;

/// Structural failure that ends an identify call
///
/// The `Display` text is the short diagnostic shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifyError {
    #[error("Insufficient metadata to construct query")]
    InsufficientMetadata,

    #[error("Query malformed: {0}")]
    MalformedQuery(String),

    #[error("{0} timed out. Try again later.")]
    Timeout(String),

    #[error("Failed to make identify query: {0}")]
    Unreachable(String),

    #[error("Failed to parse results page: {0}")]
    ParseFailure(String),
}

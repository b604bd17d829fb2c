//! Search query construction for the catalog
//!
//! Turns what the host knows about a book (title, authors, identifiers) into
//! a single encoded results-page URL.

mod builder;
mod isbn;
mod tokens;
mod types;

pub use builder::{book_url, build_query, primary_identifier};
pub use isbn::check_isbn;
pub use tokens::{first_author_tokens, title_tokens};
pub use types::{IdentifyRequest, QueryKind, SearchQuery};

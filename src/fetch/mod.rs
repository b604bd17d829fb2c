//! Network access for the identify pipeline
//!
//! The pipeline only needs "download these bytes" and "does this exist";
//! both sit behind the [`Fetcher`] trait so tests can serve fixture pages
//! from memory.

mod http;
mod types;

pub use http::HttpFetcher;
pub use types::{FetchError, Fetcher};

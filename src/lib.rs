//! Book metadata and cover lookup against an online catalog.
//!
//! A search query is built from whatever the caller knows about a book,
//! the catalog's results page yields up to a handful of candidate editions,
//! and each candidate's detail page is fetched and parsed concurrently into
//! a [`MetadataRecord`]. Records stream back as soon as each worker is done.
//!
//! ```no_run
//! use kodegen_tools_bookmeta::{AbortSignal, CatalogConfig, CatalogSource, IdentifyRequest};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = CatalogConfig::default();
//! let timeout = config.default_timeout();
//! let source = CatalogSource::new(config)?;
//! let request = IdentifyRequest::new().with_title("三体").with_author("刘慈欣");
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! source.identify(&request, &tx, &AbortSignal::new(), timeout).await?;
//! drop(tx);
//! while let Some(record) = rx.recv().await {
//!     println!("{} ({})", record.title, record.primary_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod detail;
pub mod document;
pub mod fetch;
pub mod identify;
pub mod query;
pub mod record;
pub mod results_page;
pub mod utils;

pub use cache::MetadataCache;
pub use config::{CatalogConfig, CatalogConfigBuilder};
pub use detail::{DetailPageError, ExtractError, ParsedDetail, parse_detail_page};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use identify::{AbortSignal, CatalogSource, IdentifyError, IdentifyOutcome, rank_records};
pub use query::{IdentifyRequest, QueryKind, SearchQuery, build_query, check_isbn};
pub use record::{IncompleteRecord, MetadataRecord, RecordDraft, SeriesInfo};
pub use results_page::{CandidateRef, ResultsPage, parse_results_page, read_results_page};

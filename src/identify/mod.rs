//! Identification pipeline: search, candidate fan-out and cover lookup

mod abort;
mod errors;
mod ranking;
mod source;
mod worker;

pub use abort::AbortSignal;
pub use errors::IdentifyError;
pub use ranking::{MatchKey, match_key, rank_records};
pub use source::{CatalogSource, IdentifyOutcome};
pub use worker::WorkerOutcome;

//! One detail page fetch-and-parse task per candidate

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use super::abort::AbortSignal;
use crate::cache::MetadataCache;
use crate::config::CatalogConfig;
use crate::detail::{cover, parse_detail_page};
use crate::fetch::Fetcher;
use crate::record::MetadataRecord;
use crate::results_page::CandidateRef;

/// How a worker ended; only ever logged by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// A record was sent to the result channel
    Queued,
    /// The page lacked a mandatory field
    Dropped,
    /// Fetching or reading the page failed
    Failed(String),
    /// The abort signal was observed
    Aborted,
}

pub(crate) struct DetailWorker<F: Fetcher> {
    pub(crate) fetcher: F,
    pub(crate) config: Arc<CatalogConfig>,
    pub(crate) cache: MetadataCache,
    pub(crate) candidate: CandidateRef,
    pub(crate) results: UnboundedSender<MetadataRecord>,
    pub(crate) abort: AbortSignal,
    pub(crate) timeout: Duration,
}

impl<F: Fetcher> DetailWorker<F> {
    pub(crate) async fn run(self) -> WorkerOutcome {
        let url = self.candidate.url.as_str();
        if self.abort.is_set() {
            return WorkerOutcome::Aborted;
        }

        let raw = match self.fetcher.fetch(url, self.timeout).await {
            Ok(raw) => raw,
            Err(e) => {
                if e.is_timeout() {
                    error!("Details page timed out: {url}");
                } else if e.is_not_found() {
                    error!("URL malformed: {url}");
                } else {
                    warn!("Failed to fetch details page {url}: {e}");
                }
                return WorkerOutcome::Failed(e.to_string());
            }
        };
        if self.abort.is_set() {
            return WorkerOutcome::Aborted;
        }

        let parsed = match parse_detail_page(&raw, url, &self.config) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("{e}");
                return WorkerOutcome::Failed(e.to_string());
            }
        };

        let mut draft = parsed.draft;
        let missing = draft.missing_mandatory();
        if !missing.is_empty() {
            error!("Could not find {} for {url}", missing.join("/"));
            return WorkerOutcome::Dropped;
        }

        if self.abort.is_set() {
            return WorkerOutcome::Aborted;
        }
        if let Some(primary_id) = draft.primary_id.clone() {
            draft.cover_url = cover::resolve(
                &self.fetcher,
                &self.config,
                &primary_id,
                parsed.scanned_cover,
                self.timeout,
            )
            .await;
        }

        let record = match draft.finish(self.config.primary_identifier_key(), self.candidate.rank) {
            Ok(record) => record,
            Err(e) => {
                error!("Dropping record from {url}: {e}");
                return WorkerOutcome::Dropped;
            }
        };

        if let Some(isbn) = record.isbn() {
            self.cache.cache_isbn_to_identifier(isbn, &record.primary_id);
        }
        if let Some(cover_url) = &record.cover_url {
            self.cache
                .cache_identifier_to_cover_url(&record.primary_id, cover_url);
        }

        if self.abort.is_set() {
            return WorkerOutcome::Aborted;
        }
        info!("Found '{}' ({}) at rank {}", record.title, record.primary_id, record.source_relevance);
        if self.results.send(record).is_err() {
            debug!("Result receiver dropped before {url} finished");
        }
        WorkerOutcome::Queued
    }
}

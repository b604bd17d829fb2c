//! The identification orchestrator

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, info, warn};

use super::abort::AbortSignal;
use super::errors::IdentifyError;
use super::ranking::rank_records;
use super::worker::{DetailWorker, WorkerOutcome};
use crate::cache::MetadataCache;
use crate::config::CatalogConfig;
use crate::fetch::{FetchError, Fetcher, HttpFetcher};
use crate::query::{IdentifyRequest, SearchQuery, book_url, build_query};
use crate::record::MetadataRecord;
use crate::results_page::{CandidateRef, read_results_page};

/// How an identify call ended when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifyOutcome {
    /// Candidates were found and this many workers ran to completion
    Matched { workers: usize },
    /// No candidate survived, including after the identifier-free retry
    NoMatches,
    /// The abort signal was observed; workers may still be running
    Aborted,
}

enum Attempt {
    NoCandidates,
    Finished(IdentifyOutcome),
}

/// Metadata source for one online catalog
///
/// Cheap to clone: config and cache are shared, and the fetcher is forked
/// per worker.
#[derive(Debug, Clone)]
pub struct CatalogSource<F: Fetcher = HttpFetcher> {
    config: Arc<CatalogConfig>,
    fetcher: F,
    cache: MetadataCache,
}

impl CatalogSource<HttpFetcher> {
    /// Source backed by a reqwest client using the configured user agent
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(config.user_agent())?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: Fetcher> CatalogSource<F> {
    pub fn with_fetcher(config: CatalogConfig, fetcher: F) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            cache: MetadataCache::new(),
        }
    }

    /// Use an existing cache, e.g. one shared with another source
    #[must_use]
    pub fn with_cache(mut self, cache: MetadataCache) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// `(identifier type, identifier, detail URL)` for a known edition
    #[must_use]
    pub fn book_url(&self, request: &IdentifyRequest) -> Option<(String, String, String)> {
        book_url(&self.config, request)
    }

    #[must_use]
    pub fn cached_cover_url(&self, identifiers: &BTreeMap<String, String>) -> Option<String> {
        self.cache.cached_cover_url(&self.config, identifiers)
    }

    /// Search the catalog and send one record per resolved candidate
    ///
    /// Records arrive on `results` as workers finish, in no particular
    /// order. When the first query yields no candidate and the request has
    /// identifiers as well as title and authors, the search is repeated
    /// once without identifiers.
    ///
    /// # Errors
    ///
    /// Returns `IdentifyError` for structural failures: no searchable input,
    /// an unreachable or timed-out catalog, or an unreadable results page.
    pub async fn identify(
        &self,
        request: &IdentifyRequest,
        results: &UnboundedSender<MetadataRecord>,
        abort: &AbortSignal,
        timeout: Duration,
    ) -> Result<IdentifyOutcome, IdentifyError> {
        match self.identify_once(request, results, abort, timeout).await? {
            Attempt::Finished(outcome) => Ok(outcome),
            Attempt::NoCandidates if request.allows_identifier_retry() => {
                info!("No matches found with identifiers, retrying using only title and authors");
                let retry = request.without_identifiers();
                match self.identify_once(&retry, results, abort, timeout).await? {
                    Attempt::Finished(outcome) => Ok(outcome),
                    Attempt::NoCandidates => Ok(IdentifyOutcome::NoMatches),
                }
            }
            Attempt::NoCandidates => Ok(IdentifyOutcome::NoMatches),
        }
    }

    /// [`identify`](Self::identify) on a spawned task, with records as a stream
    ///
    /// The stream ends once the orchestrator and every worker it started
    /// have finished.
    pub fn identify_stream(
        &self,
        request: IdentifyRequest,
        abort: AbortSignal,
        timeout: Duration,
    ) -> (
        UnboundedReceiverStream<MetadataRecord>,
        JoinHandle<Result<IdentifyOutcome, IdentifyError>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let source = self.clone();
        let handle =
            tokio::spawn(async move { source.identify(&request, &tx, &abort, timeout).await });
        (UnboundedReceiverStream::new(rx), handle)
    }

    /// Download the cover image of the best matching edition
    ///
    /// The cache is consulted first; only on a miss does a full identify
    /// run, after which results are ranked against the request and the
    /// first one with a cached cover wins.
    ///
    /// # Errors
    ///
    /// Propagates the `IdentifyError` of the identify run, if one was needed.
    pub async fn download_cover(
        &self,
        request: &IdentifyRequest,
        abort: &AbortSignal,
        timeout: Duration,
    ) -> Result<Option<Vec<u8>>, IdentifyError> {
        let mut cover_url = self.cached_cover_url(&request.identifiers);
        if cover_url.is_none() {
            info!("No cached cover found, running identify");
            let (tx, mut rx) = mpsc::unbounded_channel();
            self.identify(request, &tx, abort, timeout).await?;
            drop(tx);
            if abort.is_set() {
                return Ok(None);
            }

            let mut records = Vec::new();
            while let Ok(record) = rx.try_recv() {
                records.push(record);
            }
            rank_records(&self.config, request, &mut records);
            cover_url = records
                .iter()
                .find_map(|record| self.cached_cover_url(&record.identifiers));
        }

        let Some(cover_url) = cover_url else {
            info!("No cover found");
            return Ok(None);
        };
        if abort.is_set() {
            return Ok(None);
        }

        info!("Downloading cover from: {cover_url}");
        match self.fetcher.fetch(&cover_url, timeout).await {
            Ok(bytes) if !bytes.is_empty() => Ok(Some(bytes)),
            Ok(_) => Ok(None),
            Err(e) => {
                error!("Failed to download cover from {cover_url}: {e}");
                Ok(None)
            }
        }
    }

    async fn identify_once(
        &self,
        request: &IdentifyRequest,
        results: &UnboundedSender<MetadataRecord>,
        abort: &AbortSignal,
        timeout: Duration,
    ) -> Result<Attempt, IdentifyError> {
        let query = build_query(&self.config, request).inspect_err(|e| error!("{e}"))?;
        if abort.is_set() {
            return Ok(Attempt::Finished(IdentifyOutcome::Aborted));
        }
        info!("Searching: {query}");

        let raw = self
            .fetcher
            .fetch(query.as_str(), timeout)
            .await
            .map_err(|e| self.query_failure(&query, &e))?;
        let candidates = read_results_page(&raw, &self.config)
            .inspect_err(|e| error!("{e} for query {query}"))?
            .into_candidates();

        if abort.is_set() {
            return Ok(Attempt::Finished(IdentifyOutcome::Aborted));
        }
        if candidates.is_empty() {
            warn!("No matches found with query: {query}");
            return Ok(Attempt::NoCandidates);
        }

        let workers = self.spawn_workers(candidates, results, abort, timeout).await;
        Ok(Attempt::Finished(self.poll_workers(workers, abort).await))
    }

    fn query_failure(&self, query: &SearchQuery, error: &FetchError) -> IdentifyError {
        match error {
            FetchError::Timeout(_) => {
                let host = self.config.base_url().host_str().unwrap_or("Catalog").to_string();
                let e = IdentifyError::Timeout(host);
                error!("{e}");
                e
            }
            FetchError::NotFound(_) => {
                let e = IdentifyError::MalformedQuery(query.to_string());
                error!("{e}");
                e
            }
            other => {
                error!("Failed to fetch results page: {other}");
                IdentifyError::Unreachable(query.to_string())
            }
        }
    }

    /// Start one worker per candidate, staggered to avoid request bursts
    async fn spawn_workers(
        &self,
        candidates: Vec<CandidateRef>,
        results: &UnboundedSender<MetadataRecord>,
        abort: &AbortSignal,
        timeout: Duration,
    ) -> Vec<JoinHandle<WorkerOutcome>> {
        let mut handles = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if abort.is_set() {
                debug!("Abort set, not starting remaining workers");
                break;
            }
            if !handles.is_empty() {
                tokio::time::sleep(self.config.worker_stagger()).await;
                if abort.is_set() {
                    break;
                }
            }
            debug!("Starting worker {} for {}", candidate.rank, candidate.url);
            let worker = DetailWorker {
                fetcher: self.fetcher.fork(),
                config: Arc::clone(&self.config),
                cache: self.cache.clone(),
                candidate,
                results: results.clone(),
                abort: abort.clone(),
                timeout,
            };
            handles.push(tokio::spawn(worker.run()));
        }
        handles
    }

    /// Wait for workers in short slices, re-checking the abort signal
    ///
    /// On abort the remaining handles are dropped, which detaches their
    /// tasks: they finish in the background without being waited on.
    async fn poll_workers(
        &self,
        handles: Vec<JoinHandle<WorkerOutcome>>,
        abort: &AbortSignal,
    ) -> IdentifyOutcome {
        let workers = handles.len();
        let poll = self.config.poll_interval();
        let mut pending: Vec<Option<JoinHandle<WorkerOutcome>>> =
            handles.into_iter().map(Some).collect();

        while !abort.is_set() {
            let mut alive = false;
            for slot in &mut pending {
                let Some(handle) = slot.as_mut() else {
                    continue;
                };
                let joined = tokio::time::timeout(poll, handle).await;
                match joined {
                    Ok(Ok(outcome)) => {
                        debug!("Worker finished: {outcome:?}");
                        *slot = None;
                    }
                    Ok(Err(e)) => {
                        warn!("Worker task failed: {e}");
                        *slot = None;
                    }
                    Err(_) => alive = true,
                }
                if abort.is_set() {
                    break;
                }
            }
            if !alive && !abort.is_set() {
                return IdentifyOutcome::Matched { workers };
            }
        }

        let running = pending.iter().filter(|slot| slot.is_some()).count();
        info!("Abort requested, leaving {running} workers running");
        IdentifyOutcome::Aborted
    }
}

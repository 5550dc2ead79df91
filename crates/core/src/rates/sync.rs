//! Rate synchronization service.
//!
//! This module provides the `RateSyncService` which orchestrates one polling
//! cycle: one concurrent worker per source, all diffing against the shared
//! state store under a single coarse lock.
//!
//! # Architecture
//!
//! ```text
//! RateSyncService
//!       │
//!       ├─► RateSource (poll + per-pair lookup, one worker each)
//!       ├─► StateStore (last-known snapshots, coarse-locked)
//!       └─► RateObserver (notification fan-out via the entity)
//! ```
//!
//! # Key Design Principles
//!
//! - **Workers are isolation units**: a failure never crosses to a sibling
//! - **Source failures are recoverable**: a grabber-class error skips the
//!   pair; anything else terminates only that worker
//! - **Check-then-write is atomic**: the exists/get/update/set sequence for
//!   a key runs under one lock shared by all workers, held across store I/O

use futures::future::join_all;
use log::{debug, error, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::model::{ExchangeRate, RateSnapshot};
use super::observer::RateObserver;
use super::store::{state_key, StateStore};
use crate::errors::{Error, Result};
use ratewatch_sources::{CurrencyPair, RateQuote, RateSource};

// =============================================================================
// Sync Result Types
// =============================================================================

/// Result of one worker's pass over the tracked pairs.
#[derive(Debug, Clone)]
pub struct SourceSyncResult {
    /// The source the worker polled.
    pub source_id: String,
    /// The worker's final status.
    pub status: SyncStatus,
    /// Keys seen for the first time.
    pub pairs_created: usize,
    /// Keys refreshed against a previous snapshot.
    pub pairs_updated: usize,
    /// Pairs the source does not publish or failed to deliver.
    pub pairs_skipped: usize,
    /// Error message when the worker did not finish.
    pub error: Option<String>,
}

impl SourceSyncResult {
    fn failed(source_id: &str, error: String) -> Self {
        Self {
            source_id: source_id.to_string(),
            status: SyncStatus::Failed,
            pairs_created: 0,
            pairs_updated: 0,
            pairs_skipped: 0,
            error: Some(error),
        }
    }
}

/// Status of a worker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// The worker processed every tracked pair (some may have been skipped).
    Success,
    /// The worker terminated early.
    Failed,
}

/// Aggregated outcome of one full sync cycle.
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// Per-source worker results, in source order.
    pub results: Vec<SourceSyncResult>,
}

impl SyncSummary {
    /// Keys written this cycle (created + updated).
    pub fn pairs_synced(&self) -> usize {
        self.results
            .iter()
            .map(|r| r.pairs_created + r.pairs_updated)
            .sum()
    }

    /// Workers that terminated early.
    pub fn failed_sources(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == SyncStatus::Failed)
            .count()
    }
}

/// What the critical section did with a key.
enum KeyOutcome {
    Created,
    Updated,
}

// =============================================================================
// Sync Service
// =============================================================================

/// Runs one polling cycle across all configured sources.
pub struct RateSyncService {
    sources: Vec<Arc<dyn RateSource>>,
    pairs: Vec<CurrencyPair>,
    store: Arc<dyn StateStore>,
    notifier: Arc<dyn RateObserver>,
    store_lock: Arc<Mutex<()>>,
}

impl RateSyncService {
    /// Build a service over a fixed set of sources and tracked pairs.
    ///
    /// `notifier` is the observer attached to every rate the cycle touches:
    /// fresh keys before `notify_created`, read-back keys before `update` so
    /// changed notifications fire for series first seen in a previous run.
    pub fn new(
        sources: Vec<Arc<dyn RateSource>>,
        pairs: Vec<CurrencyPair>,
        store: Arc<dyn StateStore>,
        notifier: Arc<dyn RateObserver>,
    ) -> Self {
        Self {
            sources,
            pairs,
            store,
            notifier,
            store_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run one cycle: spawn a worker per source and wait for all of them.
    ///
    /// Never fails as a whole; per-worker outcomes are reported in the
    /// summary. A worker panic is logged and recorded as a failed source
    /// without disturbing its siblings.
    pub async fn run_once(&self) -> SyncSummary {
        let mut handles = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let source = Arc::clone(source);
            let pairs = self.pairs.clone();
            let store = Arc::clone(&self.store);
            let notifier = Arc::clone(&self.notifier);
            let lock = Arc::clone(&self.store_lock);

            handles.push(tokio::spawn(async move {
                sync_source(source, &pairs, &store, &notifier, &lock).await
            }));
        }

        let mut results = Vec::with_capacity(self.sources.len());
        for (outcome, source) in join_all(handles).await.into_iter().zip(&self.sources) {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("Worker for {} terminated abnormally: {e}", source.id());
                    results.push(SourceSyncResult::failed(source.id(), e.to_string()));
                }
            }
        }

        SyncSummary { results }
    }
}

/// One worker: poll the source once, then diff every tracked pair.
async fn sync_source(
    source: Arc<dyn RateSource>,
    pairs: &[CurrencyPair],
    store: &Arc<dyn StateStore>,
    notifier: &Arc<dyn RateObserver>,
    lock: &Mutex<()>,
) -> SourceSyncResult {
    let source_id = source.id();

    let payload = match source.poll().await {
        Ok(payload) => payload,
        Err(e) => {
            error!("{source_id}: poll failed: {e}");
            return SourceSyncResult::failed(source_id, e.to_string());
        }
    };

    let mut result = SourceSyncResult {
        source_id: source_id.to_string(),
        status: SyncStatus::Success,
        pairs_created: 0,
        pairs_updated: 0,
        pairs_skipped: 0,
        error: None,
    };

    for pair in pairs {
        match source.rate(pair, Some(&payload)).await {
            Ok(Some(quote)) => match apply_quote(store, notifier, lock, quote).await {
                Ok(KeyOutcome::Created) => {
                    debug!("{source_id}: {pair}: first observation stored");
                    result.pairs_created += 1;
                }
                Ok(KeyOutcome::Updated) => {
                    debug!("{source_id}: {pair}: refreshed");
                    result.pairs_updated += 1;
                }
                Err(e) => {
                    // Not a source-local failure: stop this worker only.
                    error!("{source_id}: {pair}: critical failure, terminating worker: {e}");
                    result.status = SyncStatus::Failed;
                    result.error = Some(e.to_string());
                    return result;
                }
            },
            Ok(None) => {
                warn!("{source_id} exchange rate for {pair} was not found.");
                result.pairs_skipped += 1;
            }
            Err(e) => {
                error!("{source_id}: {pair}: {e}");
                result.pairs_skipped += 1;
            }
        }
    }

    result
}

/// The per-key critical section: check, diff, notify, write.
///
/// Holds the shared lock across the whole exists/get/update/set sequence,
/// including store I/O, so concurrent workers never interleave on a key.
async fn apply_quote(
    store: &Arc<dyn StateStore>,
    notifier: &Arc<dyn RateObserver>,
    lock: &Mutex<()>,
    quote: RateQuote,
) -> Result<KeyOutcome> {
    let key = state_key(quote.source_id, quote.pair.base(), quote.pair.dest());

    let _guard = lock.lock().await;

    if store.exists(&key).await? {
        let bytes = store
            .get(&key)
            .await?
            .ok_or_else(|| Error::Unexpected(format!("state vanished for {key}")))?;
        let snapshot = RateSnapshot::from_bytes(&bytes)?;

        let mut rate = ExchangeRate::from_snapshot(snapshot)?;
        // Observers are not persisted; re-attach before updating so the
        // changed notification can fire for a series from a previous run.
        rate.attach(Arc::clone(notifier));
        rate.update(quote.buy_rate, quote.sale_rate, Some(quote.observed_at))
            .await?;

        store.set(&key, &rate.snapshot().to_bytes()?).await?;
        Ok(KeyOutcome::Updated)
    } else {
        let mut rate = ExchangeRate::from_quote(quote)?;
        rate.attach(Arc::clone(notifier));
        rate.notify_created().await;

        store.set(&key, &rate.snapshot().to_bytes()?).await?;
        Ok(KeyOutcome::Created)
    }
}

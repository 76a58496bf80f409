//! Sync reconciler
//!
//! Reconciles the local quote collection with a remote snapshot on a
//! fixed interval. Merge policy: remote wins on text collision, local-only
//! quotes are preserved after the remote entries. A failed or empty fetch
//! aborts the cycle without touching local state, so a quote-less remote
//! can never wipe local data.

pub mod remote;

pub use remote::{RemoteClient, SyncError, SERVER_CATEGORY};

use crate::store::{QuoteStore, StoreError};
use crate::types::Quote;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Result of merging a remote snapshot into the local collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Remote snapshot first, then surviving local-only quotes
    pub merged: Vec<Quote>,
    /// Number of local quotes whose text was absent from the snapshot
    pub local_only: usize,
}

/// Merge a remote snapshot with the local collection
///
/// Merge identity is the quote text. Remote entries are authoritative for
/// any text present on both sides; local quotes with no remote
/// counterpart are appended after the snapshot. An empty local collection
/// merges to exactly the snapshot.
pub fn merge_remote(local: &[Quote], remote: &[Quote]) -> MergeOutcome {
    let remote_texts: HashSet<&str> = remote.iter().map(|q| q.text.as_str()).collect();

    let local_only: Vec<Quote> = local
        .iter()
        .filter(|q| !remote_texts.contains(q.text.as_str()))
        .cloned()
        .collect();

    let mut merged = remote.to_vec();
    let local_only_count = local_only.len();
    merged.extend(local_only);

    MergeOutcome {
        merged,
        local_only: local_only_count,
    }
}

/// What a sync cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Merged collection installed; `remote` snapshot entries, `local_only` survivors
    Applied { remote: usize, local_only: usize },
    /// Remote snapshot was empty; local state untouched
    RemoteEmpty,
    /// Fetch failed; local state untouched
    FetchFailed(String),
}

/// Non-blocking notifications emitted by the reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A cycle finished with this outcome
    CycleCompleted(SyncOutcome),
    /// Local-only quotes survived a merge where the remote won collisions
    Conflict { local_only: usize },
}

/// Run one reconciliation cycle against the store
///
/// Fetch failures and empty snapshots abort the cycle without mutating
/// local state. The read-merge-persist sequence holds the store lock for
/// its whole duration; the best-effort push happens after the lock is
/// released and its failure is only logged.
pub async fn run_cycle(
    store: &Arc<Mutex<QuoteStore>>,
    client: &RemoteClient,
) -> Result<SyncOutcome, StoreError> {
    let snapshot = match client.fetch_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("Sync fetch failed, skipping cycle: {}", e);
            return Ok(SyncOutcome::FetchFailed(e.to_string()));
        }
    };

    if snapshot.is_empty() {
        tracing::info!("Remote snapshot empty, skipping cycle");
        return Ok(SyncOutcome::RemoteEmpty);
    }

    let (outcome, merged) = {
        let mut store = store.lock().await;
        let result = merge_remote(&store.quotes(), &snapshot);
        store.replace_all(result.merged.clone())?;
        (
            SyncOutcome::Applied {
                remote: snapshot.len(),
                local_only: result.local_only,
            },
            result.merged,
        )
    };

    if let Err(e) = client.push_snapshot(&merged).await {
        tracing::warn!("Sync push failed (ignored): {}", e);
    }

    Ok(outcome)
}

/// Periodic sync driver
pub struct SyncReconciler {
    store: Arc<Mutex<QuoteStore>>,
    client: RemoteClient,
    interval: Duration,
}

/// Handle to a running sync task
///
/// Stopping (or dropping) the handle cancels the timer so no further
/// cycles start. A cycle already in flight runs to completion and may
/// still persist its merge after the stop.
pub struct SyncHandle {
    stop: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the periodic sync
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl SyncReconciler {
    pub fn new(store: Arc<Mutex<QuoteStore>>, client: RemoteClient, interval: Duration) -> Self {
        Self {
            store,
            client,
            interval,
        }
    }

    /// Run a single cycle immediately, outside the timer
    pub async fn run_cycle(&self) -> Result<SyncOutcome, StoreError> {
        run_cycle(&self.store, &self.client).await
    }

    /// Spawn the periodic sync task
    ///
    /// Each tick starts a cycle unless one is still in flight, in which
    /// case the tick is skipped. Cycle outcomes and conflict
    /// notifications are delivered on the returned channel; a dropped
    /// receiver only silences them.
    pub fn spawn(self) -> (SyncHandle, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let busy = Arc::new(AtomicBool::new(false));

        let stop_flag = stop.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first interval tick fires immediately; the first sync
            // should happen one full interval after startup
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if stop_flag.load(Ordering::SeqCst) {
                    break;
                }

                if busy.swap(true, Ordering::SeqCst) {
                    tracing::debug!("Previous sync cycle still in flight, skipping tick");
                    continue;
                }

                let store = self.store.clone();
                let client = self.client.clone();
                let tx = tx.clone();
                let busy = busy.clone();
                tokio::spawn(async move {
                    match run_cycle(&store, &client).await {
                        Ok(outcome) => {
                            if let SyncOutcome::Applied { local_only, .. } = outcome {
                                if local_only > 0 {
                                    tracing::warn!(
                                        "{} local-only quotes kept after remote-wins merge",
                                        local_only
                                    );
                                    let _ = tx.send(SyncEvent::Conflict { local_only });
                                }
                            }
                            let _ = tx.send(SyncEvent::CycleCompleted(outcome));
                        }
                        Err(e) => {
                            tracing::warn!("Sync cycle failed: {}", e);
                        }
                    }
                    busy.store(false, Ordering::SeqCst);
                });
            }
        });

        (SyncHandle { stop, task }, rx)
    }
}

// crates/refsuggest-core/src/loader/provider.rs
use super::{decode_payload, DatasetSource};
use crate::common::DatasetStats;
use crate::error::{LookupError, Result};
use crate::locale::PartitionKey;
use crate::traits::ReferenceRecord;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Result of a partition load, shared by every caller waiting on it.
pub type LoadOutcome<R> = std::result::Result<Arc<[R]>, Arc<LookupError>>;

enum Slot<R> {
    Ready(Arc<[R]>),
    Loading(watch::Receiver<Option<LoadOutcome<R>>>),
}

struct Inner<R, S> {
    source: S,
    slots: Mutex<HashMap<PartitionKey, Slot<R>>>,
    /// Bumped by `clear`; fetches started under an older epoch do not write back.
    epoch: AtomicU64,
    fetches: AtomicUsize,
}

/// Memoizing, in-flight-sharing loader of dataset partitions.
///
/// Cloning is cheap and clones share the cache, so every widget of the same
/// kind in a session reads one [`DatasetProvider`].
///
/// - A partition is fetched and decoded at most once; afterwards it is served
///   from memory and never mutated.
/// - Concurrent `load` calls for a partition that is still loading await the
///   same fetch instead of issuing another.
/// - A failed fetch leaves nothing behind: the next `load` starts over. There
///   is no automatic retry.
/// - The fetch runs on its own task, so it completes and populates the cache
///   even if every caller has gone away.
pub struct DatasetProvider<R, S> {
    inner: Arc<Inner<R, S>>,
}

impl<R, S> Clone for DatasetProvider<R, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: ReferenceRecord, S: DatasetSource> DatasetProvider<R, S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                slots: Mutex::new(HashMap::new()),
                epoch: AtomicU64::new(0),
                fetches: AtomicUsize::new(0),
            }),
        }
    }

    /// Load a partition, degrading to an empty dataset on failure.
    ///
    /// The failure itself is logged once by the fetch task.
    pub async fn load(&self, key: &PartitionKey) -> Arc<[R]> {
        match self.try_load(key).await {
            Ok(data) => data,
            Err(e) => {
                debug!(kind = R::KIND, partition = %key, error = %e, "serving empty dataset");
                Arc::from(Vec::new())
            }
        }
    }

    /// Load a partition, surfacing the failure.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn try_load(&self, key: &PartitionKey) -> LoadOutcome<R> {
        let mut rx = {
            let mut slots = self.inner.slots.lock();
            match slots.get(key) {
                Some(Slot::Ready(data)) => return Ok(Arc::clone(data)),
                Some(Slot::Loading(rx)) => {
                    debug!(kind = R::KIND, partition = %key, "joining in-flight load");
                    rx.clone()
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    slots.insert(key.clone(), Slot::Loading(rx.clone()));
                    self.spawn_fetch(key.clone(), tx);
                    rx
                }
            }
        };

        let settled = rx.wait_for(Option::is_some).await;
        match settled {
            Ok(outcome) => outcome.clone().unwrap_or_else(|| Err(aborted(key))),
            Err(_) => Err(aborted(key)),
        }
    }

    /// Decoded partition if it is already in memory.
    pub fn cached(&self, key: &PartitionKey) -> Option<Arc<[R]>> {
        match self.inner.slots.lock().get(key) {
            Some(Slot::Ready(data)) => Some(Arc::clone(data)),
            _ => None,
        }
    }

    pub fn is_loading(&self, key: &PartitionKey) -> bool {
        matches!(self.inner.slots.lock().get(key), Some(Slot::Loading(_)))
    }

    pub fn stats(&self, key: &PartitionKey) -> Option<DatasetStats> {
        self.cached(key).map(|data| DatasetStats::of(&data))
    }

    /// Number of fetches issued against the source so far.
    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::Relaxed)
    }

    /// Drop every cached partition (full reload). Loads still in flight
    /// complete for their waiters but are not written back.
    pub fn clear(&self) {
        self.inner.epoch.fetch_add(1, Ordering::AcqRel);
        self.inner.slots.lock().clear();
    }

    fn spawn_fetch(&self, key: PartitionKey, tx: watch::Sender<Option<LoadOutcome<R>>>) {
        let inner = Arc::clone(&self.inner);
        let epoch = inner.epoch.load(Ordering::Acquire);
        inner.fetches.fetch_add(1, Ordering::Relaxed);

        tokio::spawn(async move {
            let outcome = inner.fetch_and_decode(&key).await.map_err(Arc::new);

            {
                let mut slots = inner.slots.lock();
                let current = inner.epoch.load(Ordering::Acquire) == epoch;
                match &outcome {
                    Ok(data) => {
                        info!(kind = R::KIND, partition = %key, records = data.len(), "dataset loaded");
                        if current {
                            slots.insert(key.clone(), Slot::Ready(Arc::clone(data)));
                        }
                    }
                    Err(e) => {
                        warn!(kind = R::KIND, partition = %key, error = %e, "dataset unavailable");
                        if current {
                            slots.remove(&key);
                        }
                    }
                }
            }

            tx.send_replace(Some(outcome));
        });
    }
}

impl<R: ReferenceRecord, S: DatasetSource> Inner<R, S> {
    async fn fetch_and_decode(&self, key: &PartitionKey) -> Result<Arc<[R]>> {
        debug!(kind = R::KIND, partition = %key, source = %self.source.describe(key), "fetching dataset");
        let bytes = self.source.fetch(key).await?;
        // Inflate and parse on the blocking pool so timers keep firing.
        let records: Vec<R> = tokio::task::spawn_blocking(move || decode_payload(&bytes))
            .await
            .map_err(|e| LookupError::InvalidData(format!("decoding partition {key} failed: {e}")))??;
        Ok(Arc::from(records))
    }
}

fn aborted(key: &PartitionKey) -> Arc<LookupError> {
    Arc::new(LookupError::InvalidData(format!(
        "load of partition {key} was aborted"
    )))
}

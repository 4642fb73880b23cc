//! Asynchronous resolution of natural aspect ratios.
//!
//! - One blocking probe per unresolved item, bounded by a semaphore
//! - Results land in the shared `AspectRatioCache` exactly once per id
//! - Each new entry is announced on a flume channel so the owning thread can
//!   re-run the layout at its own pace
//! - Probe failures are logged and leave no entry; the item just stays out of
//!   the layout

use std::sync::Arc;

use flume::{Receiver, Sender};
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use tracing::{debug, trace, warn};

use super::cache::{AspectEntry, SharedAspectCache};
use super::probe::DimensionProbe;
use crate::models::{MediaId, MediaItem};

/// Default number of probes allowed to run at once.
pub const DEFAULT_PROBE_WORKERS: usize = 8;

/// Sent once for every id that gains a cache entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub id: MediaId,
    pub entry: AspectEntry,
}

/// Cheap to clone; clones share the cache, the permits and the channel.
#[derive(Clone)]
pub struct MetadataLoader {
    probe: Arc<dyn DimensionProbe>,
    cache: SharedAspectCache,
    permits: Arc<Semaphore>,
    resolved_tx: Sender<Resolved>,
    resolved_rx: Receiver<Resolved>,
}

impl MetadataLoader {
    pub fn new(probe: Arc<dyn DimensionProbe>, cache: SharedAspectCache) -> Self {
        Self::with_workers(probe, cache, DEFAULT_PROBE_WORKERS)
    }

    pub fn with_workers(
        probe: Arc<dyn DimensionProbe>,
        cache: SharedAspectCache,
        workers: usize,
    ) -> Self {
        let (resolved_tx, resolved_rx) = flume::unbounded();
        Self {
            probe,
            cache,
            permits: Arc::new(Semaphore::new(workers.max(1))),
            resolved_tx,
            resolved_rx,
        }
    }

    pub fn cache(&self) -> &SharedAspectCache {
        &self.cache
    }

    /// Resolve one item's aspect ratio into the cache.
    ///
    /// Returns immediately when the id is already cached. Never fails: an
    /// unreadable image is logged and produces no entry.
    pub async fn resolve(&self, item: &MediaItem) {
        self.clone().resolve_owned(item.id, item.url.clone()).await;
    }

    /// Resolve every item.
    ///
    /// With `first_in_order` the first item is awaited on its own before the
    /// rest are dispatched, so its height is known before anything else can
    /// land in the layout. The remaining items resolve concurrently in no
    /// particular order.
    pub async fn resolve_all(&self, items: &[MediaItem], first_in_order: bool) {
        let mut rest = items.iter();
        if first_in_order {
            if let Some(first) = rest.next() {
                self.resolve(first).await;
            }
        }

        let mut tasks = JoinSet::new();
        for item in rest {
            tasks.spawn(self.clone().resolve_owned(item.id, item.url.clone()));
        }
        let dispatched = tasks.len();

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = ?e, "Aspect ratio task did not complete");
            }
        }
        debug!(dispatched, cached = self.cache.read().len(), "Resolved item batch");
    }

    /// Drain every resolution announced since the last call (non-blocking).
    pub fn poll_resolved(&self) -> Vec<Resolved> {
        let mut resolved = Vec::new();
        while let Ok(r) = self.resolved_rx.try_recv() {
            resolved.push(r);
        }
        resolved
    }

    async fn resolve_owned(self, id: MediaId, url: String) {
        let cached = self.cache.read().contains(id);
        if cached {
            trace!(id, "Aspect ratio already cached");
            return;
        }

        let Ok(_permit) = self.permits.acquire().await else {
            return;
        };

        let probe = Arc::clone(&self.probe);
        let probe_url = url.clone();
        let outcome = task::spawn_blocking(move || probe.natural_size(&probe_url)).await;

        let (width, height) = match outcome {
            Ok(Ok(size)) => size,
            Ok(Err(e)) => {
                warn!(id, %url, error = %e, "Failed to resolve image dimensions");
                return;
            }
            Err(e) => {
                warn!(id, %url, error = ?e, "Dimension probe panicked");
                return;
            }
        };

        let inserted = self.cache.write().insert_dimensions(id, width, height);
        match inserted {
            Some(entry) => {
                trace!(id, width, height, scaled_height = entry.scaled_height, "Resolved aspect ratio");
                if self.resolved_tx.send(Resolved { id, entry }).is_err() {
                    debug!(id, "Resolution channel closed");
                }
            }
            None if width == 0 || height == 0 => {
                warn!(id, %url, "Image reports empty dimensions");
            }
            // A concurrent probe for the same id got there first.
            None => trace!(id, "Aspect ratio resolved twice, keeping first"),
        }
    }
}

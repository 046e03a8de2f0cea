//! Bounded pools for outbound calls.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;

use super::types::PoolStatus;

/// Tracks statistics for a pool.
#[derive(Default)]
struct PoolStats {
    active: AtomicU64,
    queued: AtomicU64,
    total_processed: AtomicU64,
    total_failed: AtomicU64,
}

/// Caps concurrent calls to one endpoint.
pub(crate) struct EndpointPool {
    name: &'static str,
    max_concurrent: usize,
    semaphore: Option<Arc<Semaphore>>,
    stats: PoolStats,
}

impl EndpointPool {
    /// `max_concurrent == 0` means unlimited.
    pub(crate) fn new(name: &'static str, max_concurrent: usize) -> Self {
        Self {
            name,
            max_concurrent,
            semaphore: (max_concurrent > 0).then(|| Arc::new(Semaphore::new(max_concurrent))),
            stats: PoolStats::default(),
        }
    }

    /// Run `fut` once a slot is free. `succeeded` decides which counter the
    /// call lands in.
    pub(crate) async fn run<F, T>(&self, fut: F, succeeded: impl Fn(&T) -> bool) -> T
    where
        F: Future<Output = T>,
    {
        let queued = Gauge::enter(&self.stats.queued);
        // The semaphore is never closed, so acquire cannot fail.
        let _permit = match &self.semaphore {
            Some(semaphore) => semaphore.acquire().await.ok(),
            None => None,
        };
        drop(queued);

        let _active = Gauge::enter(&self.stats.active);
        let result = fut.await;

        if succeeded(&result) {
            self.stats.total_processed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.total_failed.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    pub(crate) fn status(&self) -> PoolStatus {
        PoolStatus {
            name: self.name.to_string(),
            active_jobs: self.stats.active.load(Ordering::Relaxed) as usize,
            max_concurrent: self.max_concurrent,
            queued_jobs: self.stats.queued.load(Ordering::Relaxed) as usize,
            total_processed: self.stats.total_processed.load(Ordering::Relaxed),
            total_failed: self.stats.total_failed.load(Ordering::Relaxed),
        }
    }
}

/// Increments a counter for as long as it lives, so cancelled futures
/// leave the stats consistent.
struct Gauge<'a>(&'a AtomicU64);

impl<'a> Gauge<'a> {
    fn enter(counter: &'a AtomicU64) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(counter)
    }
}

impl Drop for Gauge<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

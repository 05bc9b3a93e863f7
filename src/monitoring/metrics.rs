/*!
 * Metrics Collection
 * Counters for the sampling path
 *
 * Lives for the whole profiler, across sessions, so a stop/start cycle does
 * not hide earlier drops.
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counters, cheap to clone into workers
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    samples_taken: AtomicU64,
    samples_dropped: AtomicU64,
    snapshot_failures: AtomicU64,
    sessions_started: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Samples handed to a ring manager
    pub samples_taken: u64,
    /// Samples discarded because the intake queue was full
    pub samples_dropped: u64,
    /// Ticks skipped because the source failed
    pub snapshot_failures: u64,
    /// Tracking sessions created
    pub sessions_started: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn sample_taken(&self) {
        self.inner.samples_taken.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dropped sample, returning the running total
    #[inline]
    pub fn sample_dropped(&self) -> u64 {
        self.inner.samples_dropped.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[inline]
    pub fn snapshot_failed(&self) {
        self.inner.snapshot_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn session_started(&self) {
        self.inner.sessions_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            samples_taken: self.inner.samples_taken.load(Ordering::Relaxed),
            samples_dropped: self.inner.samples_dropped.load(Ordering::Relaxed),
            snapshot_failures: self.inner.snapshot_failures.load(Ordering::Relaxed),
            sessions_started: self.inner.sessions_started.load(Ordering::Relaxed),
        }
    }
}

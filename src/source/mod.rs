/*!
 * Snapshot Sources
 * Readers of allocator statistics for "now"
 *
 * The sampler only sees the `SnapshotSource` trait. Which allocator backs the
 * numbers is the hosting binary's choice:
 * - `CountingAllocator` wraps the system allocator and works everywhere
 * - `JemallocSource` reads jemalloc's own counters (feature `jemalloc`)
 */

mod counting;
#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
mod jemalloc;

pub use counting::{CountingAllocator, CountingSource};
#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
pub use jemalloc::JemallocSource;

use crate::core::errors::SnapshotError;
use crate::core::types::MemStats;
use std::sync::Arc;

/// Produces one raw statistics reading on demand
pub trait SnapshotSource: Send + Sync + 'static {
    fn read(&self) -> Result<MemStats, SnapshotError>;
}

impl<F> SnapshotSource for F
where
    F: Fn() -> Result<MemStats, SnapshotError> + Send + Sync + 'static,
{
    fn read(&self) -> Result<MemStats, SnapshotError> {
        self()
    }
}

/// Shared handle to a source, cloned into every sampler
pub type SharedSource = Arc<dyn SnapshotSource>;

/// Source matching the allocator this crate was built for
#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
pub fn default_source() -> SharedSource {
    match JemallocSource::new() {
        Ok(source) => Arc::new(source),
        Err(e) => {
            tracing::warn!(error = %e, "jemalloc statistics unavailable, falling back to counting source");
            Arc::new(CountingSource)
        }
    }
}

/// Source matching the allocator this crate was built for
#[cfg(not(all(feature = "jemalloc", not(target_env = "msvc"))))]
pub fn default_source() -> SharedSource {
    Arc::new(CountingSource)
}

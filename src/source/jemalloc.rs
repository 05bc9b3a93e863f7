/*!
 * Jemalloc Source
 * Reads jemalloc's statistics through its mallctl interface
 */

use super::SnapshotSource;
use crate::core::errors::SnapshotError;
use crate::core::types::MemStats;
use tikv_jemalloc_ctl::{epoch, epoch_mib, stats};

/// Accessor to the allocator internals
///
/// MIBs are resolved once; each read advances the epoch so the counters are
/// refreshed before they are sampled.
#[derive(Clone)]
pub struct JemallocSource {
    epoch: epoch_mib,
    allocated: stats::allocated_mib,
    active: stats::active_mib,
    mapped: stats::mapped_mib,
    retained: stats::retained_mib,
}

impl JemallocSource {
    pub fn new() -> Result<Self, SnapshotError> {
        let unavailable = |e: tikv_jemalloc_ctl::Error| SnapshotError::Unavailable(e.to_string());
        Ok(Self {
            epoch: epoch::mib().map_err(unavailable)?,
            allocated: stats::allocated::mib().map_err(unavailable)?,
            active: stats::active::mib().map_err(unavailable)?,
            mapped: stats::mapped::mib().map_err(unavailable)?,
            retained: stats::retained::mib().map_err(unavailable)?,
        })
    }
}

impl SnapshotSource for JemallocSource {
    fn read(&self) -> Result<MemStats, SnapshotError> {
        let failed = |e: tikv_jemalloc_ctl::Error| SnapshotError::ReadFailed(e.to_string());

        // update stats by advancing the allocation epoch
        self.epoch.advance().map_err(failed)?;

        let allocated = self.allocated.read().map_err(failed)? as u64;
        let active = self.active.read().map_err(failed)? as u64;
        let mapped = self.mapped.read().map_err(failed)? as u64;
        let retained = self.retained.read().map_err(failed)? as u64;

        Ok(MemStats {
            sys: mapped + retained,
            heap_sys: mapped,
            heap_alloc: allocated,
            heap_idle: mapped.saturating_sub(active),
            heap_released: retained,
        })
    }
}

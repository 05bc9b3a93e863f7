/*!
 * Core Types
 * Readings and samples passed between the sampling workers
 */

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch
pub type EpochMillis = i64;

/// One raw allocator statistics reading
///
/// Field meanings follow the usual allocator vocabulary: `sys` is everything
/// obtained from the OS, the `heap_*` fields describe the heap portion of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemStats {
    /// Total bytes obtained from the OS
    pub sys: u64,
    /// Heap bytes reserved from the OS
    pub heap_sys: u64,
    /// Heap bytes currently allocated
    pub heap_alloc: u64,
    /// Heap bytes reserved but not in use
    pub heap_idle: u64,
    /// Heap bytes returned to the OS
    pub heap_released: u64,
}

/// A reading paired with the time it was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedSample {
    pub time_epoch_ms: EpochMillis,
    pub mem_stats: MemStats,
}

impl TimedSample {
    pub fn new(time_epoch_ms: EpochMillis, mem_stats: MemStats) -> Self {
        Self {
            time_epoch_ms,
            mem_stats,
        }
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_epoch_ms() -> EpochMillis {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as EpochMillis
}

/// Wall-clock stamps that never repeat or go backwards
///
/// Follows the wall clock, except that each stamp is at least one millisecond
/// past the previous one. Ticks that land in the same millisecond, or a clock
/// stepped backwards, push the stamp ahead by one; it rejoins the wall clock
/// as soon as the clock passes it again.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicStamper {
    last: Option<EpochMillis>,
}

impl MonotonicStamper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next stamp from the current wall clock
    pub fn stamp(&mut self) -> EpochMillis {
        self.stamp_at(now_epoch_ms())
    }

    /// Next stamp given a wall-clock reading
    pub fn stamp_at(&mut self, wall_ms: EpochMillis) -> EpochMillis {
        let stamp = match self.last {
            Some(last) => wall_ms.max(last + 1),
            None => wall_ms,
        };
        self.last = Some(stamp);
        stamp
    }
}

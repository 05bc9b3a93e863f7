/*!
 * heapscope
 * In-process heap statistics sampler
 *
 * Periodically snapshots allocator statistics into a bounded per-session
 * history, and serves that history together with host-supplied diagnostic
 * key/value pairs.
 */

pub mod api;
pub mod core;
pub mod monitoring;
pub mod profiler;
pub mod source;

// Re-exports
pub use crate::core::{
    MemStats, ProfilerConfig, ProfilerError, ProfilerResult, SnapshotError, TimedSample,
};
pub use api::{HeapMemStat, ProfilingInfo};
pub use monitoring::{init_tracing, ExtraInfo, ExtraInfoRegistry, MetricsSnapshot};
pub use profiler::Profiler;
pub use source::{CountingAllocator, CountingSource, SnapshotSource};

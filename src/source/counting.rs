/*!
 * Counting Allocator
 * System allocator wrapper that keeps live and peak byte counts
 */

use super::SnapshotSource;
use crate::core::errors::SnapshotError;
use crate::core::types::MemStats;
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering::Relaxed};

static ALLOCATED: AtomicUsize = AtomicUsize::new(0);
static PEAK: AtomicUsize = AtomicUsize::new(0);
static ALLOC_CALLS: AtomicU64 = AtomicU64::new(0);

/// Global allocator that counts heap bytes
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: heapscope::source::CountingAllocator = heapscope::source::CountingAllocator;
/// ```
pub struct CountingAllocator;

// SAFETY: every call is delegated to `System`; the counters are plain atomics.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        ALLOCATED.fetch_sub(layout.size(), Relaxed);
        System.dealloc(ptr, layout);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            ALLOCATED.fetch_sub(layout.size(), Relaxed);
            record_alloc(new_size);
        }
        new_ptr
    }
}

#[inline]
fn record_alloc(size: usize) {
    let current = ALLOCATED.fetch_add(size, Relaxed) + size;
    PEAK.fetch_max(current, Relaxed);
    ALLOC_CALLS.fetch_add(1, Relaxed);
}

/// Reads the counters kept by `CountingAllocator`
///
/// The wrapper only sees the heap, so `sys` equals `heap_sys` (the peak) and
/// nothing is ever reported as released.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingSource;

impl SnapshotSource for CountingSource {
    fn read(&self) -> Result<MemStats, SnapshotError> {
        if ALLOC_CALLS.load(Relaxed) == 0 {
            return Err(SnapshotError::Unavailable(
                "CountingAllocator is not installed as the global allocator".into(),
            ));
        }

        let allocated = ALLOCATED.load(Relaxed) as u64;
        let peak = (PEAK.load(Relaxed) as u64).max(allocated);

        Ok(MemStats {
            sys: peak,
            heap_sys: peak,
            heap_alloc: allocated,
            heap_idle: peak - allocated,
            heap_released: 0,
        })
    }
}

/*!
 * Tracking Lifecycle Tests
 *
 * Sample counts run on paused time so tick boundaries are exact. Stamps
 * stay strictly increasing there too, since each session stamps monotonically.
 */

use crate::common::{assert_strictly_increasing, profiler, wait_for_samples};
use heapscope::core::limits::MIN_SAMPLE_INTERVAL;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_history_fills_one_sample_per_interval() {
    let profiler = profiler(10, 100);
    profiler.start_tracking();

    tokio::time::sleep(Duration::from_millis(550)).await;
    let history = profiler.snapshot_history().await;
    assert_eq!(history.len(), 5);
    assert_strictly_increasing(&history);

    let allocs: Vec<u64> = history.iter().map(|s| s.mem_stats.heap_alloc).collect();
    assert_eq!(allocs, vec![1_000, 2_000, 3_000, 4_000, 5_000]);

    profiler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_history_is_bounded_by_capacity() {
    let profiler = profiler(10, 100);
    profiler.start_tracking();

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let history = profiler.snapshot_history().await;
    assert_eq!(history.len(), 10);
    assert_strictly_increasing(&history);

    // Most recent ten, contiguous: the 1500ms tick may or may not have landed
    let allocs: Vec<u64> = history.iter().map(|s| s.mem_stats.heap_alloc).collect();
    assert!(allocs.windows(2).all(|pair| pair[1] == pair[0] + 1_000));
    assert!(allocs[9] == 14_000 || allocs[9] == 15_000, "{:?}", allocs);

    profiler.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_history_is_time_ordered() {
    let profiler = profiler(10, 20);
    profiler.start_tracking();

    let history = wait_for_samples(&profiler, 6).await;
    assert_strictly_increasing(&history);

    profiler.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_history_ordered_at_minimum_interval() {
    let profiler = profiler(2_000, MIN_SAMPLE_INTERVAL.as_millis() as u64);
    profiler.start_tracking();

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    let history = profiler.snapshot_history().await;
    assert!(history.len() > 100, "only {} samples", history.len());
    assert_strictly_increasing(&history);

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_idle_history_is_empty() {
    let profiler = profiler(10, 10);
    assert!(profiler.snapshot_history().await.is_empty());
    assert!(profiler.info().await.heap_info.is_empty());
    profiler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_start_while_tracking_keeps_session() {
    let profiler = profiler(10, 100);
    profiler.start_tracking();
    tokio::time::sleep(Duration::from_millis(350)).await;

    profiler.start_tracking();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Same session: history kept growing instead of restarting
    let history = profiler.snapshot_history().await;
    assert_eq!(history.len(), 4);
    assert_eq!(profiler.metrics().sessions_started, 1);

    profiler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_discards_history() {
    let profiler = profiler(10, 100);
    profiler.start_tracking();
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(profiler.snapshot_history().await.len(), 3);

    profiler.stop_tracking();
    assert!(profiler.snapshot_history().await.is_empty());

    // Stopping again is a no-op
    profiler.stop_tracking();
    assert!(profiler.snapshot_history().await.is_empty());

    profiler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_restart_begins_fresh_history() {
    let profiler = profiler(10, 100);
    profiler.start_tracking();
    tokio::time::sleep(Duration::from_millis(550)).await;
    assert_eq!(profiler.snapshot_history().await.len(), 5);

    profiler.stop_tracking();
    profiler.start_tracking();
    tokio::time::sleep(Duration::from_millis(250)).await;

    let history = profiler.snapshot_history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(profiler.metrics().sessions_started, 2);

    profiler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_read_racing_stop_is_answered() {
    let profiler = profiler(10, 100);
    profiler.start_tracking();
    tokio::time::sleep(Duration::from_millis(250)).await;

    // Read queued ahead of the stop sees the live session
    let (history, ()) = tokio::join!(profiler.snapshot_history(), async {
        profiler.stop_tracking();
    });
    assert_eq!(history.len(), 2);

    profiler.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let profiler = profiler(10, 10);
    profiler.start_tracking();
    profiler.shutdown().await;
    profiler.shutdown().await;

    // Controller gone: reads are empty, commands are ignored
    profiler.start_tracking();
    assert!(profiler.snapshot_history().await.is_empty());
}

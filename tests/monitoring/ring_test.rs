/*!
 * Ring Buffer Tests
 */

use heapscope::monitoring::ring::RingBuffer;
use heapscope::{MemStats, TimedSample};
use proptest::prelude::*;

fn sample(ms: i64) -> TimedSample {
    TimedSample::new(ms, MemStats::default())
}

fn times(history: &[TimedSample]) -> Vec<i64> {
    history.iter().map(|s| s.time_epoch_ms).collect()
}

#[test]
fn test_no_loss_below_capacity() {
    let mut ring = RingBuffer::new(10);
    for ms in 1..=7 {
        ring.push(sample(ms));
    }

    assert_eq!(ring.len(), 7);
    assert_eq!(times(&ring.to_vec()), (1..=7).collect::<Vec<_>>());
}

#[test]
fn test_eviction_keeps_most_recent() {
    let mut ring = RingBuffer::new(10);
    for ms in 1..=13 {
        ring.push(sample(ms));
    }

    assert_eq!(ring.len(), 10);
    assert_eq!(times(&ring.to_vec()), (4..=13).collect::<Vec<_>>());
}

#[test]
fn test_read_does_not_disturb_ring() {
    let mut ring = RingBuffer::new(3);
    for ms in 1..=4 {
        ring.push(sample(ms));
    }

    let first = ring.to_vec();
    let second = ring.to_vec();
    assert_eq!(first, second);

    ring.push(sample(5));
    assert_eq!(times(&ring.to_vec()), vec![3, 4, 5]);
}

proptest! {
    #[test]
    fn prop_capacity_bound(capacity in 1usize..50, extra in 0usize..200) {
        let mut ring = RingBuffer::new(capacity);
        for ms in 0..(capacity + extra) as i64 {
            ring.push(sample(ms));
        }
        prop_assert_eq!(ring.to_vec().len(), capacity);
    }

    #[test]
    fn prop_eviction_correctness(capacity in 1usize..50, k in 1usize..200) {
        let mut ring = RingBuffer::new(capacity);
        let total = capacity + k;
        for ms in 0..total as i64 {
            ring.push(sample(ms));
        }

        let expected: Vec<i64> = (k as i64..total as i64).collect();
        prop_assert_eq!(times(&ring.to_vec()), expected);
    }

    #[test]
    fn prop_order_strictly_increasing(capacity in 1usize..50, count in 0usize..300) {
        let mut ring = RingBuffer::new(capacity);
        for ms in 0..count as i64 {
            ring.push(sample(ms));
        }

        let held = ring.to_vec();
        prop_assert!(held.windows(2).all(|w| w[0].time_epoch_ms < w[1].time_epoch_ms));
    }
}

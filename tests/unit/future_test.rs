//! Tests for futures and output slots

use prometheus_task_pool::core::{OutputSlot, PoolError, TaskFuture};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_only_one_concurrent_resolution_wins() {
    let fut = TaskFuture::new();
    let winners = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let fut = fut.clone();
            let winners = Arc::clone(&winners);
            thread::spawn(move || {
                if fut.make_available(i).is_ok() {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("resolver panicked");
    }
    assert_eq!(winners.load(Ordering::SeqCst), 1);
    assert!(fut.get().is_some());
}

#[test]
fn test_resolved_value_is_stable_for_readers() {
    let fut = TaskFuture::new();
    fut.make_available(vec![1.5, 2.5]).unwrap();
    assert_eq!(fut.make_available(vec![0.0]), Err(PoolError::AlreadyResolved));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let fut = fut.clone();
            thread::spawn(move || fut.wait_timeout(Duration::from_secs(1)))
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.join().unwrap(), Ok(vec![1.5, 2.5]));
    }
}

#[test]
fn test_handle_count_tracks_clones() {
    let fut = TaskFuture::<u8>::default();
    assert_eq!(fut.handle_count(), 1);
    let other = fut.clone();
    assert_eq!(fut.handle_count(), 2);
    drop(other);
    assert_eq!(fut.handle_count(), 1);
}

#[test]
fn test_unfilled_slot_reads_none() {
    let slot = OutputSlot::<f64>::default();
    assert!(!slot.is_filled());
    assert_eq!(slot.get(), None);
    assert_eq!(slot.fill(-1.0), Ok(()));
    assert_eq!(slot.fill(2.0), Err(PoolError::AlreadyResolved));
}

//! Tests for the shared task queue

use prometheus_task_pool::config::QueueDiscipline;
use prometheus_task_pool::core::{Popped, TaskQueue};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_discipline_is_reported() {
    assert_eq!(
        TaskQueue::<u8>::new(QueueDiscipline::Lifo).discipline(),
        QueueDiscipline::Lifo
    );
}

#[test]
fn test_size_after_concurrent_pushes() {
    let queue = Arc::new(TaskQueue::new(QueueDiscipline::Fifo));
    let handles: Vec<_> = (0..16)
        .map(|t| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..1_000 {
                    queue.push((t, i)).expect("queue closed");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("producer panicked");
    }
    assert_eq!(queue.size(), 16 * 1_000);
}

#[test]
fn test_concurrent_push_pop_conserves_items() {
    let queue = Arc::new(TaskQueue::new(QueueDiscipline::Lifo));
    let producers: Vec<_> = (0..4)
        .map(|t| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..500 {
                    queue.push(t * 500 + i).expect("queue closed");
                }
            })
        })
        .collect();
    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut taken = Vec::new();
                loop {
                    match queue.pop_wait(Duration::from_millis(5)) {
                        Popped::Task(item) => taken.push(item),
                        Popped::Empty => {}
                        Popped::Closed => break taken,
                    }
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().expect("producer panicked");
    }
    queue.close();

    let mut all: Vec<u32> = consumers
        .into_iter()
        .flat_map(|c| c.join().expect("consumer panicked"))
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..2_000).collect::<Vec<_>>());
    assert!(queue.is_empty());
}

#[test]
fn test_pop_wait_returns_closed_on_empty_closed_queue() {
    let queue = TaskQueue::<()>::new(QueueDiscipline::Fifo);
    queue.close();
    assert_eq!(queue.pop_wait(Duration::from_secs(5)), Popped::Closed);
    assert_eq!(queue.pop(), None);
}

//! Tests for the object pool, including use from task handlers

use prometheus_task_pool::config::PoolConfig;
use prometheus_task_pool::core::{ObjectPool, Reset, TaskError, TaskPool};
use std::sync::Arc;

struct Model {
    offset: i64,
    scratch: Vec<i64>,
}

impl Model {
    fn predict(&mut self, x: &[i64]) -> Vec<i64> {
        self.scratch.extend_from_slice(x);
        x.iter().map(|v| v + self.offset).collect()
    }
}

impl Reset for Model {
    fn reset(&mut self) {
        self.scratch.clear();
    }
}

#[test]
fn test_empty_pool_has_nothing_to_lend() {
    let pool = ObjectPool::<Model>::new();
    assert!(pool.checkout().is_none());
    pool.add(Model {
        offset: 1,
        scratch: Vec::new(),
    });
    assert_eq!(pool.free_count(), 1);
}

#[test]
fn test_released_objects_are_reset() {
    let pool = ObjectPool::new();
    pool.add(Model {
        offset: 10,
        scratch: Vec::new(),
    });
    {
        let mut model = pool.checkout().unwrap();
        assert_eq!(model.predict(&[1, 2]), vec![11, 12]);
        assert_eq!(model.scratch.len(), 2);
        assert_eq!(pool.in_use_count(), 1);
    }
    assert!(pool.checkout().unwrap().scratch.is_empty());
}

#[test]
fn test_handlers_share_pooled_models() {
    let models: Arc<ObjectPool<Model>> = Arc::new(
        (0..2)
            .map(|_| Model {
                offset: 100,
                scratch: Vec::new(),
            })
            .collect(),
    );

    let handler_models = Arc::clone(&models);
    let pool = TaskPool::new(
        PoolConfig::new().with_worker_count(2),
        move |x: Vec<i64>| -> Result<Vec<i64>, TaskError> {
            let mut model = handler_models
                .checkout()
                .ok_or_else(|| TaskError::failed("no free model"))?;
            Ok(model.predict(&x))
        },
    )
    .expect("Failed to create pool");

    let futures = pool
        .submit_batch((0..10).map(|i| vec![i, i + 1]))
        .expect("Failed to submit");
    pool.shutdown();

    for (i, fut) in (0..10).zip(&futures) {
        assert_eq!(fut.get(), Some(Ok(vec![100 + i, 101 + i])));
    }
    assert_eq!(models.free_count(), 2);
    assert_eq!(models.in_use_count(), 0);
}

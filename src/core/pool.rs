//! Task pool: a fixed set of workers sharing one task queue.
//!
//! The pool is hot on creation: every worker is started by
//! [`TaskPool::new`]. Submission only takes the queue lock long enough to
//! enqueue, so it never waits for a worker. [`TaskPool::shutdown`] closes
//! the queue, lets the workers drain what was already accepted, and joins
//! every thread; dropping the pool does the same.
//!
//! # Example
//!
//! ```
//! use prometheus_task_pool::config::PoolConfig;
//! use prometheus_task_pool::core::{TaskError, TaskPool};
//!
//! let pool = TaskPool::new(
//!     PoolConfig::new().with_worker_count(2),
//!     |x: i32| -> Result<i32, TaskError> { Ok(x + 1) },
//! )?;
//!
//! let fut = pool.submit(5)?;
//! assert_eq!(fut.wait(), Ok(6));
//!
//! pool.shutdown();
//! # Ok::<(), prometheus_task_pool::core::PoolError>(())
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{PoolConfig, QueueDiscipline};

use super::error::{PoolError, TaskResult};
use super::future::{OutputSlot, TaskFuture};
use super::queue::TaskQueue;
use super::task::{OutputSink, Task, TaskHandler, TaskId};
use super::worker::{Worker, WorkerSettings, WorkerStats};

/// Snapshot of pool utilization. Introspection only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Pool identity used in log fields.
    pub pool_id: Uuid,
    /// Number of worker threads.
    pub worker_count: usize,
    /// Dequeue order in force.
    pub discipline: QueueDiscipline,
    /// Tasks waiting in the queue.
    pub queued_tasks: usize,
    /// Tasks accepted by `submit`/`submit_into`.
    pub submitted_tasks: u64,
    /// Tasks executed, successful or not.
    pub completed_tasks: u64,
    /// Tasks whose handler failed or panicked.
    pub failed_tasks: u64,
    /// Tasks processed by each worker, indexed by worker id.
    pub processed_per_worker: Vec<u64>,
}

/// Fixed-size worker pool over a shared FIFO/LIFO queue.
pub struct TaskPool<I, O, H>
where
    I: Send + 'static,
    O: Send + 'static,
    H: TaskHandler<I, O>,
{
    id: Uuid,
    config: PoolConfig,
    queue: Arc<TaskQueue<Task<I, O>>>,
    workers: Mutex<Vec<Worker<I, O, H>>>,
    worker_stats: Vec<Arc<WorkerStats>>,
    submitted: AtomicU64,
    next_task_id: AtomicU64,
    shutdown: AtomicBool,
}

impl<I, O, H> TaskPool<I, O, H>
where
    I: Send + 'static,
    O: Send + 'static,
    H: TaskHandler<I, O>,
{
    /// Create the pool and start `config.worker_count` workers.
    ///
    /// Each worker gets its own clone of `handler`.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfig`] if the configuration is invalid; no
    ///   thread is spawned
    /// - [`PoolError::Spawn`] if a worker thread cannot be started; workers
    ///   already started are stopped before returning
    pub fn new(config: PoolConfig, handler: H) -> Result<Self, PoolError> {
        config.validate()?;

        let id = Uuid::new_v4();
        let queue = Arc::new(TaskQueue::new(config.discipline));
        let settings = WorkerSettings::from(&config);

        let mut workers: Vec<Worker<I, O, H>> = Vec::with_capacity(config.worker_count);
        for worker_id in 0..config.worker_count {
            let mut worker = Worker::new(
                worker_id,
                Arc::clone(&queue),
                handler.clone(),
                settings.clone(),
            );
            if let Err(e) = worker.start() {
                warn!(pool_id = %id, worker_id, error = %e, "Worker failed to start");
                for started in &mut workers {
                    started.stop();
                }
                return Err(e);
            }
            workers.push(worker);
        }
        let worker_stats = workers.iter().map(Worker::stats).collect();

        info!(
            pool_id = %id,
            worker_count = config.worker_count,
            discipline = ?config.discipline,
            "TaskPool initialized"
        );

        Ok(Self {
            id,
            config,
            queue,
            workers: Mutex::new(workers),
            worker_stats,
            submitted: AtomicU64::new(0),
            next_task_id: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Pool identity.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Configuration the pool was built from.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Submit one input; the returned future resolves when a worker has run it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolShutdown`] once shutdown has begun.
    pub fn submit(&self, input: I) -> Result<TaskFuture<TaskResult<O>>, PoolError> {
        let fut = TaskFuture::new();
        self.enqueue(input, OutputSink::Future(fut.clone()))?;
        Ok(fut)
    }

    /// Submit one input whose outcome is written into a caller-owned slot.
    ///
    /// The caller polls [`OutputSlot::is_filled`]. A slot must be handed to
    /// one task only.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolShutdown`] once shutdown has begun.
    pub fn submit_into(&self, input: I, slot: &OutputSlot<TaskResult<O>>) -> Result<TaskId, PoolError> {
        self.enqueue(input, OutputSink::Slot(slot.writer()))
    }

    /// Submit every input, in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolShutdown`] once shutdown has begun; inputs
    /// accepted before that point still run.
    pub fn submit_batch<T>(&self, inputs: T) -> Result<Vec<TaskFuture<TaskResult<O>>>, PoolError>
    where
        T: IntoIterator<Item = I>,
    {
        inputs.into_iter().map(|input| self.submit(input)).collect()
    }

    fn enqueue(&self, input: I, sink: OutputSink<O>) -> Result<TaskId, PoolError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(PoolError::PoolShutdown);
        }
        let task_id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let task = Task {
            id: task_id,
            input,
            sink,
        };
        if self.queue.push(task).is_err() {
            warn!(pool_id = %self.id, task_id, "Submission rejected, pool is shutting down");
            return Err(PoolError::PoolShutdown);
        }
        self.submitted.fetch_add(1, Ordering::Relaxed);
        debug!(pool_id = %self.id, task_id, "Task submitted");
        Ok(task_id)
    }

    /// Tasks waiting in the queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.size()
    }

    /// Number of workers.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.worker_stats.len()
    }

    /// Tasks processed by each worker, indexed by worker id.
    #[must_use]
    pub fn processed_per_worker(&self) -> Vec<u64> {
        self.worker_stats.iter().map(|s| s.processed()).collect()
    }

    /// Current pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let processed_per_worker = self.processed_per_worker();
        PoolStats {
            pool_id: self.id,
            worker_count: self.worker_count(),
            discipline: self.queue.discipline(),
            queued_tasks: self.queue.size(),
            submitted_tasks: self.submitted.load(Ordering::Relaxed),
            completed_tasks: processed_per_worker.iter().sum(),
            failed_tasks: self.worker_stats.iter().map(|s| s.failed()).sum(),
            processed_per_worker,
        }
    }

    /// Whether shutdown has begun.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Stop accepting work, drain the queue, and join every worker.
    ///
    /// Safe to call more than once and from several threads. Every caller
    /// blocks until the joins are done: when it returns, no worker thread is
    /// alive and every accepted task's output has been delivered.
    pub fn shutdown(&self) {
        let first = !self.shutdown.swap(true, Ordering::AcqRel);
        if first {
            info!(pool_id = %self.id, pending = self.queue.size(), "Shutting down task pool");
        }
        self.queue.close();

        // Joined workers are `Stopped`, so later callers only wait on the lock.
        let mut workers = self.workers.lock();
        for worker in workers.iter_mut() {
            worker.finish();
        }
        if first {
            info!(
                pool_id = %self.id,
                processed = ?self.processed_per_worker(),
                "Task pool shut down complete"
            );
        }
    }
}

impl<I, O, H> Drop for TaskPool<I, O, H>
where
    I: Send + 'static,
    O: Send + 'static,
    H: TaskHandler<I, O>,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}

//! Worker: one OS thread pulling tasks from a shared queue.
//!
//! Lifecycle is `Idle → Running → Stopping → Stopped`. Stopping is
//! cooperative: the stop flag is checked at the top of every loop iteration,
//! so an in-flight task always finishes first. A stopped worker may be
//! started again.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::PoolConfig;

use super::error::PoolError;
use super::queue::{Popped, TaskQueue};
use super::task::{Task, TaskHandler};

/// Index of a worker within its pool.
pub type WorkerId = usize;

/// Lifecycle state of a [`Worker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, thread not spawned yet.
    Idle,
    /// Thread spawned and serving the queue.
    Running,
    /// Stop requested, waiting for the thread to exit.
    Stopping,
    /// Thread joined.
    Stopped,
}

/// Per-worker counters, shared with the worker thread.
#[derive(Debug, Default)]
pub struct WorkerStats {
    processed: AtomicU64,
    failed: AtomicU64,
}

impl WorkerStats {
    /// Tasks taken off the queue and executed, successful or not.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Tasks whose handler returned an error or panicked.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Thread settings shared by every worker of a pool.
#[derive(Debug, Clone)]
pub(crate) struct WorkerSettings {
    pub thread_name_prefix: String,
    pub thread_stack_size: usize,
    pub idle_backoff: Duration,
}

impl From<&PoolConfig> for WorkerSettings {
    fn from(config: &PoolConfig) -> Self {
        Self {
            thread_name_prefix: config.thread_name_prefix.clone(),
            thread_stack_size: config.thread_stack_size,
            idle_backoff: config.idle_backoff(),
        }
    }
}

/// A unit of execution bound to one thread.
pub struct Worker<I, O, H> {
    id: WorkerId,
    queue: Arc<TaskQueue<Task<I, O>>>,
    handler: H,
    settings: WorkerSettings,
    state: WorkerState,
    stop: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
    thread: Option<JoinHandle<()>>,
}

impl<I, O, H> Worker<I, O, H>
where
    I: Send + 'static,
    O: Send + 'static,
    H: TaskHandler<I, O>,
{
    pub(crate) fn new(
        id: WorkerId,
        queue: Arc<TaskQueue<Task<I, O>>>,
        handler: H,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            id,
            queue,
            handler,
            settings,
            state: WorkerState::Idle,
            stop: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(WorkerStats::default()),
            thread: None,
        }
    }

    /// Worker identity within its pool.
    #[must_use]
    pub const fn id(&self) -> WorkerId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> WorkerState {
        self.state
    }

    /// Tasks processed so far.
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.stats.processed()
    }

    /// Shared handle to this worker's counters.
    #[must_use]
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Spawn the worker thread.
    ///
    /// # Errors
    ///
    /// - [`PoolError::AlreadyRunning`] if the worker is running
    /// - [`PoolError::Spawn`] if the OS refuses the thread
    pub fn start(&mut self) -> Result<(), PoolError> {
        if matches!(self.state, WorkerState::Running | WorkerState::Stopping) {
            return Err(PoolError::AlreadyRunning);
        }
        self.stop.store(false, Ordering::Release);

        let worker_loop = WorkerLoop {
            id: self.id,
            queue: Arc::clone(&self.queue),
            handler: self.handler.clone(),
            stop: Arc::clone(&self.stop),
            stats: Arc::clone(&self.stats),
            idle_backoff: self.settings.idle_backoff,
        };
        let handle = thread::Builder::new()
            .name(format!("{}-{}", self.settings.thread_name_prefix, self.id))
            .stack_size(self.settings.thread_stack_size)
            .spawn(move || worker_loop.run())
            .map_err(|e| PoolError::Spawn(e.to_string()))?;

        self.thread = Some(handle);
        self.state = WorkerState::Running;
        debug!(worker_id = self.id, "Worker started");
        Ok(())
    }

    /// Request a stop and join the thread. No-op unless running.
    ///
    /// Tasks still queued are left for other workers.
    pub fn stop(&mut self) {
        if self.state != WorkerState::Running {
            return;
        }
        self.state = WorkerState::Stopping;
        self.stop.store(true, Ordering::Release);
        self.queue.wake_all();
        self.join();
    }

    /// Join a worker whose queue has been closed; it exits once the queue
    /// is drained.
    pub(crate) fn finish(&mut self) {
        if self.state != WorkerState::Running {
            return;
        }
        self.state = WorkerState::Stopping;
        self.join();
    }

    fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!(worker_id = self.id, "Worker thread panicked");
            }
        }
        self.state = WorkerState::Stopped;
        debug!(
            worker_id = self.id,
            processed = self.stats.processed(),
            "Worker stopped"
        );
    }
}

impl<I, O, H> Drop for Worker<I, O, H> {
    fn drop(&mut self) {
        // Never leave a thread touching a queue whose owner is gone.
        if let Some(handle) = self.thread.take() {
            self.stop.store(true, Ordering::Release);
            self.queue.wake_all();
            let _ = handle.join();
        }
    }
}

/// State moved onto the worker thread.
struct WorkerLoop<I, O, H> {
    id: WorkerId,
    queue: Arc<TaskQueue<Task<I, O>>>,
    handler: H,
    stop: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
    idle_backoff: Duration,
}

impl<I, O, H: TaskHandler<I, O>> WorkerLoop<I, O, H> {
    fn run(self) {
        info!(worker_id = self.id, "Worker loop entered");
        loop {
            if self.stop.load(Ordering::Acquire) {
                debug!(worker_id = self.id, "Stop flag observed");
                break;
            }
            match self.queue.pop_wait(self.idle_backoff) {
                Popped::Task(task) => self.execute(task),
                Popped::Empty => {}
                Popped::Closed => {
                    debug!(worker_id = self.id, "Queue closed and drained");
                    break;
                }
            }
        }
        info!(
            worker_id = self.id,
            processed = self.stats.processed(),
            "Worker loop exited"
        );
    }

    // The queue lock is not held here.
    fn execute(&self, task: Task<I, O>) {
        let task_id = task.id;
        debug!(worker_id = self.id, task_id, "Worker executing task");
        match task.run(&self.handler) {
            Ok(true) => {}
            Ok(false) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                debug!(worker_id = self.id, task_id, "Task failed");
            }
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                error!(worker_id = self.id, task_id, error = %e, "Could not deliver task result");
            }
        }
        self.stats.processed.fetch_add(1, Ordering::Relaxed);
    }
}

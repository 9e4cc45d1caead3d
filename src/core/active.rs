//! Active object: a servant living on its own thread, reached through a proxy.
//!
//! Invocation and execution are decoupled. [`ActiveProxy::call`] enqueues a
//! request on the activation queue and hands back a [`TaskFuture`]; the
//! single servant thread serves requests in queue order. The proxy only
//! touches the queue lock to enqueue.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::PoolConfig;

use super::error::{PoolError, TaskResult};
use super::future::TaskFuture;
use super::queue::TaskQueue;
use super::task::{OutputSink, Task, TaskHandler};
use super::worker::{Worker, WorkerSettings, WorkerState};

const DEFAULT_THREAD_PREFIX: &str = "active-object";

/// Servant hosted on a dedicated thread.
///
/// Dropping the object closes the activation queue and serves every request
/// already accepted before joining the servant thread.
pub struct ActiveObject<I, O, S>
where
    I: Send + 'static,
    O: Send + 'static,
    S: TaskHandler<I, O>,
{
    queue: Arc<TaskQueue<Task<I, O>>>,
    worker: Worker<I, O, S>,
    next_request_id: Arc<AtomicU64>,
}

impl<I, O, S> ActiveObject<I, O, S>
where
    I: Send + 'static,
    O: Send + 'static,
    S: TaskHandler<I, O>,
{
    /// Host `servant` with default settings and a FIFO activation queue.
    /// The servant thread is not started yet.
    #[must_use]
    pub fn new(servant: S) -> Self {
        Self::build(
            servant,
            &PoolConfig::new().with_thread_name_prefix(DEFAULT_THREAD_PREFIX),
        )
    }

    /// Host `servant` using the discipline and thread settings of `config`.
    ///
    /// `worker_count` is ignored: an active object always has one thread.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the configuration is invalid.
    pub fn with_config(servant: S, config: &PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self::build(servant, config))
    }

    fn build(servant: S, config: &PoolConfig) -> Self {
        let queue = Arc::new(TaskQueue::new(config.discipline));
        let worker = Worker::new(0, Arc::clone(&queue), servant, WorkerSettings::from(config));
        Self {
            queue,
            worker,
            next_request_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Start the servant thread.
    ///
    /// # Errors
    ///
    /// - [`PoolError::AlreadyRunning`] if already started
    /// - [`PoolError::Spawn`] if the thread cannot be created
    pub fn start(&mut self) -> Result<(), PoolError> {
        self.worker.start()
    }

    /// Stop the servant thread after its current request and join it.
    /// Queued requests stay queued until the next `start`.
    pub fn stop(&mut self) {
        self.worker.stop();
    }

    /// Whether the servant thread is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.state() == WorkerState::Running
    }

    /// A proxy for submitting requests. Proxies may be cloned and sent to
    /// other threads.
    #[must_use]
    pub fn proxy(&self) -> ActiveProxy<I, O> {
        ActiveProxy {
            queue: Arc::clone(&self.queue),
            next_request_id: Arc::clone(&self.next_request_id),
        }
    }

    /// Requests waiting for the servant.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.size()
    }

    /// Requests served so far.
    #[must_use]
    pub fn processed(&self) -> u64 {
        self.worker.processed()
    }
}

impl<I, O, S> Drop for ActiveObject<I, O, S>
where
    I: Send + 'static,
    O: Send + 'static,
    S: TaskHandler<I, O>,
{
    fn drop(&mut self) {
        // Outstanding proxies get `PoolShutdown` from now on.
        self.queue.close();
        if !self.is_running() && !self.queue.is_empty() {
            // Accepted requests are served even if the servant was stopped.
            if let Err(e) = self.worker.start() {
                warn!(pending = self.queue.size(), error = %e, "Could not drain active object");
                return;
            }
        }
        self.worker.finish();
    }
}

/// Client-side handle to an [`ActiveObject`].
pub struct ActiveProxy<I, O> {
    queue: Arc<TaskQueue<Task<I, O>>>,
    next_request_id: Arc<AtomicU64>,
}

impl<I, O> ActiveProxy<I, O> {
    /// Enqueue a request; the future resolves once the servant has run it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolShutdown`] if the active object is gone.
    pub fn call(&self, input: I) -> Result<TaskFuture<TaskResult<O>>, PoolError> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed) + 1;
        let fut = TaskFuture::new();
        let task = Task {
            id: request_id,
            input,
            sink: OutputSink::Future(fut.clone()),
        };
        self.queue
            .push(task)
            .map_err(|_| PoolError::PoolShutdown)?;
        debug!(task_id = request_id, "Request queued for active object");
        Ok(fut)
    }
}

impl<I, O> Clone for ActiveProxy<I, O> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
            next_request_id: Arc::clone(&self.next_request_id),
        }
    }
}

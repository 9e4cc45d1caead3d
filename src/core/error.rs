//! Error types for pool, worker and future operations.

use thiserror::Error;

/// Errors produced by the task pool and its components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// `start()` was called on a worker or active object that is already running.
    #[error("worker already running")]
    AlreadyRunning,
    /// A future or output slot was resolved a second time.
    #[error("result already resolved")]
    AlreadyResolved,
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The pool (or its queue) has been shut down and accepts no more work.
    #[error("pool has been shut down")]
    PoolShutdown,
    /// A blocking wait elapsed before the result became available.
    #[error("operation timed out")]
    Timeout,
    /// The operating system refused to spawn a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),
}

/// Failure of a single task body, delivered through its output sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The handler returned an error.
    #[error("task failed: {0}")]
    Failed(String),
    /// The handler panicked; the worker survived.
    #[error("task panicked: {0}")]
    Panicked(String),
}

impl TaskError {
    /// Convenience constructor for handler failures.
    pub fn failed<S: Into<String>>(msg: S) -> Self {
        Self::Failed(msg.into())
    }
}

/// Outcome of one task as seen by the submitter.
pub type TaskResult<O> = Result<O, TaskError>;

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

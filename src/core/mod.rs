//! Concurrent task queue, workers, pool and result delivery.

pub mod active;
pub mod error;
pub mod future;
pub mod object_pool;
pub mod pool;
pub mod queue;
pub mod task;
pub mod worker;

pub use active::{ActiveObject, ActiveProxy};
pub use error::{AppResult, PoolError, TaskError, TaskResult};
pub use future::{OutputSlot, TaskFuture};
pub use object_pool::{ObjectPool, Pooled, Reset};
pub use pool::{PoolStats, TaskPool};
pub use queue::{Popped, TaskQueue};
pub use task::{TaskHandler, TaskId};
pub use worker::{Worker, WorkerId, WorkerState, WorkerStats};

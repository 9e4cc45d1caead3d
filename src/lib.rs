//! # Prometheus Task Pool
//!
//! A bounded concurrent task queue with a worker pool and future-based result
//! delivery.
//!
//! Work is submitted by clients, queued under a single mutex, picked up by a
//! fixed set of dedicated OS threads, executed outside the lock, and handed
//! back through a single-assignment [`TaskFuture`](core::TaskFuture) or a
//! caller-owned [`OutputSlot`](core::OutputSlot).
//!
//! ## Key Features
//!
//! - **Hot pool**: every worker is started when the pool is created
//! - **FIFO or LIFO**: queue discipline is configuration, not an assumption
//! - **No busy polling**: idle workers park on a condition variable, bounded
//!   so that stop requests are observed promptly
//! - **Failure capture**: handler errors and panics land in the future as
//!   [`TaskError`](core::TaskError); worker threads survive them
//! - **Graceful shutdown**: accepted work is drained and every thread joined
//! - **Active object**: a single servant thread behind a cloneable proxy
//!
//! ## TaskPool
//!
//! ```rust
//! use prometheus_task_pool::config::{PoolConfig, QueueDiscipline};
//! use prometheus_task_pool::core::{TaskError, TaskPool};
//!
//! let pool = TaskPool::new(
//!     PoolConfig::new()
//!         .with_worker_count(4)
//!         .with_discipline(QueueDiscipline::Fifo),
//!     |item_id: u32| -> Result<f64, TaskError> { Ok(f64::from(item_id) / 2.0) },
//! )?;
//!
//! let costs = pool.submit_batch(1..=20)?;
//! pool.shutdown();
//!
//! assert!(costs.iter().all(|c| c.is_available()));
//! assert_eq!(pool.stats().completed_tasks, 20);
//! # Ok::<(), prometheus_task_pool::core::PoolError>(())
//! ```
//!
//! ## ActiveObject
//!
//! ```rust
//! use prometheus_task_pool::core::{ActiveObject, TaskError};
//!
//! let mut model = ActiveObject::new(|x: Vec<f64>| -> Result<Vec<f64>, TaskError> {
//!     Ok(x.iter().map(|v| v * 2.0).collect())
//! });
//! model.start()?;
//!
//! let prediction = model.proxy().call(vec![1.0, 2.0])?;
//! assert_eq!(prediction.wait(), Ok(vec![2.0, 4.0]));
//! model.stop();
//! # Ok::<(), prometheus_task_pool::core::PoolError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Task queue, workers, pools, futures and errors.
pub mod core;
/// Configuration models for pools and queues.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Shared utilities.
pub mod util;

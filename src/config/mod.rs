//! Configuration models for pools and their queues.

pub mod pool;

pub use pool::{PoolConfig, QueueDiscipline, SchedulerConfig};

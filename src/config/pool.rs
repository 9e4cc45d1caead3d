//! Pool and scheduler configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, PoolError};

/// Smallest stack a worker thread may be given.
const MIN_STACK_SIZE: usize = 64 * 1024;

/// Order in which queued tasks are handed to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueDiscipline {
    /// First submitted, first served.
    #[default]
    Fifo,
    /// Most recently submitted served first.
    Lifo,
}

impl std::str::FromStr for QueueDiscipline {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(Self::Fifo),
            "lifo" => Ok(Self::Lifo),
            other => Err(PoolError::InvalidConfig(format!(
                "unknown queue discipline `{other}`"
            ))),
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker threads; must be at least 1.
    pub worker_count: usize,
    /// Dequeue order.
    pub discipline: QueueDiscipline,
    /// Upper bound on one idle wait before a worker re-checks its stop flag.
    pub idle_backoff_ms: u64,
    /// Worker thread name prefix; threads are named `{prefix}-{id}`.
    pub thread_name_prefix: String,
    /// Stack size for each worker thread in bytes.
    pub thread_stack_size: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
            discipline: QueueDiscipline::Fifo,
            idle_backoff_ms: 50,
            thread_name_prefix: "task-worker".to_string(),
            thread_stack_size: 2 * 1024 * 1024,
        }
    }
}

impl PoolConfig {
    /// Default configuration (one worker per logical CPU, FIFO).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker count.
    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the queue discipline.
    #[must_use]
    pub const fn with_discipline(mut self, discipline: QueueDiscipline) -> Self {
        self.discipline = discipline;
        self
    }

    /// Set the idle backoff in milliseconds.
    #[must_use]
    pub const fn with_idle_backoff_ms(mut self, idle_backoff_ms: u64) -> Self {
        self.idle_backoff_ms = idle_backoff_ms;
        self
    }

    /// Set the worker thread name prefix.
    #[must_use]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the worker thread stack size.
    #[must_use]
    pub const fn with_thread_stack_size(mut self, bytes: usize) -> Self {
        self.thread_stack_size = bytes;
        self
    }

    /// Idle backoff as a `Duration`.
    #[must_use]
    pub const fn idle_backoff(&self) -> Duration {
        Duration::from_millis(self.idle_backoff_ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.worker_count == 0 {
            return Err(PoolError::InvalidConfig(
                "worker_count must be at least 1".into(),
            ));
        }
        if self.idle_backoff_ms == 0 {
            return Err(PoolError::InvalidConfig(
                "idle_backoff_ms must be greater than 0".into(),
            ));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(PoolError::InvalidConfig(
                "thread_name_prefix must not be empty".into(),
            ));
        }
        if self.thread_stack_size < MIN_STACK_SIZE {
            return Err(PoolError::InvalidConfig(format!(
                "thread_stack_size must be at least {MIN_STACK_SIZE} bytes"
            )));
        }
        Ok(())
    }

    /// Parse a pool configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, PoolError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| PoolError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build a configuration from `TASK_POOL_*` environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Recognized variables: `TASK_POOL_WORKERS`, `TASK_POOL_DISCIPLINE`,
    /// `TASK_POOL_IDLE_BACKOFF_MS`, `TASK_POOL_THREAD_PREFIX`. Unset
    /// variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails if a variable cannot be parsed or the result does not validate.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup("TASK_POOL_WORKERS") {
            cfg.worker_count = raw
                .trim()
                .parse()
                .with_context(|| format!("TASK_POOL_WORKERS=`{raw}` is not a count"))?;
        }
        if let Some(raw) = lookup("TASK_POOL_DISCIPLINE") {
            cfg.discipline = raw.parse()?;
        }
        if let Some(raw) = lookup("TASK_POOL_IDLE_BACKOFF_MS") {
            cfg.idle_backoff_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("TASK_POOL_IDLE_BACKOFF_MS=`{raw}` is not a number"))?;
        }
        if let Some(raw) = lookup("TASK_POOL_THREAD_PREFIX") {
            cfg.thread_name_prefix = raw;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Root configuration for several named pools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of pool name to configuration.
    pub pools: HashMap<String, PoolConfig>,
}

impl SchedulerConfig {
    /// Validate all pools and ensure at least one pool exists.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] naming the offending pool.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.pools.is_empty() {
            return Err(PoolError::InvalidConfig(
                "at least one pool must be defined".into(),
            ));
        }
        for (name, pool) in &self.pools {
            pool.validate().map_err(|e| {
                PoolError::InvalidConfig(format!("pool `{name}` invalid: {e}"))
            })?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] on parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, PoolError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| PoolError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

//! Single-assignment result cells.
//!
//! [`TaskFuture`] is the async-path output sink: shared between the submitter
//! and the worker that owns the task, resolved exactly once, readable by any
//! number of threads afterwards. Waiting uses a `parking_lot::Condvar`, so a
//! blocked reader costs no CPU; pollers can still spin on
//! [`TaskFuture::is_available`].
//!
//! [`OutputSlot`] is the polling-path sink: a caller-owned cell that a worker
//! writes in place and the caller polls with [`OutputSlot::is_filled`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::error::PoolError;

struct FutureInner<T> {
    value: Mutex<Option<T>>,
    ready: Condvar,
}

/// Single-assignment, observable result cell.
///
/// Cloning a `TaskFuture` yields another handle to the same cell.
pub struct TaskFuture<T> {
    inner: Arc<FutureInner<T>>,
}

impl<T> TaskFuture<T> {
    /// Create an unavailable future.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(FutureInner {
                value: Mutex::new(None),
                ready: Condvar::new(),
            }),
        }
    }

    /// Resolve the future and wake every blocked waiter.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AlreadyResolved`] if the future already holds a value;
    /// the stored value is left untouched.
    pub fn make_available(&self, value: T) -> Result<(), PoolError> {
        let mut slot = self.inner.value.lock();
        if slot.is_some() {
            return Err(PoolError::AlreadyResolved);
        }
        *slot = Some(value);
        drop(slot);
        self.inner.ready.notify_all();
        Ok(())
    }

    /// Non-blocking availability check.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.inner.value.lock().is_some()
    }

    /// Number of live handles to this cell (submitter, queue entry, clones).
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T: Clone> TaskFuture<T> {
    /// The held value, or `None` while the future is unavailable.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.inner.value.lock().clone()
    }

    /// Block until the future is resolved.
    pub fn wait(&self) -> T {
        let mut slot = self.inner.value.lock();
        self.inner.ready.wait_while(&mut slot, |v| v.is_none());
        slot.clone().unwrap_or_else(|| unreachable!("woken without a value"))
    }

    /// Block until the future is resolved or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Timeout`] if no value arrived in time.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<T, PoolError> {
        let mut slot = self.inner.value.lock();
        self.inner
            .ready
            .wait_while_for(&mut slot, |v| v.is_none(), timeout);
        slot.clone().ok_or(PoolError::Timeout)
    }
}

#[cfg(feature = "tokio-runtime")]
impl<T: Clone + Send + 'static> TaskFuture<T> {
    /// Wait for the value from async code without blocking the runtime.
    ///
    /// The condvar wait runs on tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Timeout`] if no value arrived in time.
    pub async fn wait_async(&self, timeout: Duration) -> Result<T, PoolError> {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        let handle = self.clone();
        let waited = tokio::time::timeout(
            timeout,
            tokio::task::spawn_blocking(move || handle.wait_timeout(timeout)),
        )
        .await;
        match waited {
            Ok(Ok(result)) => result,
            Ok(Err(_)) | Err(_) => Err(PoolError::Timeout),
        }
    }
}

impl<T> Clone for TaskFuture<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for TaskFuture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TaskFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFuture")
            .field("available", &self.is_available())
            .finish()
    }
}

/// Caller-owned output cell written in place by exactly one task.
pub struct OutputSlot<T> {
    cell: Arc<Mutex<Option<T>>>,
}

impl<T> OutputSlot<T> {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: Arc::new(Mutex::new(None)),
        }
    }

    /// Write the slot.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AlreadyResolved`] if the slot was already written.
    pub fn fill(&self, value: T) -> Result<(), PoolError> {
        let mut cell = self.cell.lock();
        if cell.is_some() {
            return Err(PoolError::AlreadyResolved);
        }
        *cell = Some(value);
        Ok(())
    }

    /// Whether a worker has written the slot.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cell.lock().is_some()
    }

    /// Move the value out, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        self.cell.lock().take()
    }

    /// Handle for the worker side; shares the same cell.
    pub(crate) fn writer(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Clone> OutputSlot<T> {
    /// Copy of the value, if written.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.cell.lock().clone()
    }
}

impl<T> Default for OutputSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for OutputSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSlot")
            .field("filled", &self.is_filled())
            .finish()
    }
}

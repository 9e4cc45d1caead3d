//! Shared task queue guarded by a single mutex.
//!
//! The queue is the only structure mutated by more than one thread. Every
//! access takes the one `parking_lot::Mutex`; the lock is held only for the
//! push/pop/size bookkeeping, never while a task runs. Idle workers park on
//! a `Condvar` that `push` signals, with a bounded timeout so that a worker
//! still observes its stop flag periodically.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::config::QueueDiscipline;

/// Result of a waiting pop.
#[derive(Debug, PartialEq, Eq)]
pub enum Popped<T> {
    /// An item was removed.
    Task(T),
    /// Nothing arrived within the wait bound; the queue is still open.
    Empty,
    /// The queue is closed and fully drained.
    Closed,
}

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Thread-safe FIFO/LIFO queue of pending work.
pub struct TaskQueue<T> {
    discipline: QueueDiscipline,
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

impl<T> TaskQueue<T> {
    /// Create an empty, open queue with the given discipline.
    #[must_use]
    pub fn new(discipline: QueueDiscipline) -> Self {
        Self {
            discipline,
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Discipline in force for this queue.
    #[must_use]
    pub const fn discipline(&self) -> QueueDiscipline {
        self.discipline
    }

    /// Append an item at the tail and wake one idle worker.
    ///
    /// # Errors
    ///
    /// Hands the item back if the queue has been closed.
    pub fn push(&self, item: T) -> Result<(), T> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(item);
        }
        state.items.push_back(item);
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// Remove one item according to the discipline; `None` when empty.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        self.take(&mut state)
    }

    /// Pop, parking for at most `timeout` while the queue is empty and open.
    pub fn pop_wait(&self, timeout: Duration) -> Popped<T> {
        let mut state = self.state.lock();
        if state.items.is_empty() && !state.closed {
            self.available
                .wait_while_for(&mut state, |s| s.items.is_empty() && !s.closed, timeout);
        }
        match self.take(&mut state) {
            Some(item) => Popped::Task(item),
            None if state.closed => Popped::Closed,
            None => Popped::Empty,
        }
    }

    /// Current number of queued items.
    #[must_use]
    pub fn size(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Whether the queue holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Reject further pushes and wake every waiter. Queued items stay poppable.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_all();
    }

    /// Whether [`TaskQueue::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Wake every parked waiter without changing the queue.
    pub fn wake_all(&self) {
        self.available.notify_all();
    }

    fn take(&self, state: &mut QueueState<T>) -> Option<T> {
        match self.discipline {
            QueueDiscipline::Fifo => state.items.pop_front(),
            QueueDiscipline::Lifo => state.items.pop_back(),
        }
    }
}

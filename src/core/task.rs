//! Task bodies, queue entries and output sinks.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::error::{PoolError, TaskError, TaskResult};
use super::future::{OutputSlot, TaskFuture};

/// Pool-scoped task identifier.
pub type TaskId = u64;

/// Capability to turn one input into one output.
///
/// Each worker owns its own clone of the handler, so per-handler state is
/// never shared between threads unless the implementor chooses to.
///
/// Any `Fn(I) -> Result<O, TaskError>` closure that is `Clone + Send + Sync`
/// implements this trait.
///
/// # Example
///
/// ```
/// use prometheus_task_pool::core::{TaskError, TaskHandler};
///
/// #[derive(Clone)]
/// struct CostEstimator;
///
/// impl TaskHandler<u32, f64> for CostEstimator {
///     fn handle(&self, item_id: u32) -> Result<f64, TaskError> {
///         Ok(f64::from(item_id) / 2.0)
///     }
/// }
///
/// assert_eq!(CostEstimator.handle(3), Ok(1.5));
/// ```
pub trait TaskHandler<I, O>: Send + Sync + Clone + 'static {
    /// Run the task body.
    ///
    /// # Errors
    ///
    /// Domain failures are returned as [`TaskError`] and delivered to the
    /// submitter through the task's output sink.
    fn handle(&self, input: I) -> Result<O, TaskError>;
}

impl<I, O, F> TaskHandler<I, O> for F
where
    F: Fn(I) -> Result<O, TaskError> + Send + Sync + Clone + 'static,
{
    fn handle(&self, input: I) -> Result<O, TaskError> {
        self(input)
    }
}

/// Destination of a task's outcome.
pub(crate) enum OutputSink<O> {
    /// Async path: resolved future shared with the submitter.
    Future(TaskFuture<TaskResult<O>>),
    /// Polling path: caller-owned slot written in place.
    Slot(OutputSlot<TaskResult<O>>),
}

impl<O> OutputSink<O> {
    fn resolve(&self, outcome: TaskResult<O>) -> Result<(), PoolError> {
        match self {
            Self::Future(fut) => fut.make_available(outcome),
            Self::Slot(slot) => slot.fill(outcome),
        }
    }
}

/// One queued unit of work: input payload plus output sink.
pub(crate) struct Task<I, O> {
    pub id: TaskId,
    pub input: I,
    pub sink: OutputSink<O>,
}

impl<I, O> Task<I, O> {
    /// Run the handler on the input and resolve the sink.
    ///
    /// Panics in the handler are caught and delivered as
    /// [`TaskError::Panicked`]. Returns whether the task succeeded.
    pub fn run<H: TaskHandler<I, O>>(self, handler: &H) -> Result<bool, PoolError> {
        let Self { input, sink, .. } = self;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(input)))
            .unwrap_or_else(|payload| Err(TaskError::Panicked(panic_message(payload.as_ref()))));
        let ok = outcome.is_ok();
        sink.resolve(outcome)?;
        Ok(ok)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

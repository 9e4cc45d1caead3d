//! Tracing setup for binaries and tests embedding the pool.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: pool lifecycle events only.
pub const DEFAULT_LOG_FILTER: &str = "prometheus_task_pool=info";

/// Install an fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_LOG_FILTER`].
///
/// Does nothing if a global subscriber is already installed, so it is safe
/// to call from every test. Thread names are printed because worker threads
/// are named `{prefix}-{id}`.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_FILTER);
}

/// Like [`init_tracing`] with a caller-chosen fallback filter directive.
pub fn init_tracing_with(default_filter: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .try_init();
}

//! Tests for error types

use prometheus_task_pool::core::{PoolError, TaskError};

#[test]
fn test_already_running_error() {
    assert_eq!(format!("{}", PoolError::AlreadyRunning), "worker already running");
}

#[test]
fn test_already_resolved_error() {
    assert_eq!(format!("{}", PoolError::AlreadyResolved), "result already resolved");
}

#[test]
fn test_invalid_config_error() {
    let err = PoolError::InvalidConfig("worker_count must be at least 1".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: worker_count must be at least 1"
    );
}

#[test]
fn test_shutdown_and_spawn_errors() {
    assert_eq!(format!("{}", PoolError::PoolShutdown), "pool has been shut down");
    assert_eq!(
        format!("{}", PoolError::Spawn("resource unavailable".to_string())),
        "failed to spawn worker thread: resource unavailable"
    );
}

#[test]
fn test_task_error_converts_to_anyhow() {
    let err: anyhow::Error = TaskError::failed("estimator offline").into();
    assert_eq!(err.to_string(), "task failed: estimator offline");
}

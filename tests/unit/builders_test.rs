//! Tests for pool builders

use prometheus_task_pool::builders::build_pools;
use prometheus_task_pool::config::SchedulerConfig;
use prometheus_task_pool::core::{PoolError, TaskError};

fn scale(factor: u64) -> impl Fn(u64) -> Result<u64, TaskError> + Clone + Send + Sync + 'static {
    move |x| Ok(x * factor)
}

#[test]
fn test_build_pools_from_config() {
    let cfg = SchedulerConfig::from_json_str(
        r#"{ "pools": {
            "double": { "worker_count": 2 },
            "triple": { "worker_count": 1, "discipline": "lifo" }
        } }"#,
    )
    .expect("valid config");

    let pools = build_pools(&cfg, |name, _| Ok(scale(if name == "double" { 2 } else { 3 })))
        .expect("pools built");
    assert_eq!(pools.len(), 2);

    let doubled = pools["double"].submit(21).unwrap();
    let tripled = pools["triple"].submit(5).unwrap();
    assert_eq!(doubled.wait(), Ok(42));
    assert_eq!(tripled.wait(), Ok(15));
    assert_eq!(pools["double"].worker_count(), 2);
}

#[test]
fn test_build_pools_propagates_factory_error() {
    let cfg = SchedulerConfig::from_json_str(r#"{ "pools": { "only": { "worker_count": 1 } } }"#)
        .expect("valid config");

    let result = build_pools(&cfg, |name, _| -> Result<fn(u64) -> Result<u64, TaskError>, PoolError> {
        Err(PoolError::InvalidConfig(format!("no handler for `{name}`")))
    });
    assert!(matches!(result, Err(PoolError::InvalidConfig(msg)) if msg.contains("only")));
}

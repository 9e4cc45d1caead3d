//! Tests for configuration validation

use prometheus_task_pool::config::{PoolConfig, QueueDiscipline, SchedulerConfig};
use prometheus_task_pool::core::PoolError;

#[test]
fn test_pool_config_defaults() {
    let cfg = PoolConfig::default();
    assert!(cfg.worker_count >= 1);
    assert_eq!(cfg.discipline, QueueDiscipline::Fifo);
    assert_eq!(cfg.thread_name_prefix, "task-worker");
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_pool_config_invalid_worker_count() {
    let invalid = PoolConfig::new().with_worker_count(0);
    assert!(matches!(invalid.validate(), Err(PoolError::InvalidConfig(_))));
}

#[test]
fn test_pool_config_invalid_backoff() {
    let invalid = PoolConfig::new().with_idle_backoff_ms(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_invalid_stack_size() {
    let invalid = PoolConfig::new().with_thread_stack_size(1024);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_invalid_prefix() {
    let invalid = PoolConfig::new().with_thread_name_prefix("");
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_from_json() {
    let json = r#"{
        "worker_count": 4,
        "discipline": "lifo",
        "idle_backoff_ms": 300
    }"#;

    let cfg = PoolConfig::from_json_str(json).expect("valid config");
    assert_eq!(cfg.worker_count, 4);
    assert_eq!(cfg.discipline, QueueDiscipline::Lifo);
    assert_eq!(cfg.idle_backoff().as_millis(), 300);
    assert_eq!(cfg.thread_name_prefix, "task-worker");
}

#[test]
fn test_pool_config_from_json_rejects_zero_workers() {
    let result = PoolConfig::from_json_str(r#"{ "worker_count": 0 }"#);
    assert!(matches!(result, Err(PoolError::InvalidConfig(_))));
}

#[test]
fn test_discipline_parsing() {
    assert_eq!("FIFO".parse::<QueueDiscipline>(), Ok(QueueDiscipline::Fifo));
    assert_eq!(" lifo ".parse::<QueueDiscipline>(), Ok(QueueDiscipline::Lifo));
    assert!("stack".parse::<QueueDiscipline>().is_err());
}

#[test]
fn test_scheduler_config_empty_pools() {
    let config = SchedulerConfig {
        pools: std::collections::HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "pools": {
            "estimators": { "worker_count": 4, "discipline": "lifo" },
            "predictions": { "worker_count": 1 }
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).expect("valid config");
    assert_eq!(config.pools.len(), 2);
    assert_eq!(config.pools["estimators"].discipline, QueueDiscipline::Lifo);
    assert_eq!(config.pools["predictions"].discipline, QueueDiscipline::Fifo);
}

#[test]
fn test_scheduler_config_names_bad_pool() {
    let json = r#"{ "pools": { "broken": { "worker_count": 0 } } }"#;
    let err = SchedulerConfig::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("pool `broken` invalid"));
}

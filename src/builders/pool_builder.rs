//! Builders to construct task pools from configuration.

use std::collections::HashMap;

use tracing::info;

use crate::config::{PoolConfig, SchedulerConfig};
use crate::core::{PoolError, TaskHandler, TaskPool};

/// Build one started [`TaskPool`] per configured pool.
///
/// `handler_factory` is called once per pool with its name and config.
/// If any pool fails to build, pools built so far are shut down (on drop)
/// and the error is returned.
///
/// # Errors
///
/// - [`PoolError::InvalidConfig`] if the scheduler configuration is invalid
/// - any error returned by the factory or by [`TaskPool::new`]
pub fn build_pools<I, O, H, F>(
    cfg: &SchedulerConfig,
    mut handler_factory: F,
) -> Result<HashMap<String, TaskPool<I, O, H>>, PoolError>
where
    I: Send + 'static,
    O: Send + 'static,
    H: TaskHandler<I, O>,
    F: FnMut(&str, &PoolConfig) -> Result<H, PoolError>,
{
    cfg.validate()?;

    let mut pools = HashMap::with_capacity(cfg.pools.len());
    for (name, pool_cfg) in &cfg.pools {
        let handler = handler_factory(name, pool_cfg)?;
        let pool = TaskPool::new(pool_cfg.clone(), handler)?;
        info!(pool = %name, pool_id = %pool.id(), "Built task pool");
        pools.insert(name.clone(), pool);
    }

    Ok(pools)
}

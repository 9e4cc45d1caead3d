//! Builders to construct task pools from configuration.

pub mod pool_builder;

pub use pool_builder::build_pools;

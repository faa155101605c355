//! Declarative configuration for the exchange and its pools.
//!
//! [`DexConfig`] is deserialized (all fields optional) and validated once
//! when the exchange is built.  The registry turns it into one
//! [`PoolConfig`] per created pool.

mod dex_config;
mod pool_config;

pub use dex_config::{
    DexConfig, ShareTokenConfig, DEFAULT_CHAIN_ID, DEFAULT_MINIMUM_LIQUIDITY,
    DEFAULT_REGISTRY_ADDRESS,
};
pub use pool_config::PoolConfig;

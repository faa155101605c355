//! Pool registry: deterministic creation and symmetric lookup.
//!
//! The [`Registry`] owns every [`Pool`](crate::pools::Pool).  Pool
//! addresses are a pure function of the registry address and the sorted
//! pair, so routers and off-line tools compute them with
//! [`pool_address`] instead of querying.
//!
//! ```rust
//! use hydra_dex::config::DexConfig;
//! use hydra_dex::domain::Address;
//! use hydra_dex::factory::{pool_address, Registry};
//! use hydra_dex::traits::FromConfig;
//!
//! let mut registry = Registry::from_config(&DexConfig::default()).expect("valid config");
//! let a = Address::from_bytes([1u8; 20]);
//! let b = Address::from_bytes([2u8; 20]);
//!
//! let (pool, sequence) = registry.create_pool(b, a).expect("new pair");
//! assert_eq!(sequence, 1);
//! assert_eq!(registry.get_pool(a, b), Some(pool));
//! assert_eq!(pool_address(registry.address(), a, b).ok(), Some(pool));
//! ```

mod registry;

pub use registry::{pool_address, pool_init_code_hash, Registry};

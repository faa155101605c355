//! Construction from a validated configuration.
//!
//! The registry builds each pool from a [`PoolConfig`](crate::config::PoolConfig),
//! and the exchange builds its registry from a
//! [`DexConfig`](crate::config::DexConfig).  Implementations validate the
//! configuration before constructing, so a value that was built is in a
//! valid initial state.
//!
//! ```text
//! DexConfig  ──FromConfig──▶ Registry
//! PoolConfig ──FromConfig──▶ Pool
//! ```

use crate::error::DexError;

/// Builds `Self` from a configuration of type `C`.
pub trait FromConfig<C> {
    /// Validates `config` and constructs the value.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] (or a more specific
    /// variant) if the configuration is inconsistent.
    fn from_config(config: &C) -> Result<Self, DexError>
    where
        Self: Sized;
}

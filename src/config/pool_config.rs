//! Per-pool construction parameters.

use serde::{Deserialize, Serialize};

use super::ShareTokenConfig;
use crate::domain::{Address, Amount, AssetPair, PricingPolicy};
use crate::error::DexError;

/// Everything needed to build a [`Pool`](crate::pools::Pool).
///
/// The registry derives one of these per pair from its
/// [`DexConfig`](super::DexConfig).  The locked-share floor only applies
/// to constant-product pools; fixed-ratio pools always lock nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    address: Address,
    pair: AssetPair,
    policy: PricingPolicy,
    minimum_liquidity: Amount,
    share_token: ShareTokenConfig,
    chain_id: u64,
}

impl PoolConfig {
    /// Creates a validated pool configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`PoolConfig::validate`].
    pub fn new(
        address: Address,
        pair: AssetPair,
        policy: PricingPolicy,
        minimum_liquidity: Amount,
        share_token: ShareTokenConfig,
        chain_id: u64,
    ) -> Result<Self, DexError> {
        let minimum_liquidity = if policy.is_fixed_ratio() {
            Amount::ZERO
        } else {
            minimum_liquidity
        };
        let config = Self {
            address,
            pair,
            policy,
            minimum_liquidity,
            share_token,
            chain_id,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks all invariants.
    ///
    /// # Errors
    ///
    /// - [`DexError::ZeroAddress`] for a zero pool address.
    /// - [`DexError::InvalidRecipient`] if the pool address collides with
    ///   one of its own assets.
    /// - [`DexError::InvalidConfiguration`] for an invalid policy.
    pub fn validate(&self) -> Result<(), DexError> {
        if self.address.is_zero() {
            return Err(DexError::ZeroAddress);
        }
        if self.pair.contains(self.address) {
            return Err(DexError::InvalidRecipient);
        }
        self.policy.validate()
    }

    /// Pool address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Asset pair.
    #[must_use]
    pub const fn pair(&self) -> AssetPair {
        self.pair
    }

    /// Pricing policy.
    #[must_use]
    pub const fn policy(&self) -> PricingPolicy {
        self.policy
    }

    /// Locked-share floor.
    pub const fn minimum_liquidity(&self) -> Amount {
        self.minimum_liquidity
    }

    /// Share token metadata.
    #[must_use]
    pub const fn share_token(&self) -> &ShareTokenConfig {
        &self.share_token
    }

    /// Chain id for the permit domain.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

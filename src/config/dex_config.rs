//! Exchange-wide configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount, PricingPolicy};
use crate::error::DexError;

/// Shares permanently locked to the zero address on a constant-product
/// pool's first deposit.
pub const DEFAULT_MINIMUM_LIQUIDITY: u128 = 1_000;

/// Chain id used in permit signatures unless configured.
pub const DEFAULT_CHAIN_ID: u64 = 31_337;

/// Registry address used for pool address derivation unless configured.
pub const DEFAULT_REGISTRY_ADDRESS: Address = Address::from_bytes([
    0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f, 0x64,
    0x2f, 0x64, 0x18, 0x0a, 0xa3,
]);

/// Metadata of the share token every pool issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareTokenConfig {
    /// Token name, also the EIP-712 domain name.
    pub name: String,
    /// Ticker.
    pub symbol: String,
    /// Display decimals.
    pub decimals: u8,
}

impl Default for ShareTokenConfig {
    fn default() -> Self {
        Self {
            name: "Hydra DEX Shares".to_owned(),
            symbol: "HDX-LP".to_owned(),
            decimals: 18,
        }
    }
}

/// Configuration of an [`Exchange`](crate::exchange::Exchange).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```
/// use hydra_dex::config::DexConfig;
/// use hydra_dex::domain::PricingPolicy;
///
/// let cfg: DexConfig = serde_json::from_str(r#"{ "chain_id": 1 }"#).expect("valid json");
/// assert_eq!(cfg.chain_id, 1);
/// assert_eq!(cfg.default_policy, PricingPolicy::FixedInitialRatio);
/// cfg.validate().expect("valid config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DexConfig {
    /// Chain id bound into every pool's permit domain.
    pub chain_id: u64,
    /// Address of the registry; input to pool address derivation.
    pub registry_address: Address,
    /// Account allowed to toggle the protocol fee.
    pub fee_to_setter: Address,
    /// Policy given to pools created without an explicit one.
    pub default_policy: PricingPolicy,
    /// Shares locked on a constant-product pool's first deposit.
    pub minimum_liquidity: Amount,
    /// Share token metadata.
    pub share_token: ShareTokenConfig,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            registry_address: DEFAULT_REGISTRY_ADDRESS,
            fee_to_setter: Address::ZERO,
            default_policy: PricingPolicy::default(),
            minimum_liquidity: Amount::new(DEFAULT_MINIMUM_LIQUIDITY),
            share_token: ShareTokenConfig::default(),
        }
    }
}

impl DexConfig {
    /// Builds a validated configuration with the given fee setter and
    /// default policy, other fields at their defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`DexConfig::validate`].
    pub fn new(fee_to_setter: Address, default_policy: PricingPolicy) -> Result<Self, DexError> {
        let config = Self {
            fee_to_setter,
            default_policy,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks all invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] if the registry address
    /// is zero, the share token has no name or symbol, or the default
    /// policy carries an invalid fee.
    pub fn validate(&self) -> Result<(), DexError> {
        if self.registry_address.is_zero() {
            return Err(DexError::InvalidConfiguration(
                "registry address must be non-zero",
            ));
        }
        if self.share_token.name.is_empty() {
            return Err(DexError::InvalidConfiguration(
                "share token name must be non-empty",
            ));
        }
        if self.share_token.symbol.is_empty() {
            return Err(DexError::InvalidConfiguration(
                "share token symbol must be non-empty",
            ));
        }
        self.default_policy.validate()
    }
}

//! Deterministic pool registry.

use std::collections::HashMap;

use alloy_primitives::keccak256;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{DexConfig, PoolConfig, ShareTokenConfig};
use crate::domain::{Address, Amount, AssetPair, PricingPolicy};
use crate::error::DexError;
use crate::pools::Pool;
use crate::traits::FromConfig;

/// Identifier hashed in place of pool creation code.
const POOL_CODE_ID: &[u8] = b"hydra-dex/pool/v1";

/// `keccak256` of the pool code identifier, the last input of address
/// derivation.
#[must_use]
pub fn pool_init_code_hash() -> [u8; 32] {
    keccak256(POOL_CODE_ID).0
}

/// Derives the address of the pool for `(a, b)` under `registry` without
/// consulting any state:
///
/// ```text
/// keccak256(0xff ‖ registry ‖ keccak256(token0 ‖ token1) ‖ init_code_hash)[12..]
/// ```
///
/// # Errors
///
/// Propagates [`AssetPair::new`].
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::Address;
/// use hydra_dex::factory::pool_address;
///
/// let registry = Address::from_bytes([0xF0; 20]);
/// let a = Address::from_bytes([1u8; 20]);
/// let b = Address::from_bytes([2u8; 20]);
/// assert_eq!(pool_address(registry, a, b).ok(), pool_address(registry, b, a).ok());
/// ```
pub fn pool_address(registry: Address, a: Address, b: Address) -> Result<Address, DexError> {
    let pair = AssetPair::new(a, b)?;
    Ok(derive_address(registry, &pair))
}

fn derive_address(registry: Address, pair: &AssetPair) -> Address {
    let salt = keccak256(pair.packed());
    let mut preimage = [0u8; 1 + 20 + 32 + 32];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(&registry.as_bytes());
    preimage[21..53].copy_from_slice(&salt.0);
    preimage[53..].copy_from_slice(&pool_init_code_hash());
    Address::from_word(&keccak256(preimage).0)
}

/// Owned table of every pool, keyed both by address and by pair.
///
/// At most one pool exists per unordered pair.  Committed pools are never
/// removed; the enumeration list is append-only and its length after
/// insertion is the creation sequence number.  Only a rolled-back creation
/// takes its pool back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    address: Address,
    chain_id: u64,
    default_policy: PricingPolicy,
    minimum_liquidity: Amount,
    share_token: ShareTokenConfig,
    pairs: HashMap<Address, HashMap<Address, Address>>,
    all_pools: Vec<Address>,
    pools: HashMap<Address, Pool>,
    fee_to: Option<Address>,
    fee_to_setter: Address,
}

impl FromConfig<DexConfig> for Registry {
    fn from_config(config: &DexConfig) -> Result<Self, DexError> {
        config.validate()?;
        Ok(Self {
            address: config.registry_address,
            chain_id: config.chain_id,
            default_policy: config.default_policy,
            minimum_liquidity: config.minimum_liquidity,
            share_token: config.share_token.clone(),
            pairs: HashMap::new(),
            all_pools: Vec::new(),
            pools: HashMap::new(),
            fee_to: None,
            fee_to_setter: config.fee_to_setter,
        })
    }
}

impl Registry {
    /// Registry address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Policy for pools created without an explicit one.
    #[must_use]
    pub const fn default_policy(&self) -> PricingPolicy {
        self.default_policy
    }

    /// Creates a pool with the default policy.
    ///
    /// Returns the pool address and its 1-based sequence number.
    ///
    /// # Errors
    ///
    /// See [`Registry::create_pool_with_policy`].
    pub fn create_pool(&mut self, a: Address, b: Address) -> Result<(Address, usize), DexError> {
        self.create_pool_with_policy(a, b, self.default_policy)
    }

    /// Creates a pool with an explicit policy.
    ///
    /// # Errors
    ///
    /// - [`DexError::IdenticalAssets`] / [`DexError::ZeroAddress`] for a
    ///   bad pair.
    /// - [`DexError::PoolExists`] if the pair is already registered in
    ///   either order.
    /// - [`DexError::InvalidConfiguration`] for an invalid policy.
    pub fn create_pool_with_policy(
        &mut self,
        a: Address,
        b: Address,
        policy: PricingPolicy,
    ) -> Result<(Address, usize), DexError> {
        let pair = AssetPair::new(a, b)?;
        if self.get_pool(a, b).is_some() {
            return Err(DexError::PoolExists);
        }
        let address = derive_address(self.address, &pair);
        let config = PoolConfig::new(
            address,
            pair,
            policy,
            self.minimum_liquidity,
            self.share_token.clone(),
            self.chain_id,
        )?;
        let pool = Pool::from_config(&config)?;

        let (t0, t1) = (pair.token0(), pair.token1());
        self.pairs.entry(t0).or_default().insert(t1, address);
        self.pairs.entry(t1).or_default().insert(t0, address);
        self.all_pools.push(address);
        self.pools.insert(address, pool);

        let sequence = self.all_pools.len();
        info!(pool = %address, token0 = %t0, token1 = %t1, sequence, ?policy, "pool created");
        Ok((address, sequence))
    }

    /// Pool for the unordered pair, if registered.
    #[must_use]
    pub fn get_pool(&self, a: Address, b: Address) -> Option<Address> {
        self.pairs.get(&a).and_then(|m| m.get(&b)).copied()
    }

    /// Number of pools created.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.all_pools.len()
    }

    /// Pool created `index`-th (0-based).
    #[must_use]
    pub fn pool_at(&self, index: usize) -> Option<Address> {
        self.all_pools.get(index).copied()
    }

    /// All pool addresses in creation order.
    #[must_use]
    pub fn all_pools(&self) -> &[Address] {
        &self.all_pools
    }

    /// Pool state by address.
    #[must_use]
    pub fn pool(&self, address: Address) -> Option<&Pool> {
        self.pools.get(&address)
    }

    pub(crate) fn pool_mut(&mut self, address: Address) -> Result<&mut Pool, DexError> {
        self.pools.get_mut(&address).ok_or(DexError::PoolNotFound)
    }

    // -- undo -----------------------------------------------------------------

    pub(crate) fn restore_pool(&mut self, address: Address, pool: Pool) {
        self.pools.insert(address, pool);
    }

    /// Unregisters a pool created inside a frame that is being undone.
    pub(crate) fn remove_pool(&mut self, address: Address) {
        let Some(pool) = self.pools.remove(&address) else {
            return;
        };
        let (t0, t1) = (pool.token0(), pool.token1());
        for (a, b) in [(t0, t1), (t1, t0)] {
            if let Some(inner) = self.pairs.get_mut(&a) {
                inner.remove(&b);
                if inner.is_empty() {
                    self.pairs.remove(&a);
                }
            }
        }
        if let Some(i) = self.all_pools.iter().rposition(|p| *p == address) {
            self.all_pools.remove(i);
        }
    }

    pub(crate) fn restore_fee_to(&mut self, fee_to: Option<Address>) {
        self.fee_to = fee_to;
    }

    pub(crate) fn restore_fee_to_setter(&mut self, setter: Address) {
        self.fee_to_setter = setter;
    }

    /// Protocol fee recipient; `None` means the fee is off.
    #[must_use]
    pub const fn fee_to(&self) -> Option<Address> {
        self.fee_to
    }

    /// Account allowed to change the fee settings.
    #[must_use]
    pub const fn fee_to_setter(&self) -> Address {
        self.fee_to_setter
    }

    /// Turns the protocol fee on (`Some`) or off (`None`).
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Forbidden`] unless `caller` is the setter.
    pub fn set_fee_to(&mut self, caller: Address, fee_to: Option<Address>) -> Result<(), DexError> {
        if caller != self.fee_to_setter {
            return Err(DexError::Forbidden);
        }
        self.fee_to = fee_to.filter(|a| !a.is_zero());
        info!(fee_to = ?self.fee_to, "protocol fee recipient changed");
        Ok(())
    }

    /// Hands the setter role to `new_setter`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Forbidden`] unless `caller` is the setter.
    pub fn set_fee_to_setter(&mut self, caller: Address, new_setter: Address) -> Result<(), DexError> {
        if caller != self.fee_to_setter {
            return Err(DexError::Forbidden);
        }
        self.fee_to_setter = new_setter;
        info!(setter = %new_setter, "protocol fee setter changed");
        Ok(())
    }
}

//! Canonically ordered pair of distinct assets.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::DexError;

/// Two distinct, non-zero assets sorted so that `token0 < token1`.
///
/// A pool's side `0` is always the lower address.  Building the pair from
/// `(a, b)` or `(b, a)` yields the same value, which makes it usable as a
/// key for unordered lookups.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{Address, AssetPair};
///
/// let a = Address::from_bytes([1u8; 20]);
/// let b = Address::from_bytes([2u8; 20]);
/// let pair = AssetPair::new(b, a).expect("distinct assets");
/// assert_eq!(pair.token0(), a);
/// assert_eq!(pair, AssetPair::new(a, b).expect("distinct assets"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetPair {
    token0: Address,
    token1: Address,
}

impl AssetPair {
    /// Sorts the two assets into canonical order.
    ///
    /// # Errors
    ///
    /// - [`DexError::IdenticalAssets`] if `a == b`.
    /// - [`DexError::ZeroAddress`] if the lower asset is the zero address.
    pub fn new(a: Address, b: Address) -> Result<Self, DexError> {
        if a == b {
            return Err(DexError::IdenticalAssets);
        }
        let (token0, token1) = if a < b { (a, b) } else { (b, a) };
        if token0.is_zero() {
            return Err(DexError::ZeroAddress);
        }
        Ok(Self { token0, token1 })
    }

    /// Lower-addressed asset.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// Higher-addressed asset.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Returns `true` if `asset` is one of the two.
    #[must_use]
    pub fn contains(&self, asset: Address) -> bool {
        self.token0 == asset || self.token1 == asset
    }

    /// Returns `true` if `asset` is side `0`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidPath`] if `asset` is not in the pair.
    pub fn is_token0(&self, asset: Address) -> Result<bool, DexError> {
        if asset == self.token0 {
            Ok(true)
        } else if asset == self.token1 {
            Ok(false)
        } else {
            Err(DexError::InvalidPath)
        }
    }

    /// `token0 ‖ token1`, the salt preimage for pool address derivation.
    #[must_use]
    pub fn packed(&self) -> [u8; 40] {
        let mut out = [0u8; 40];
        out[..20].copy_from_slice(&self.token0.as_bytes());
        out[20..].copy_from_slice(&self.token1.as_bytes());
        out
    }
}

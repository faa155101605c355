//! Raw asset quantity with checked arithmetic.

use core::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// A raw quantity of an asset or of pool shares, in the smallest unit.
///
/// Addition and subtraction are checked and return `None` on overflow or
/// underflow.  Products and quotients are taken in 256-bit space through
/// [`Amount::to_u256`], and narrowed back with [`Amount::try_from_u256`].
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::Amount;
///
/// let a = Amount::new(10);
/// assert_eq!(a.checked_sub(&Amount::new(4)), Some(Amount::new(6)));
/// assert_eq!(Amount::MAX.checked_add(&a), None);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Largest amount; an allowance of this size is never decremented.
    pub const MAX: Self = Self(u128::MAX);

    /// Wraps a raw `u128`.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Widens to 256 bits.
    #[must_use]
    pub fn to_u256(&self) -> U256 {
        U256::from(self.0)
    }

    /// Narrows a 256-bit value, returning `None` if it exceeds `u128`.
    #[must_use]
    pub fn try_from_u256(value: U256) -> Option<Self> {
        u128::try_from(value).ok().map(Self)
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the positive part of `self − other`, or zero.
    pub const fn excess_over(&self, other: &Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

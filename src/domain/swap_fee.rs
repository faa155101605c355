//! Swap fee as an exact fraction of the input.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DexError;

/// Fraction of every swap input retained by the pool as a fee.
///
/// Stored as `numerator / denominator` so that the invariant check and the
/// quote formulas stay in integer arithmetic.  The part of the input that
/// reaches the pricing curve is `denominator − numerator`.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::SwapFee;
///
/// let fee = SwapFee::STANDARD;
/// assert_eq!(fee.numerator(), 3);
/// assert_eq!(fee.retained(), 997);
/// assert_eq!(fee.to_string(), "3/1000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapFee {
    numerator: u32,
    denominator: u32,
}

impl SwapFee {
    /// 0.30 %, the classic constant-product fee.
    pub const STANDARD: Self = Self {
        numerator: 3,
        denominator: 1_000,
    };

    /// No fee.
    pub const ZERO: Self = Self {
        numerator: 0,
        denominator: 1,
    };

    /// Creates a fee of `numerator / denominator`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] if the denominator is
    /// zero or the fee would consume the whole input.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, DexError> {
        let fee = Self {
            numerator,
            denominator,
        };
        fee.validate()?;
        Ok(fee)
    }

    /// Checks `0 ≤ numerator < denominator`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] on violation.
    pub const fn validate(&self) -> Result<(), DexError> {
        if self.denominator == 0 {
            return Err(DexError::InvalidConfiguration(
                "swap fee denominator must be non-zero",
            ));
        }
        if self.numerator >= self.denominator {
            return Err(DexError::InvalidConfiguration(
                "swap fee must be below 100%",
            ));
        }
        Ok(())
    }

    /// Fee numerator.
    #[must_use]
    pub const fn numerator(&self) -> u32 {
        self.numerator
    }

    /// Fee denominator.
    #[must_use]
    pub const fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Share of the input that reaches the curve, over the same denominator.
    #[must_use]
    pub const fn retained(&self) -> u32 {
        self.denominator - self.numerator
    }
}

impl Default for SwapFee {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for SwapFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

//! Checked 256-bit arithmetic returning [`DexError`] instead of `Option`.
//!
//! Pool math widens [`Amount`](crate::domain::Amount)s to [`U256`] before
//! multiplying, so products of reserves and fee denominators never wrap.
//! [`CheckedArithmetic`] lifts the `Option`-returning `U256` methods into
//! `Result`, so the pricing and fee formulas chain with `?` and surface a
//! specific error variant for each failure.
//!
//! ```
//! use alloy_primitives::U256;
//! use hydra_dex::domain::Rounding;
//! use hydra_dex::math::CheckedArithmetic;
//!
//! let product = U256::from(500u32).safe_mul(&U256::from(10u32)).expect("fits");
//! assert_eq!(product.safe_div(&U256::from(3u32), Rounding::Up), Ok(U256::from(1_667u32)));
//! assert!(U256::ZERO.safe_sub(&U256::from(1u32)).is_err());
//! ```

use alloy_primitives::U256;

use crate::domain::Rounding;
use crate::error::DexError;

/// Fallible arithmetic with typed errors.
///
/// No method wraps, saturates or panics.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] past the representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, DexError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, DexError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] past the representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self, DexError>;

    /// Checked division in the given direction.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, DexError>;
}

impl CheckedArithmetic for U256 {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, DexError> {
        self.checked_add(*other)
            .ok_or(DexError::Overflow("u256 addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, DexError> {
        self.checked_sub(*other)
            .ok_or(DexError::Underflow("u256 subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, DexError> {
        self.checked_mul(*other)
            .ok_or(DexError::Overflow("u256 multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, DexError> {
        if other.is_zero() {
            return Err(DexError::DivisionByZero);
        }
        let (q, r) = self.div_rem(*other);
        match rounding {
            // q < U256::MAX whenever a remainder exists
            Rounding::Up if !r.is_zero() => Ok(q + U256::from(1u8)),
            _ => Ok(q),
        }
    }
}

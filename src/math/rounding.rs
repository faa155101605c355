//! `a × b / d` on amounts, with explicit rounding.
//!
//! The product is taken in 256 bits so that multiplying two amounts never
//! overflows before the division.
//!
//! ```
//! use hydra_dex::domain::{Amount, Rounding};
//! use hydra_dex::math::mul_div;
//!
//! let out = mul_div(Amount::MAX, Amount::new(2), Amount::new(4), Rounding::Down);
//! assert_eq!(out, Ok(Amount::new(u128::MAX / 2)));
//! ```

use super::CheckedArithmetic;
use crate::domain::{Amount, Rounding};
use crate::error::DexError;

/// `a × b / d` with a 256-bit intermediate product.
///
/// # Errors
///
/// - [`DexError::DivisionByZero`] if `d` is zero.
/// - [`DexError::Overflow`] if the quotient does not fit in `u128`.
pub fn mul_div(a: Amount, b: Amount, d: Amount, rounding: Rounding) -> Result<Amount, DexError> {
    let q = a
        .to_u256()
        .safe_mul(&b.to_u256())?
        .safe_div(&d.to_u256(), rounding)?;
    Amount::try_from_u256(q).ok_or(DexError::Overflow("mul_div quotient exceeds u128"))
}

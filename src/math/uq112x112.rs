//! UQ112x112 fixed-point prices for the time-weighted accumulators.
//!
//! A reserve ratio `y / x` is encoded as `(y << 112) / x`.  Reserves are
//! capped at [`MAX_RESERVE`] so the encoded value fits in 224 bits and the
//! accumulator can absorb a `u32` elapsed-seconds factor before wrapping.

use alloy_primitives::U256;

use crate::domain::Amount;

/// Fractional bits.
pub const RESOLUTION: usize = 112;

/// Largest reserve a pool may hold: `2^112 − 1`.
pub const MAX_RESERVE: u128 = (1u128 << 112) - 1;

/// Encodes `y` as a UQ112x112 integer.
#[must_use]
pub fn encode(y: Amount) -> U256 {
    y.to_u256() << RESOLUTION
}

/// Divides an encoded value by a raw amount, yielding a UQ112x112 ratio.
///
/// Returns `None` on a zero divisor.
#[must_use]
pub fn uqdiv(x: U256, y: Amount) -> Option<U256> {
    x.checked_div(y.to_u256())
}

/// Price of `base` in units of `quote`: `quote / base` as UQ112x112.
#[must_use]
pub fn price(quote: Amount, base: Amount) -> Option<U256> {
    uqdiv(encode(quote), base)
}

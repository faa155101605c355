//! Explicit rounding direction for integer division.

use serde::{Deserialize, Serialize};

/// Rounding direction for division on amounts.
///
/// Outputs paid by a pool round [`Rounding::Down`]; inputs charged to a
/// trader round [`Rounding::Up`].
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{Amount, Rounding};
/// use hydra_dex::math::mul_div;
///
/// let (ten, one, four) = (Amount::new(10), Amount::new(1), Amount::new(4));
/// assert_eq!(mul_div(ten, one, four, Rounding::Down), Ok(Amount::new(2)));
/// assert_eq!(mul_div(ten, one, four, Rounding::Up), Ok(Amount::new(3)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Towards positive infinity.
    Up,
    /// Towards zero.
    Down,
}

//! Swap-validity rule of a pool.

use serde::{Deserialize, Serialize};

use super::SwapFee;
use crate::error::DexError;

/// The rule a swap must satisfy, fixed when the pool is created.
///
/// | Variant | Rule |
/// |---------|------|
/// | `ConstantProduct` | fee-adjusted balance product ≥ reserve product |
/// | `FixedInitialRatio` | `out == in × initial_out / initial_in` exactly |
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{PricingPolicy, SwapFee};
///
/// let policy = PricingPolicy::constant_product(SwapFee::STANDARD);
/// assert_eq!(policy.fee(), Some(SwapFee::STANDARD));
/// assert!(PricingPolicy::FixedInitialRatio.fee().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingPolicy {
    /// `x · y ≥ k` after the input fee is discounted.
    ConstantProduct {
        /// Fee charged on the input side.
        fee: SwapFee,
    },
    /// Every swap trades at the ratio of the first deposit.
    #[default]
    FixedInitialRatio,
}

impl PricingPolicy {
    /// Constant-product policy with the given fee.
    #[must_use]
    pub const fn constant_product(fee: SwapFee) -> Self {
        Self::ConstantProduct { fee }
    }

    /// The input fee, if the policy charges one.
    #[must_use]
    pub const fn fee(&self) -> Option<SwapFee> {
        match self {
            Self::ConstantProduct { fee } => Some(*fee),
            Self::FixedInitialRatio => None,
        }
    }

    /// Whether the pool records its first deposit as the trading ratio.
    #[must_use]
    pub const fn is_fixed_ratio(&self) -> bool {
        matches!(self, Self::FixedInitialRatio)
    }

    /// Validates embedded parameters.
    ///
    /// # Errors
    ///
    /// Propagates [`SwapFee::validate`].
    pub const fn validate(&self) -> Result<(), DexError> {
        match self {
            Self::ConstantProduct { fee } => fee.validate(),
            Self::FixedInitialRatio => Ok(()),
        }
    }
}

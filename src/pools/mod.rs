//! Pool state, share token and the pricing arithmetic.
//!
//! | Item | Role |
//! |------|------|
//! | [`Pool`] | reserves, accumulators, lock, policy, protocol-fee state |
//! | [`ShareToken`] | per-pool claim token with EIP-712 permits |
//! | [`constant_product_out`] / [`constant_product_in`] | fee-aware quotes |
//! | [`fixed_ratio_out`] / [`fixed_ratio_in`] | exact-ratio quotes |
//! | [`geometric_mean`] | first-deposit share count |

mod pool;
mod shares;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use pool::{
    constant_product_in, constant_product_out, fixed_ratio_in, fixed_ratio_out, geometric_mean,
    Orientation, Pool,
};
pub use shares::{permit_typehash, ShareToken};

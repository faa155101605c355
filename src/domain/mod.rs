//! Value types shared by pools, the registry and the router.
//!
//! All types are small `Copy` newtypes or enums with validated
//! constructors, so that a value that exists is a value that is valid.

mod address;
mod amount;
mod asset_pair;
mod lock_state;
mod permit;
mod pricing_policy;
mod rounding;
mod swap_fee;

pub use address::Address;
pub use amount::Amount;
pub use asset_pair::AssetPair;
pub use lock_state::LockState;
pub use permit::{signer_address, PermitSignature};
pub use pricing_policy::PricingPolicy;
pub use rounding::Rounding;
pub use swap_fee::SwapFee;

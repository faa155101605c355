//! Seams between the exchange core and its collaborators.
//!
//! | Trait | Role |
//! |-------|------|
//! | [`AssetLedger`] | external fungible-asset balances and allowances |
//! | [`Checkpoint`] | nested undo frames for atomic operations |
//! | [`NativeWrapper`] | native coin ⇄ wrapped asset |
//! | [`SwapCallback`] | flash-swap hook |
//! | [`FromConfig`] | configuration-driven construction |

mod asset_ledger;
mod checkpoint;
mod from_config;
mod native_wrapper;
mod swap_callback;

pub use asset_ledger::AssetLedger;
pub use checkpoint::Checkpoint;
pub use from_config::FromConfig;
pub use native_wrapper::NativeWrapper;
pub use swap_callback::SwapCallback;

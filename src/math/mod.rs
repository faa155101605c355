//! Arithmetic helpers for pool accounting.
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`CheckedArithmetic`] | `Result`-returning ops on 256-bit intermediates |
//! | [`mul_div`] | `a × b / d` on amounts with explicit rounding |
//! | [`uq112x112`] | accumulator price encoding |
//!
//! Square roots for share issuance and the protocol fee use
//! [`U256::root`](alloy_primitives::U256::root).

mod checked;
mod rounding;
pub mod uq112x112;

pub use checked::CheckedArithmetic;
pub use rounding::mul_div;

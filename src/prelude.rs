//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_dex::prelude::*;
//! ```

pub use crate::domain::{Address, Amount, AssetPair, PermitSignature, PricingPolicy, Rounding, SwapFee};

pub use crate::traits::{AssetLedger, Checkpoint, FromConfig, NativeWrapper, SwapCallback};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{DexConfig, PoolConfig};

pub use crate::error::{DexError, ErrorKind, LedgerError, Result};

pub use crate::events::{Event, EventLog};

pub use crate::exchange::Exchange;

pub use crate::factory::{pool_address, Registry};

pub use crate::ledger::InMemoryLedger;

pub use crate::router::Router;

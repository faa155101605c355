//! State-change events, appended in the order changes happen.
//!
//! Within one pool operation the order is: share `Transfer`s, `Sync`, then
//! the operation's own `Mint` / `Burn` / `Swap`.  A failed operation leaves
//! no events behind.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount};

/// A single event.  `pool` is the emitting pool where there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    /// A pool was registered.  `sequence` is the pool count after insertion.
    PoolCreated {
        /// Lower asset.
        token0: Address,
        /// Higher asset.
        token1: Address,
        /// New pool.
        pool: Address,
        /// 1-based creation index.
        sequence: usize,
    },
    /// Shares moved; `from` is zero on mint, `to` is zero on burn.
    Transfer {
        /// Share token.
        pool: Address,
        /// Debited holder.
        from: Address,
        /// Credited holder.
        to: Address,
        /// Share amount.
        value: Amount,
    },
    /// A share allowance was set.
    Approval {
        /// Share token.
        pool: Address,
        /// Holder.
        owner: Address,
        /// Approved spender.
        spender: Address,
        /// New allowance.
        value: Amount,
    },
    /// Liquidity added.
    Mint {
        /// Pool.
        pool: Address,
        /// Caller of `mint`.
        sender: Address,
        /// Deposited side-0 amount.
        amount0: Amount,
        /// Deposited side-1 amount.
        amount1: Amount,
    },
    /// Liquidity removed.
    Burn {
        /// Pool.
        pool: Address,
        /// Caller of `burn`.
        sender: Address,
        /// Returned side-0 amount.
        amount0: Amount,
        /// Returned side-1 amount.
        amount1: Amount,
        /// Recipient of both assets.
        to: Address,
    },
    /// Assets exchanged.
    Swap {
        /// Pool.
        pool: Address,
        /// Caller of `swap`.
        sender: Address,
        /// Side-0 input.
        amount0_in: Amount,
        /// Side-1 input.
        amount1_in: Amount,
        /// Side-0 output.
        amount0_out: Amount,
        /// Side-1 output.
        amount1_out: Amount,
        /// Output recipient.
        to: Address,
    },
    /// Reserves rewritten.
    Sync {
        /// Pool.
        pool: Address,
        /// New side-0 reserve.
        reserve0: Amount,
        /// New side-1 reserve.
        reserve1: Amount,
    },
}

impl Event {
    /// Emitting pool, if any.
    #[must_use]
    pub const fn pool(&self) -> Option<Address> {
        match self {
            Self::PoolCreated { .. } => None,
            Self::Transfer { pool, .. }
            | Self::Approval { pool, .. }
            | Self::Mint { pool, .. }
            | Self::Burn { pool, .. }
            | Self::Swap { pool, .. }
            | Self::Sync { pool, .. } => Some(*pool),
        }
    }

    /// Short variant name, as written in the serialized `event` tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "PoolCreated",
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::Mint { .. } => "Mint",
            Self::Burn { .. } => "Burn",
            Self::Swap { .. } => "Swap",
            Self::Sync { .. } => "Sync",
        }
    }
}

/// Append-only event sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog(Vec<Event>);

impl EventLog {
    /// Empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an event.
    pub fn push(&mut self, event: Event) {
        self.0.push(event);
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All events in emission order.
    #[must_use]
    pub fn as_slice(&self) -> &[Event] {
        &self.0
    }

    /// Events emitted at or after `checkpoint`.
    #[must_use]
    pub fn since(&self, checkpoint: usize) -> &[Event] {
        self.0.get(checkpoint..).unwrap_or_default()
    }

    /// Most recent event.
    #[must_use]
    pub fn last(&self) -> Option<&Event> {
        self.0.last()
    }

    /// Drops everything after `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.0.truncate(len);
    }
}

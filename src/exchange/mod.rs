//! The exchange: one owner for the registry, every pool, the event log and
//! the asset ledger.
//!
//! All state changes go through [`Exchange`].  Each public mutating call
//! runs inside a checkpoint frame: on error the ledger, every pool the call
//! touched, the registry's fee settings and the event log are restored to
//! what they were before the call, so a failed operation has no observable
//! effect.  A frame journals only what it touches; untouched pools and
//! accounts cost nothing.
//!
//! | Group | Operations |
//! |-------|------------|
//! | registry | `create_pool`, `create_pool_with_policy`, `set_fee_to`, `set_fee_to_setter` |
//! | pool | `mint`, `burn`, `swap`, `skim`, `sync` |
//! | shares | `approve`, `transfer`, `transfer_from`, `permit` |
//!
//! # Examples
//!
//! ```
//! use hydra_dex::config::DexConfig;
//! use hydra_dex::domain::{Address, Amount};
//! use hydra_dex::exchange::Exchange;
//! use hydra_dex::ledger::InMemoryLedger;
//! use hydra_dex::traits::AssetLedger;
//!
//! let (a, b) = (Address::from_bytes([1u8; 20]), Address::from_bytes([2u8; 20]));
//! let lp = Address::from_bytes([0xA1; 20]);
//!
//! let ledger = InMemoryLedger::new(Address::from_bytes([0xEE; 20]));
//! let mut ex = Exchange::new(DexConfig::default(), ledger).expect("valid config");
//! let pool = ex.create_pool(a, b).expect("new pair");
//!
//! ex.ledger_mut().mint(a, pool, Amount::new(500)).expect("fits");
//! ex.ledger_mut().mint(b, pool, Amount::new(5_000)).expect("fits");
//! let shares = ex.mint(pool, lp, lp).expect("first deposit");
//! assert_eq!(shares, Amount::new(1_581));
//! ```

mod pool_ops;
mod share_ops;

use tracing::warn;

use crate::config::DexConfig;
use crate::domain::{Address, PricingPolicy};
use crate::error::DexError;
use crate::events::{Event, EventLog};
use crate::factory::Registry;
use crate::pools::Pool;
use crate::traits::{AssetLedger, Checkpoint, FromConfig};

/// State a frame replaced, saved the first time the frame touches it.
#[derive(Debug, Clone)]
enum Undo {
    Pool(Address, Box<Pool>),
    Created(Address),
    FeeTo(Option<Address>),
    FeeToSetter(Address),
}

/// Registry, pools, events and ledger behind a single `&mut` entry point.
#[derive(Debug, Clone)]
pub struct Exchange<L> {
    config: DexConfig,
    ledger: L,
    registry: Registry,
    block_timestamp: u64,
    events: EventLog,
    journal: Vec<Undo>,
    frames: Vec<usize>,
}

impl<L: AssetLedger + Checkpoint> Exchange<L> {
    /// Builds an exchange with an empty registry at block time zero.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] for an invalid config.
    pub fn new(config: DexConfig, ledger: L) -> Result<Self, DexError> {
        let registry = Registry::from_config(&config)?;
        Ok(Self {
            config,
            ledger,
            registry,
            block_timestamp: 0,
            events: EventLog::new(),
            journal: Vec::new(),
            frames: Vec::new(),
        })
    }

    // -- accessors ------------------------------------------------------------

    /// Configuration the exchange was built with.
    #[must_use]
    pub const fn config(&self) -> &DexConfig {
        &self.config
    }

    /// Asset ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable asset ledger, for funding accounts and direct transfers.
    ///
    /// The ledger does not authenticate callers, so this hands out the
    /// authority of every account.  A [`SwapCallback`](crate::traits::SwapCallback)
    /// gets the same access.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Pool registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Every event emitted so far.
    #[must_use]
    pub const fn events(&self) -> &EventLog {
        &self.events
    }

    /// Pool state by address.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::PoolNotFound`] for an unknown address.
    pub fn pool(&self, address: Address) -> Result<&Pool, DexError> {
        self.registry.pool(address).ok_or(DexError::PoolNotFound)
    }

    // -- clock ----------------------------------------------------------------

    /// Current block time in seconds.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.block_timestamp
    }

    /// Sets the block time.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.block_timestamp = timestamp;
    }

    /// Moves the block time forward by `seconds`.
    pub fn advance_time(&mut self, seconds: u64) {
        self.block_timestamp = self.block_timestamp.saturating_add(seconds);
    }

    /// Block time truncated to 32 bits, as stored in pools.
    pub(crate) fn pool_timestamp(&self) -> u32 {
        u32::try_from(self.block_timestamp & u64::from(u32::MAX)).unwrap_or_default()
    }

    // -- registry -------------------------------------------------------------

    /// Creates a pool for `(a, b)` with the configured default policy.
    ///
    /// # Errors
    ///
    /// See [`Registry::create_pool_with_policy`].
    pub fn create_pool(&mut self, a: Address, b: Address) -> Result<Address, DexError> {
        let policy = self.registry.default_policy();
        self.create_pool_with_policy(a, b, policy)
    }

    /// Creates a pool for `(a, b)` with an explicit policy and emits
    /// [`Event::PoolCreated`].
    ///
    /// # Errors
    ///
    /// See [`Registry::create_pool_with_policy`].
    pub fn create_pool_with_policy(
        &mut self,
        a: Address,
        b: Address,
        policy: PricingPolicy,
    ) -> Result<Address, DexError> {
        self.atomically("create_pool", |ex| {
            let (pool, sequence) = ex.registry.create_pool_with_policy(a, b, policy)?;
            ex.record(Undo::Created(pool));
            let (token0, token1) = {
                let p = ex.pool(pool)?;
                (p.token0(), p.token1())
            };
            ex.emit(Event::PoolCreated {
                token0,
                token1,
                pool,
                sequence,
            });
            Ok(pool)
        })
    }

    /// Sets or clears the protocol fee recipient.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Forbidden`] unless `caller` is the fee setter.
    pub fn set_fee_to(&mut self, caller: Address, fee_to: Option<Address>) -> Result<(), DexError> {
        let prior = self.registry.fee_to();
        self.registry.set_fee_to(caller, fee_to)?;
        self.record(Undo::FeeTo(prior));
        Ok(())
    }

    /// Hands the fee setter role to another account.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Forbidden`] unless `caller` is the fee setter.
    pub fn set_fee_to_setter(&mut self, caller: Address, new_setter: Address) -> Result<(), DexError> {
        let prior = self.registry.fee_to_setter();
        self.registry.set_fee_to_setter(caller, new_setter)?;
        self.record(Undo::FeeToSetter(prior));
        Ok(())
    }

    // -- checkpoints ----------------------------------------------------------

    /// Runs `op` as one unit: if it fails, the ledger, every pool `op`
    /// touched, the fee settings and the event log are restored and the
    /// error is returned.
    ///
    /// Nested calls roll back only their own part, and the outermost
    /// failure rolls back everything.  A committed inner frame's undo
    /// entries pass to the enclosing frame.
    ///
    /// # Errors
    ///
    /// Whatever `op` returns.
    pub fn atomically<T>(
        &mut self,
        label: &'static str,
        op: impl FnOnce(&mut Self) -> Result<T, DexError>,
    ) -> Result<T, DexError> {
        let ledger_mark = self.ledger.checkpoint();
        let mark = self.journal.len();
        let events = self.events.len();
        self.frames.push(mark);
        let result = op(self);
        self.frames.pop();
        match result {
            Ok(value) => {
                self.ledger.commit(ledger_mark);
                if self.frames.is_empty() {
                    self.journal.clear();
                }
                Ok(value)
            }
            Err(err) => {
                self.ledger.rollback(ledger_mark);
                self.undo_to(mark);
                self.events.truncate(events);
                warn!(operation = label, error = %err, "operation rolled back");
                Err(err)
            }
        }
    }

    fn undo_to(&mut self, mark: usize) {
        while self.journal.len() > mark {
            match self.journal.pop() {
                Some(Undo::Pool(address, pool)) => self.registry.restore_pool(address, *pool),
                Some(Undo::Created(address)) => self.registry.remove_pool(address),
                Some(Undo::FeeTo(fee_to)) => self.registry.restore_fee_to(fee_to),
                Some(Undo::FeeToSetter(setter)) => self.registry.restore_fee_to_setter(setter),
                None => break,
            }
        }
    }

    fn record(&mut self, undo: Undo) {
        if !self.frames.is_empty() {
            self.journal.push(undo);
        }
    }

    /// Holds `pool`'s lock around `op`.  The lock is released whether or
    /// not `op` succeeds.
    pub(crate) fn with_lock<T>(
        &mut self,
        pool: Address,
        op: impl FnOnce(&mut Self) -> Result<T, DexError>,
    ) -> Result<T, DexError> {
        self.pool_mut(pool)?.acquire_lock()?;
        let result = op(self);
        if let Ok(p) = self.pool_mut(pool) {
            p.release_lock();
        }
        result
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Mutable pool state.  Inside a frame, the pool is saved the first
    /// time the frame asks for it.
    pub(crate) fn pool_mut(&mut self, address: Address) -> Result<&mut Pool, DexError> {
        if let Some(&mark) = self.frames.last() {
            let saved = self
                .journal
                .iter()
                .skip(mark)
                .any(|u| matches!(u, Undo::Pool(a, _) if *a == address));
            if !saved {
                let prior = self.pool(address)?.clone();
                self.journal.push(Undo::Pool(address, Box::new(prior)));
            }
        }
        self.registry.pool_mut(address)
    }
}

//! Pool entry points: mint, burn, swap, skim and sync.
//!
//! Assets must already sit in the pool's ledger account when `mint` or
//! `swap` runs; both derive amounts from `balance − reserve`.

use tracing::debug;

use super::Exchange;
use crate::domain::{Address, Amount};
use crate::error::DexError;
use crate::events::Event;
use crate::traits::{AssetLedger, Checkpoint, SwapCallback};

impl<L: AssetLedger + Checkpoint> Exchange<L> {
    /// Mints shares to `to` for whatever was deposited since the last sync.
    ///
    /// # Errors
    ///
    /// - [`DexError::InsufficientLiquidityMinted`] if no shares result.
    /// - [`DexError::Reentrant`] while the pool is locked.
    /// - [`DexError::PoolNotFound`] for an unknown pool.
    pub fn mint(&mut self, pool: Address, sender: Address, to: Address) -> Result<Amount, DexError> {
        self.atomically("mint", |ex| ex.with_lock(pool, |ex| ex.mint_locked(pool, sender, to)))
    }

    /// Burns the shares held by the pool itself and pays both assets to
    /// `to`.
    ///
    /// # Errors
    ///
    /// - [`DexError::InsufficientLiquidityBurned`] if either amount is zero.
    /// - [`DexError::Reentrant`] while the pool is locked.
    pub fn burn(
        &mut self,
        pool: Address,
        sender: Address,
        to: Address,
    ) -> Result<(Amount, Amount), DexError> {
        self.atomically("burn", |ex| ex.with_lock(pool, |ex| ex.burn_locked(pool, sender, to)))
    }

    /// Sends the requested outputs to `to`, runs the optional flash
    /// callback, then checks the pool's pricing rule against the inputs
    /// found in its balances.
    ///
    /// # Errors
    ///
    /// - [`DexError::InsufficientOutputAmount`] if both outputs are zero.
    /// - [`DexError::InsufficientLiquidity`] if an output reaches its reserve.
    /// - [`DexError::InvalidRecipient`] if `to` is one of the pool's assets.
    /// - [`DexError::InsufficientInputAmount`] if nothing came in.
    /// - [`DexError::InvariantViolation`] / [`DexError::InvalidInputOutput`]
    ///   if the pricing rule rejects the trade.
    /// - [`DexError::Reentrant`] while the pool is locked.
    pub fn swap(
        &mut self,
        pool: Address,
        sender: Address,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
        callback: Option<&mut dyn SwapCallback<L>>,
    ) -> Result<(), DexError> {
        self.atomically("swap", |ex| {
            ex.with_lock(pool, |ex| {
                ex.swap_locked(pool, sender, (amount0_out, amount1_out), to, callback)
            })
        })
    }

    /// Sends balances above the reserves to `to`.
    ///
    /// # Errors
    ///
    /// - [`DexError::Reentrant`] while the pool is locked.
    /// - [`DexError::Ledger`] if a transfer fails.
    pub fn skim(&mut self, pool: Address, to: Address) -> Result<(), DexError> {
        self.atomically("skim", |ex| {
            ex.with_lock(pool, |ex| {
                let (t0, t1, r0, r1) = ex.pool_view(pool)?;
                let excess0 = ex.ledger.balance_of(t0, pool).excess_over(&r0);
                let excess1 = ex.ledger.balance_of(t1, pool).excess_over(&r1);
                ex.pay(t0, pool, to, excess0)?;
                ex.pay(t1, pool, to, excess1)?;
                debug!(pool = %pool, to = %to, excess0 = %excess0, excess1 = %excess1, "skim");
                Ok(())
            })
        })
    }

    /// Sets the reserves to the current balances.
    ///
    /// # Errors
    ///
    /// - [`DexError::Overflow`] if a balance exceeds 112 bits.
    /// - [`DexError::Reentrant`] while the pool is locked.
    pub fn sync(&mut self, pool: Address) -> Result<(), DexError> {
        self.atomically("sync", |ex| {
            ex.with_lock(pool, |ex| {
                let (b0, b1) = ex.pool_balances(pool)?;
                ex.write_reserves(pool, b0, b1)
            })
        })
    }

    // -- locked bodies --------------------------------------------------------

    fn mint_locked(&mut self, pool: Address, sender: Address, to: Address) -> Result<Amount, DexError> {
        let (_, _, r0, r1) = self.pool_view(pool)?;
        let (b0, b1) = self.pool_balances(pool)?;
        let amount0 = b0
            .checked_sub(&r0)
            .ok_or(DexError::Underflow("balance below reserve"))?;
        let amount1 = b1
            .checked_sub(&r1)
            .ok_or(DexError::Underflow("balance below reserve"))?;

        let fee_on = self.mint_protocol_fee(pool)?;

        let (first, floor, shares) = {
            let p = self.pool(pool)?;
            let first = p.shares().total_supply().is_zero();
            (first, p.minimum_liquidity(), p.liquidity_for_deposit(amount0, amount1)?)
        };
        if first && !floor.is_zero() {
            self.mint_shares(pool, Address::ZERO, floor)?;
        }
        self.mint_shares(pool, to, shares)?;
        if first {
            self.pool_mut(pool)?.record_initial_reserves(amount0, amount1);
        }

        self.write_reserves(pool, b0, b1)?;
        self.pool_mut(pool)?.set_k_last(fee_on);
        self.emit(Event::Mint {
            pool,
            sender,
            amount0,
            amount1,
        });
        debug!(pool = %pool, to = %to, amount0 = %amount0, amount1 = %amount1, shares = %shares, "mint");
        Ok(shares)
    }

    fn burn_locked(
        &mut self,
        pool: Address,
        sender: Address,
        to: Address,
    ) -> Result<(Amount, Amount), DexError> {
        let (t0, t1, _, _) = self.pool_view(pool)?;
        let (b0, b1) = self.pool_balances(pool)?;

        let fee_on = self.mint_protocol_fee(pool)?;

        let shares = self.pool(pool)?.shares().balance_of(pool);
        let (amount0, amount1) = self.pool(pool)?.redemption(shares, b0, b1)?;
        self.burn_shares(pool, pool, shares)?;
        self.pay(t0, pool, to, amount0)?;
        self.pay(t1, pool, to, amount1)?;

        let (b0, b1) = self.pool_balances(pool)?;
        self.write_reserves(pool, b0, b1)?;
        self.pool_mut(pool)?.set_k_last(fee_on);
        self.emit(Event::Burn {
            pool,
            sender,
            amount0,
            amount1,
            to,
        });
        debug!(pool = %pool, to = %to, amount0 = %amount0, amount1 = %amount1, shares = %shares, "burn");
        Ok((amount0, amount1))
    }

    fn swap_locked(
        &mut self,
        pool: Address,
        sender: Address,
        amounts_out: (Amount, Amount),
        to: Address,
        callback: Option<&mut dyn SwapCallback<L>>,
    ) -> Result<(), DexError> {
        let (amount0_out, amount1_out) = amounts_out;
        self.pool(pool)?.check_swap_request(amount0_out, amount1_out, to)?;

        let (t0, t1, _, _) = self.pool_view(pool)?;
        self.pay(t0, pool, to, amount0_out)?;
        self.pay(t1, pool, to, amount1_out)?;
        if let Some(callback) = callback {
            callback.on_swap(self, pool, sender, amount0_out, amount1_out)?;
        }

        let (b0, b1) = self.pool_balances(pool)?;
        let (amount0_in, amount1_in) = {
            let p = self.pool(pool)?;
            let amounts_in = p.inputs(b0, b1, amount0_out, amount1_out);
            p.validate_swap(amounts_in, amounts_out, (b0, b1))?;
            amounts_in
        };

        self.write_reserves(pool, b0, b1)?;
        self.emit(Event::Swap {
            pool,
            sender,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
            to,
        });
        debug!(
            pool = %pool,
            amount0_in = %amount0_in,
            amount1_in = %amount1_in,
            amount0_out = %amount0_out,
            amount1_out = %amount1_out,
            "swap"
        );
        Ok(())
    }

    // -- helpers --------------------------------------------------------------

    /// `(token0, token1, reserve0, reserve1)`.
    fn pool_view(&self, pool: Address) -> Result<(Address, Address, Amount, Amount), DexError> {
        let p = self.pool(pool)?;
        let (r0, r1, _) = p.reserves();
        Ok((p.token0(), p.token1(), r0, r1))
    }

    /// Live ledger balances of the pool's two assets.
    fn pool_balances(&self, pool: Address) -> Result<(Amount, Amount), DexError> {
        let (t0, t1, _, _) = self.pool_view(pool)?;
        Ok((
            self.ledger.balance_of(t0, pool),
            self.ledger.balance_of(t1, pool),
        ))
    }

    fn pay(&mut self, asset: Address, pool: Address, to: Address, amount: Amount) -> Result<(), DexError> {
        if amount.is_zero() {
            return Ok(());
        }
        self.ledger.transfer(asset, pool, to, amount)?;
        Ok(())
    }

    fn write_reserves(&mut self, pool: Address, balance0: Amount, balance1: Amount) -> Result<(), DexError> {
        let now = self.pool_timestamp();
        self.pool_mut(pool)?.update(balance0, balance1, now)?;
        self.emit(Event::Sync {
            pool,
            reserve0: balance0,
            reserve1: balance1,
        });
        debug!(pool = %pool, reserve0 = %balance0, reserve1 = %balance1, "sync");
        Ok(())
    }

    /// Mints the accrued protocol fee when the fee is on; returns whether
    /// it is on.
    fn mint_protocol_fee(&mut self, pool: Address) -> Result<bool, DexError> {
        let fee_to = self.registry.fee_to();
        let p = self.pool(pool)?;
        let fee_on = p.fee_on(fee_to);
        if let Some(recipient) = fee_to.filter(|_| fee_on) {
            let fee = p.protocol_fee_shares()?;
            if !fee.is_zero() {
                self.mint_shares(pool, recipient, fee)?;
                debug!(pool = %pool, to = %recipient, shares = %fee, "protocol fee");
            }
        }
        Ok(fee_on)
    }

    fn mint_shares(&mut self, pool: Address, to: Address, value: Amount) -> Result<(), DexError> {
        self.pool_mut(pool)?.shares_mut().mint(to, value)?;
        self.emit(Event::Transfer {
            pool,
            from: Address::ZERO,
            to,
            value,
        });
        Ok(())
    }

    fn burn_shares(&mut self, pool: Address, from: Address, value: Amount) -> Result<(), DexError> {
        self.pool_mut(pool)?.shares_mut().burn(from, value)?;
        self.emit(Event::Transfer {
            pool,
            from,
            to: Address::ZERO,
            value,
        });
        Ok(())
    }
}

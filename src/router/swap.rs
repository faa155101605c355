//! Exact-input and exact-output swaps along asset paths.
//!
//! `path[0]` is sold and `path[n − 1]` is bought.  Native variants require
//! the wrapped native asset at the corresponding end of the path.

use super::library::{get_amounts_in, get_amounts_out};
use super::Router;
use crate::domain::{Address, Amount};
use crate::error::DexError;
use crate::exchange::Exchange;
use crate::traits::{AssetLedger, Checkpoint, NativeWrapper};

impl Router {
    /// Sells exactly `amount_in` of `path[0]` for at least
    /// `amount_out_min` of the last asset.
    ///
    /// Returns the per-hop amounts.
    ///
    /// # Errors
    ///
    /// - [`DexError::Expired`] past the deadline.
    /// - [`DexError::InvalidPath`] / [`DexError::PoolNotFound`] for a bad
    ///   path.
    /// - [`DexError::InsufficientOutputAmount`] below the minimum.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_tokens<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, deadline)?;
        exchange.atomically("swap_exact_tokens_for_tokens", |ex| {
            let amounts = get_amounts_out(ex.registry(), amount_in, path)?;
            Self::check_min_out(&amounts, amount_out_min)?;
            self.pull_input(ex, caller, path, amounts[0])?;
            self.swap_hops(ex, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of the last asset for at most
    /// `amount_in_max` of `path[0]`.
    ///
    /// # Errors
    ///
    /// - [`DexError::Expired`] past the deadline.
    /// - [`DexError::ExcessiveInputAmount`] above the maximum.
    /// - [`DexError::InvalidInputOutput`] if a fixed-ratio hop cannot yield
    ///   its exact output.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens_for_exact_tokens<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, deadline)?;
        exchange.atomically("swap_tokens_for_exact_tokens", |ex| {
            let amounts = get_amounts_in(ex.registry(), amount_out, path)?;
            if amounts[0] > amount_in_max {
                return Err(DexError::ExcessiveInputAmount);
            }
            self.pull_input(ex, caller, path, amounts[0])?;
            self.swap_hops(ex, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    /// Sells all of `value` native for at least `amount_out_min` of the
    /// last asset.  `path[0]` must be the wrapped native asset.
    ///
    /// # Errors
    ///
    /// As [`Router::swap_exact_tokens_for_tokens`].
    pub fn swap_exact_native_for_tokens<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        amount_out_min: Amount,
        path: &[Address],
        to: Address,
        deadline: u64,
        value: Amount,
    ) -> Result<Vec<Amount>, DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, deadline)?;
        self.require_first(path, self.wrapped_native)?;
        exchange.atomically("swap_exact_native_for_tokens", |ex| {
            let amounts = get_amounts_out(ex.registry(), value, path)?;
            Self::check_min_out(&amounts, amount_out_min)?;
            self.wrap_input(ex, caller, path, value, amounts[0])?;
            self.swap_hops(ex, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` native for at most `amount_in_max` of
    /// `path[0]`.  The last asset must be the wrapped native asset.
    ///
    /// # Errors
    ///
    /// As [`Router::swap_tokens_for_exact_tokens`].
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens_for_exact_native<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, deadline)?;
        self.require_last(path, self.wrapped_native)?;
        exchange.atomically("swap_tokens_for_exact_native", |ex| {
            let amounts = get_amounts_in(ex.registry(), amount_out, path)?;
            if amounts[0] > amount_in_max {
                return Err(DexError::ExcessiveInputAmount);
            }
            self.pull_input(ex, caller, path, amounts[0])?;
            self.swap_hops(ex, &amounts, path, self.address)?;
            self.unwrap_to(ex, amount_out, to)?;
            Ok(amounts)
        })
    }

    /// Sells exactly `amount_in` of `path[0]` for at least
    /// `amount_out_min` native.  The last asset must be the wrapped native
    /// asset.
    ///
    /// # Errors
    ///
    /// As [`Router::swap_exact_tokens_for_tokens`].
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_native<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, deadline)?;
        self.require_last(path, self.wrapped_native)?;
        exchange.atomically("swap_exact_tokens_for_native", |ex| {
            let amounts = get_amounts_out(ex.registry(), amount_in, path)?;
            let amount_out = Self::check_min_out(&amounts, amount_out_min)?;
            self.pull_input(ex, caller, path, amounts[0])?;
            self.swap_hops(ex, &amounts, path, self.address)?;
            self.unwrap_to(ex, amount_out, to)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of the last asset with native value,
    /// refunding whatever part of `value` is not needed.  `path[0]` must be
    /// the wrapped native asset.
    ///
    /// # Errors
    ///
    /// - [`DexError::ExcessiveInputAmount`] if `value` does not cover the
    ///   required input.
    /// - Otherwise as [`Router::swap_tokens_for_exact_tokens`].
    pub fn swap_native_for_exact_tokens<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        amount_out: Amount,
        path: &[Address],
        to: Address,
        deadline: u64,
        value: Amount,
    ) -> Result<Vec<Amount>, DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, deadline)?;
        self.require_first(path, self.wrapped_native)?;
        exchange.atomically("swap_native_for_exact_tokens", |ex| {
            let amounts = get_amounts_in(ex.registry(), amount_out, path)?;
            if amounts[0] > value {
                return Err(DexError::ExcessiveInputAmount);
            }
            self.wrap_input(ex, caller, path, value, amounts[0])?;
            self.swap_hops(ex, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    // -- internals ------------------------------------------------------------

    /// Last amount, if it meets the minimum.
    fn check_min_out(amounts: &[Amount], amount_out_min: Amount) -> Result<Amount, DexError> {
        match amounts.last() {
            Some(out) if *out >= amount_out_min => Ok(*out),
            _ => Err(DexError::InsufficientOutputAmount),
        }
    }

    fn require_first(&self, path: &[Address], asset: Address) -> Result<(), DexError> {
        match path.first() {
            Some(first) if *first == asset => Ok(()),
            _ => Err(DexError::InvalidPath),
        }
    }

    fn require_last(&self, path: &[Address], asset: Address) -> Result<(), DexError> {
        match path.last() {
            Some(last) if *last == asset => Ok(()),
            _ => Err(DexError::InvalidPath),
        }
    }

    /// Moves the caller's input into the first pool on the router's
    /// allowance.
    fn pull_input<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        path: &[Address],
        amount: Amount,
    ) -> Result<(), DexError>
    where
        L: AssetLedger + Checkpoint,
    {
        let (asset, next) = first_hop(path)?;
        let pool = self.pool_for(exchange, asset, next)?;
        exchange
            .ledger_mut()
            .transfer_from(asset, self.address, caller, pool, amount)?;
        Ok(())
    }

    /// Takes `value` native from the caller, wraps `used` of it into the
    /// first pool and refunds the rest.
    fn wrap_input<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        path: &[Address],
        value: Amount,
        used: Amount,
    ) -> Result<(), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        let (asset, next) = first_hop(path)?;
        let pool = self.pool_for(exchange, asset, next)?;
        let refund = value
            .checked_sub(&used)
            .ok_or(DexError::ExcessiveInputAmount)?;
        let ledger = exchange.ledger_mut();
        ledger.transfer_native(caller, self.address, value)?;
        ledger.deposit(self.address, used)?;
        ledger.transfer(self.wrapped_native, self.address, pool, used)?;
        if !refund.is_zero() {
            ledger.transfer_native(self.address, caller, refund)?;
        }
        Ok(())
    }
}

fn first_hop(path: &[Address]) -> Result<(Address, Address), DexError> {
    match path {
        [first, second, ..] => Ok((*first, *second)),
        _ => Err(DexError::InvalidPath),
    }
}

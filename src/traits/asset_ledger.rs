//! Fungible-asset ledger consumed by pools and the router.
//!
//! Pools never keep their own copy of asset balances: every mint, burn and
//! swap reads the pool's live balance from the ledger and compares it with
//! the last synchronized reserves.  Assets must therefore be moved into a
//! pool *before* the pool operation that accounts for them.

use crate::domain::{Address, Amount};
use crate::error::LedgerError;

/// Balance and allowance bookkeeping for any number of fungible assets.
///
/// Implementations must be all-or-nothing per call: a failing transfer
/// leaves every balance and allowance untouched.
///
/// Methods take account addresses as plain arguments and do not
/// authenticate the caller.  Callers are trusted to pass only accounts they
/// act for; the exchange moves a pool's assets only while running that
/// pool's own operation.
pub trait AssetLedger {
    /// Balance of `asset` held by `owner`.
    fn balance_of(&self, asset: Address, owner: Address) -> Amount;

    /// Amount of `owner`'s `asset` that `spender` may move.
    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Amount;

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `from` holds too
    /// little.
    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Moves `amount` of `owner`'s `asset` to `to`, spending `spender`'s
    /// allowance.  An allowance of [`Amount::MAX`] is not decremented.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientAllowance`] if the allowance is short.
    /// - [`LedgerError::InsufficientBalance`] if `owner` holds too little.
    fn transfer_from(
        &mut self,
        asset: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Sets `spender`'s allowance over `owner`'s `asset`.
    fn approve(&mut self, asset: Address, owner: Address, spender: Address, amount: Amount);
}

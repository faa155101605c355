//! Flash-swap hook invoked between the optimistic transfer and the
//! invariant check.

use crate::domain::{Address, Amount};
use crate::error::DexError;
use crate::exchange::Exchange;

/// Receiver of a swap's optimistic output.
///
/// The pool has already sent `amount0_out` / `amount1_out` to the
/// recipient when [`on_swap`](Self::on_swap) runs.  The hook must leave the
/// pool holding enough input for the pricing rule to pass.  The pool is
/// locked for the duration: any mint, burn, swap, skim or sync against it
/// from inside the hook fails with [`DexError::Reentrant`].
///
/// The hook runs with the exchange's full authority, including
/// [`Exchange::ledger_mut`], whose ledger does not check who asks for a
/// transfer.  Only install callbacks you trust as much as the ledger
/// itself; a hook can move any account's balance.
pub trait SwapCallback<L> {
    /// Called once per swap with exchange access.
    ///
    /// # Errors
    ///
    /// Any error aborts and rolls back the whole swap.
    fn on_swap(
        &mut self,
        exchange: &mut Exchange<L>,
        pool: Address,
        sender: Address,
        amount0_out: Amount,
        amount1_out: Amount,
    ) -> Result<(), DexError>;
}

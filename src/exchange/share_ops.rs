//! Share token operations: approvals, transfers and signed permits.

use tracing::debug;

use super::Exchange;
use crate::domain::{Address, Amount, PermitSignature};
use crate::error::DexError;
use crate::events::Event;
use crate::traits::{AssetLedger, Checkpoint};

impl<L: AssetLedger + Checkpoint> Exchange<L> {
    /// Sets `spender`'s allowance over `owner`'s shares of `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::PoolNotFound`] for an unknown pool.
    pub fn approve(
        &mut self,
        pool: Address,
        owner: Address,
        spender: Address,
        value: Amount,
    ) -> Result<(), DexError> {
        self.pool_mut(pool)?.shares_mut().approve(owner, spender, value);
        self.emit(Event::Approval {
            pool,
            owner,
            spender,
            value,
        });
        Ok(())
    }

    /// Moves `value` of `from`'s shares to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Ledger`] if `from` holds too few shares.
    pub fn transfer(
        &mut self,
        pool: Address,
        from: Address,
        to: Address,
        value: Amount,
    ) -> Result<(), DexError> {
        self.atomically("transfer", |ex| ex.move_shares(pool, from, to, value))
    }

    /// Moves `value` of `owner`'s shares to `to` on `spender`'s allowance.
    /// An allowance of [`Amount::MAX`] is left as is.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Ledger`] if the allowance or balance is short.
    pub fn transfer_from(
        &mut self,
        pool: Address,
        spender: Address,
        owner: Address,
        to: Address,
        value: Amount,
    ) -> Result<(), DexError> {
        self.atomically("transfer_from", |ex| {
            ex.pool_mut(pool)?
                .shares_mut()
                .spend_allowance(pool, owner, spender, value)?;
            ex.move_shares(pool, owner, to, value)
        })
    }

    /// Applies an off-line signed approval.
    ///
    /// The signed digest covers the owner's current nonce, which is consumed
    /// on success.
    ///
    /// # Errors
    ///
    /// - [`DexError::Expired`] if the block time is past `deadline`.
    /// - [`DexError::InvalidSignature`] if the signature does not recover
    ///   to `owner`.
    pub fn permit(
        &mut self,
        pool: Address,
        owner: Address,
        spender: Address,
        value: Amount,
        deadline: u64,
        signature: &PermitSignature,
    ) -> Result<(), DexError> {
        if self.now() > deadline {
            return Err(DexError::Expired);
        }
        self.atomically("permit", |ex| {
            let digest = {
                let shares = ex.pool(pool)?.shares();
                shares.permit_digest(owner, spender, value, shares.nonce(owner), deadline)
            };
            let signer = signature.recover(&digest)?;
            if owner.is_zero() || signer != owner {
                return Err(DexError::InvalidSignature);
            }
            let nonce = ex.pool_mut(pool)?.shares_mut().use_nonce(owner);
            debug!(pool = %pool, owner = %owner, spender = %spender, nonce, "permit");
            ex.approve(pool, owner, spender, value)
        })
    }

    fn move_shares(
        &mut self,
        pool: Address,
        from: Address,
        to: Address,
        value: Amount,
    ) -> Result<(), DexError> {
        self.pool_mut(pool)?
            .shares_mut()
            .transfer(pool, from, to, value)?;
        self.emit(Event::Transfer {
            pool,
            from,
            to,
            value,
        });
        Ok(())
    }
}

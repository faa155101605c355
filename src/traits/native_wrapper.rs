//! Conversion between the chain's native coin and its fungible wrapper.

use crate::domain::{Address, Amount};
use crate::error::LedgerError;

/// Native-value accounts plus the wrapped-native asset.
///
/// The wrapped asset itself lives in the [`AssetLedger`](super::AssetLedger)
/// under [`wrapped_asset`](Self::wrapped_asset).
pub trait NativeWrapper {
    /// Address of the wrapped-native asset.
    fn wrapped_asset(&self) -> Address;

    /// Native value held by `owner`.
    fn native_balance_of(&self, owner: Address) -> Amount;

    /// Moves native value between accounts.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientNativeBalance`] if `from` holds
    /// too little.
    fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        value: Amount,
    ) -> Result<(), LedgerError>;

    /// Converts `value` of `account`'s native coin into the wrapped asset,
    /// credited to `account`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientNativeBalance`] if `account`
    /// holds too little native value.
    fn deposit(&mut self, account: Address, value: Amount) -> Result<(), LedgerError>;

    /// Burns `amount` of `account`'s wrapped asset and returns the same
    /// native value to `account`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `account` holds too
    /// little of the wrapped asset.
    fn withdraw(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError>;
}

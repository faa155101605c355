//! Hash-map backed asset ledger with a built-in native wrapper.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::{Address, Amount};
use crate::error::LedgerError;
use crate::traits::{AssetLedger, Checkpoint, NativeWrapper};

type BalanceKey = (Address, Address);
type AllowanceKey = (Address, Address, Address);

/// Prior value of one table entry; `None` means the entry was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Write {
    Balance(BalanceKey, Option<Amount>),
    Allowance(AllowanceKey, Option<Amount>),
    Native(Address, Option<Amount>),
}

/// In-memory ledger holding fungible balances, allowances and native value.
///
/// The wrapped-native asset is an ordinary entry in the balance table;
/// [`deposit`](NativeWrapper::deposit) and
/// [`withdraw`](NativeWrapper::withdraw) move value between the native
/// table and that entry one-for-one.
///
/// The ledger trusts its caller.  `transfer` moves `from`'s balance without
/// asking who requested it, exactly as a token contract trusts
/// `msg.sender`.  Whoever holds `&mut InMemoryLedger` (including a
/// [`SwapCallback`](crate::traits::SwapCallback) reaching it through
/// [`Exchange::ledger_mut`](crate::exchange::Exchange::ledger_mut)) acts
/// with the authority of every account.  Authenticate callers before
/// handing out mutable access.
///
/// Writes made inside a [`Checkpoint`] frame are journaled with the value
/// they replaced, so rolling back costs one step per write.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{Address, Amount};
/// use hydra_dex::ledger::InMemoryLedger;
/// use hydra_dex::traits::AssetLedger;
///
/// let weth = Address::from_bytes([0xEE; 20]);
/// let alice = Address::from_bytes([0xA1; 20]);
/// let bob = Address::from_bytes([0xB0; 20]);
/// let token = Address::from_bytes([0x01; 20]);
///
/// let mut ledger = InMemoryLedger::new(weth);
/// ledger.mint(token, alice, Amount::new(100)).expect("fits");
/// ledger.transfer(token, alice, bob, Amount::new(40)).expect("funded");
/// assert_eq!(ledger.balance_of(token, bob), Amount::new(40));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryLedger {
    wrapped_native: Address,
    balances: HashMap<BalanceKey, Amount>,
    allowances: HashMap<AllowanceKey, Amount>,
    native: HashMap<Address, Amount>,
    journal: Vec<Write>,
    open_frames: usize,
}

impl InMemoryLedger {
    /// Empty ledger whose wrapped-native asset lives at `wrapped_native`.
    #[must_use]
    pub fn new(wrapped_native: Address) -> Self {
        Self {
            wrapped_native,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            native: HashMap::new(),
            journal: Vec::new(),
            open_frames: 0,
        }
    }

    /// Creates `amount` of `asset` out of thin air for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceOverflow`] past `u128::MAX`.
    pub fn mint(&mut self, asset: Address, owner: Address, amount: Amount) -> Result<(), LedgerError> {
        let next = self
            .balance_of(asset, owner)
            .checked_add(&amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.set_balance((asset, owner), next);
        Ok(())
    }

    /// Credits native value to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceOverflow`] past `u128::MAX`.
    pub fn credit_native(&mut self, owner: Address, value: Amount) -> Result<(), LedgerError> {
        let next = self
            .native_balance_of(owner)
            .checked_add(&value)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.set_native(owner, next);
        Ok(())
    }

    /// Sum of all balances of `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: Address) -> Amount {
        self.balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .fold(Amount::ZERO, |acc, (_, v)| acc.checked_add(v).unwrap_or(Amount::MAX))
    }

    /// Writes waiting on an open frame.
    #[must_use]
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    // -- journaled writes -----------------------------------------------------

    fn set_balance(&mut self, key: BalanceKey, amount: Amount) {
        let prior = self.balances.insert(key, amount);
        if self.open_frames > 0 {
            self.journal.push(Write::Balance(key, prior));
        }
    }

    fn set_allowance(&mut self, key: AllowanceKey, amount: Amount) {
        let prior = self.allowances.insert(key, amount);
        if self.open_frames > 0 {
            self.journal.push(Write::Allowance(key, prior));
        }
    }

    fn set_native(&mut self, owner: Address, value: Amount) {
        let prior = self.native.insert(owner, value);
        if self.open_frames > 0 {
            self.journal.push(Write::Native(owner, prior));
        }
    }
}

fn restore<K: Eq + core::hash::Hash>(table: &mut HashMap<K, Amount>, key: K, prior: Option<Amount>) {
    match prior {
        Some(v) => {
            table.insert(key, v);
        }
        None => {
            table.remove(&key);
        }
    }
}

impl Checkpoint for InMemoryLedger {
    fn checkpoint(&mut self) -> usize {
        self.open_frames += 1;
        self.journal.len()
    }

    fn commit(&mut self, _mark: usize) {
        self.open_frames = self.open_frames.saturating_sub(1);
        if self.open_frames == 0 {
            self.journal.clear();
        }
    }

    fn rollback(&mut self, mark: usize) {
        while self.journal.len() > mark {
            match self.journal.pop() {
                Some(Write::Balance(key, prior)) => restore(&mut self.balances, key, prior),
                Some(Write::Allowance(key, prior)) => restore(&mut self.allowances, key, prior),
                Some(Write::Native(owner, prior)) => restore(&mut self.native, owner, prior),
                None => break,
            }
        }
        self.open_frames = self.open_frames.saturating_sub(1);
        if self.open_frames == 0 {
            self.journal.clear();
        }
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: Address, owner: Address) -> Amount {
        self.balances
            .get(&(asset, owner))
            .copied()
            .unwrap_or_default()
    }

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let from_balance = self
            .balance_of(asset, from)
            .checked_sub(&amount)
            .ok_or(LedgerError::InsufficientBalance { asset, owner: from })?;
        if from != to {
            let to_balance = self
                .balance_of(asset, to)
                .checked_add(&amount)
                .ok_or(LedgerError::BalanceOverflow)?;
            self.set_balance((asset, to), to_balance);
            self.set_balance((asset, from), from_balance);
        }
        trace!(%asset, %from, %to, %amount, "asset transfer");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        asset: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowance = self.allowance(asset, owner, spender);
        let remaining = if allowance == Amount::MAX {
            allowance
        } else {
            allowance
                .checked_sub(&amount)
                .ok_or(LedgerError::InsufficientAllowance {
                    asset,
                    owner,
                    spender,
                })?
        };
        self.transfer(asset, owner, to, amount)?;
        self.set_allowance((asset, owner, spender), remaining);
        Ok(())
    }

    fn approve(&mut self, asset: Address, owner: Address, spender: Address, amount: Amount) {
        self.set_allowance((asset, owner, spender), amount);
    }
}

impl NativeWrapper for InMemoryLedger {
    fn wrapped_asset(&self) -> Address {
        self.wrapped_native
    }

    fn native_balance_of(&self, owner: Address) -> Amount {
        self.native.get(&owner).copied().unwrap_or_default()
    }

    fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        let from_balance = self
            .native_balance_of(from)
            .checked_sub(&value)
            .ok_or(LedgerError::InsufficientNativeBalance { owner: from })?;
        if from != to {
            let to_balance = self
                .native_balance_of(to)
                .checked_add(&value)
                .ok_or(LedgerError::BalanceOverflow)?;
            self.set_native(to, to_balance);
            self.set_native(from, from_balance);
        }
        Ok(())
    }

    fn deposit(&mut self, account: Address, value: Amount) -> Result<(), LedgerError> {
        let asset = self.wrapped_native;
        let remaining = self
            .native_balance_of(account)
            .checked_sub(&value)
            .ok_or(LedgerError::InsufficientNativeBalance { owner: account })?;
        let wrapped = self
            .balance_of(asset, account)
            .checked_add(&value)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.set_balance((asset, account), wrapped);
        self.set_native(account, remaining);
        Ok(())
    }

    fn withdraw(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError> {
        let asset = self.wrapped_native;
        let remaining = self
            .balance_of(asset, account)
            .checked_sub(&amount)
            .ok_or(LedgerError::InsufficientBalance {
                asset,
                owner: account,
            })?;
        let native = self
            .native_balance_of(account)
            .checked_add(&amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.set_native(account, native);
        self.set_balance((asset, account), remaining);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn funded() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new(addr(0xEE));
        let Ok(()) = ledger.mint(addr(1), addr(0xA1), Amount::new(1_000)) else {
            panic!("mint");
        };
        ledger
    }

    // -- transfers ----------------------------------------------------------

    #[test]
    fn transfer_moves_balance() {
        let mut ledger = funded();
        assert!(ledger
            .transfer(addr(1), addr(0xA1), addr(0xB0), Amount::new(300))
            .is_ok());
        assert_eq!(ledger.balance_of(addr(1), addr(0xA1)), Amount::new(700));
        assert_eq!(ledger.balance_of(addr(1), addr(0xB0)), Amount::new(300));
        assert_eq!(ledger.total_supply(addr(1)), Amount::new(1_000));
    }

    #[test]
    fn overdraft_leaves_state_untouched() {
        let mut ledger = funded();
        let before = ledger.clone();
        let err = ledger.transfer(addr(1), addr(0xA1), addr(0xB0), Amount::new(1_001));
        assert_eq!(
            err,
            Err(LedgerError::InsufficientBalance {
                asset: addr(1),
                owner: addr(0xA1)
            })
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn transfer_acts_for_any_account() {
        let mut ledger = funded();
        // No signature or caller identity: holding `&mut` is the authority.
        assert!(ledger
            .transfer(addr(1), addr(0xA1), addr(0xBA), Amount::new(1_000))
            .is_ok());
        assert_eq!(ledger.balance_of(addr(1), addr(0xA1)), Amount::ZERO);
        assert_eq!(ledger.balance_of(addr(1), addr(0xBA)), Amount::new(1_000));
    }

    #[test]
    fn self_transfer_is_noop() {
        let mut ledger = funded();
        assert!(ledger
            .transfer(addr(1), addr(0xA1), addr(0xA1), Amount::new(10))
            .is_ok());
        assert_eq!(ledger.balance_of(addr(1), addr(0xA1)), Amount::new(1_000));
    }

    // -- allowances ---------------------------------------------------------

    #[test]
    fn transfer_from_spends_allowance() {
        let mut ledger = funded();
        ledger.approve(addr(1), addr(0xA1), addr(0xC0), Amount::new(500));
        assert!(ledger
            .transfer_from(addr(1), addr(0xC0), addr(0xA1), addr(0xB0), Amount::new(200))
            .is_ok());
        assert_eq!(
            ledger.allowance(addr(1), addr(0xA1), addr(0xC0)),
            Amount::new(300)
        );
    }

    #[test]
    fn infinite_allowance_is_not_decremented() {
        let mut ledger = funded();
        ledger.approve(addr(1), addr(0xA1), addr(0xC0), Amount::MAX);
        assert!(ledger
            .transfer_from(addr(1), addr(0xC0), addr(0xA1), addr(0xB0), Amount::new(200))
            .is_ok());
        assert_eq!(ledger.allowance(addr(1), addr(0xA1), addr(0xC0)), Amount::MAX);
    }

    #[test]
    fn transfer_from_without_allowance_fails() {
        let mut ledger = funded();
        let r = ledger.transfer_from(addr(1), addr(0xC0), addr(0xA1), addr(0xB0), Amount::new(1));
        assert!(matches!(r, Err(LedgerError::InsufficientAllowance { .. })));
    }

    // -- native wrapper -----------------------------------------------------

    #[test]
    fn deposit_and_withdraw_round_trip() {
        let mut ledger = InMemoryLedger::new(addr(0xEE));
        let Ok(()) = ledger.credit_native(addr(0xA1), Amount::new(50)) else {
            panic!("credit");
        };
        assert!(ledger.deposit(addr(0xA1), Amount::new(30)).is_ok());
        assert_eq!(ledger.native_balance_of(addr(0xA1)), Amount::new(20));
        assert_eq!(ledger.balance_of(addr(0xEE), addr(0xA1)), Amount::new(30));

        assert!(ledger.withdraw(addr(0xA1), Amount::new(30)).is_ok());
        assert_eq!(ledger.native_balance_of(addr(0xA1)), Amount::new(50));
        assert_eq!(ledger.balance_of(addr(0xEE), addr(0xA1)), Amount::ZERO);
    }

    #[test]
    fn deposit_beyond_native_balance_fails() {
        let mut ledger = InMemoryLedger::new(addr(0xEE));
        assert_eq!(
            ledger.deposit(addr(0xA1), Amount::new(1)),
            Err(LedgerError::InsufficientNativeBalance { owner: addr(0xA1) })
        );
    }

    #[test]
    fn native_transfer() {
        let mut ledger = InMemoryLedger::new(addr(0xEE));
        let Ok(()) = ledger.credit_native(addr(0xA1), Amount::new(5)) else {
            panic!("credit");
        };
        assert!(ledger
            .transfer_native(addr(0xA1), addr(0xB0), Amount::new(5))
            .is_ok());
        assert_eq!(ledger.native_balance_of(addr(0xB0)), Amount::new(5));
        assert!(ledger
            .transfer_native(addr(0xA1), addr(0xB0), Amount::new(1))
            .is_err());
    }

    // -- checkpoints --------------------------------------------------------

    #[test]
    fn rollback_restores_every_table() {
        let mut ledger = funded();
        let Ok(()) = ledger.credit_native(addr(0xA1), Amount::new(9)) else {
            panic!("credit");
        };
        let before = ledger.clone();

        let mark = ledger.checkpoint();
        assert!(ledger
            .transfer(addr(1), addr(0xA1), addr(0xB0), Amount::new(10))
            .is_ok());
        ledger.approve(addr(1), addr(0xA1), addr(0xC0), Amount::new(5));
        assert!(ledger.deposit(addr(0xA1), Amount::new(4)).is_ok());
        assert!(ledger.mint(addr(2), addr(0xD0), Amount::new(1)).is_ok());
        ledger.rollback(mark);

        assert_eq!(ledger, before);
    }

    #[test]
    fn commit_keeps_writes_and_clears_journal() {
        let mut ledger = funded();
        let mark = ledger.checkpoint();
        assert!(ledger
            .transfer(addr(1), addr(0xA1), addr(0xB0), Amount::new(10))
            .is_ok());
        assert_eq!(ledger.journal_len(), 2);
        ledger.commit(mark);
        assert_eq!(ledger.journal_len(), 0);
        assert_eq!(ledger.balance_of(addr(1), addr(0xB0)), Amount::new(10));
    }

    #[test]
    fn committed_inner_frame_undone_by_outer_rollback() {
        let mut ledger = funded();
        let before = ledger.clone();

        let outer = ledger.checkpoint();
        assert!(ledger.mint(addr(1), addr(0xA1), Amount::new(1)).is_ok());
        let inner = ledger.checkpoint();
        assert!(ledger
            .transfer(addr(1), addr(0xA1), addr(0xB0), Amount::new(500))
            .is_ok());
        ledger.commit(inner);
        assert_eq!(ledger.balance_of(addr(1), addr(0xB0)), Amount::new(500));
        ledger.rollback(outer);

        assert_eq!(ledger, before);
    }

    #[test]
    fn inner_rollback_keeps_outer_writes() {
        let mut ledger = funded();
        let outer = ledger.checkpoint();
        assert!(ledger.mint(addr(1), addr(0xB0), Amount::new(3)).is_ok());
        let inner = ledger.checkpoint();
        assert!(ledger.mint(addr(1), addr(0xB0), Amount::new(4)).is_ok());
        ledger.rollback(inner);
        assert_eq!(ledger.balance_of(addr(1), addr(0xB0)), Amount::new(3));
        ledger.commit(outer);
        assert_eq!(ledger.balance_of(addr(1), addr(0xB0)), Amount::new(3));
        assert_eq!(ledger.journal_len(), 0);
    }

    #[test]
    fn writes_outside_frames_are_not_journaled() {
        let mut ledger = funded();
        assert!(ledger.mint(addr(1), addr(0xB0), Amount::new(3)).is_ok());
        assert_eq!(ledger.journal_len(), 0);
    }
}

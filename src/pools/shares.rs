//! Share token issued by every pool, with EIP-712 permits.
//!
//! Shares follow the usual fungible-token surface (balances, allowances,
//! transfers) plus signature-based approvals.  The permit digest is
//!
//! ```text
//! keccak256(0x19 0x01 ‖ domain_separator ‖ keccak256(abi.encode(
//!     PERMIT_TYPEHASH, owner, spender, value, nonce, deadline)))
//! ```
//!
//! where the domain binds the token name, version `"1"`, the chain id and
//! the pool address.

use std::collections::HashMap;

use alloy_primitives::{keccak256, U256};
use serde::{Deserialize, Serialize};

use crate::config::ShareTokenConfig;
use crate::domain::{Address, Amount};
use crate::error::{DexError, LedgerError};

const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const PERMIT_TYPE: &[u8] =
    b"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";
const DOMAIN_VERSION: &[u8] = b"1";

/// `keccak256` of the permit type string.
#[must_use]
pub fn permit_typehash() -> [u8; 32] {
    keccak256(PERMIT_TYPE).0
}

fn uint_word(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

/// Pool share ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareToken {
    name: String,
    symbol: String,
    decimals: u8,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<Address, HashMap<Address, Amount>>,
    nonces: HashMap<Address, u64>,
    domain_separator: [u8; 32],
}

impl ShareToken {
    /// Creates an empty share token for the pool at `verifying_contract`.
    #[must_use]
    pub fn new(config: &ShareTokenConfig, chain_id: u64, verifying_contract: Address) -> Self {
        let mut encoded = Vec::with_capacity(5 * 32);
        encoded.extend_from_slice(&keccak256(DOMAIN_TYPE).0);
        encoded.extend_from_slice(&keccak256(config.name.as_bytes()).0);
        encoded.extend_from_slice(&keccak256(DOMAIN_VERSION).0);
        encoded.extend_from_slice(&uint_word(U256::from(chain_id)));
        encoded.extend_from_slice(&verifying_contract.to_word());

        Self {
            name: config.name.clone(),
            symbol: config.symbol.clone(),
            decimals: config.decimals,
            total_supply: Amount::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            nonces: HashMap::new(),
            domain_separator: keccak256(&encoded).0,
        }
    }

    /// Token name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Display decimals.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Outstanding shares.
    pub const fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Shares held by `owner`.
    pub fn balance_of(&self, owner: Address) -> Amount {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    /// Shares of `owner` that `spender` may move.
    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&owner)
            .and_then(|m| m.get(&spender))
            .copied()
            .unwrap_or_default()
    }

    /// Next permit nonce of `owner`.
    #[must_use]
    pub fn nonce(&self, owner: Address) -> u64 {
        self.nonces.get(&owner).copied().unwrap_or_default()
    }

    /// EIP-712 domain separator.
    #[must_use]
    pub const fn domain_separator(&self) -> [u8; 32] {
        self.domain_separator
    }

    /// Digest an owner signs to approve `spender` for `value` shares.
    #[must_use]
    pub fn permit_digest(
        &self,
        owner: Address,
        spender: Address,
        value: Amount,
        nonce: u64,
        deadline: u64,
    ) -> [u8; 32] {
        let mut encoded = Vec::with_capacity(6 * 32);
        encoded.extend_from_slice(&permit_typehash());
        encoded.extend_from_slice(&owner.to_word());
        encoded.extend_from_slice(&spender.to_word());
        encoded.extend_from_slice(&uint_word(value.to_u256()));
        encoded.extend_from_slice(&uint_word(U256::from(nonce)));
        encoded.extend_from_slice(&uint_word(U256::from(deadline)));
        let struct_hash = keccak256(&encoded);

        let mut message = Vec::with_capacity(2 + 32 + 32);
        message.extend_from_slice(&[0x19, 0x01]);
        message.extend_from_slice(&self.domain_separator);
        message.extend_from_slice(&struct_hash.0);
        keccak256(&message).0
    }

    pub(crate) fn mint(&mut self, to: Address, value: Amount) -> Result<(), DexError> {
        self.total_supply = self
            .total_supply
            .checked_add(&value)
            .ok_or(DexError::Overflow("share supply overflow"))?;
        let balance = self.balances.entry(to).or_default();
        *balance = balance
            .checked_add(&value)
            .ok_or(DexError::Overflow("share balance overflow"))?;
        Ok(())
    }

    pub(crate) fn burn(&mut self, from: Address, value: Amount) -> Result<(), DexError> {
        let balance = self
            .balance_of(from)
            .checked_sub(&value)
            .ok_or(DexError::Underflow("share balance underflow"))?;
        self.total_supply = self
            .total_supply
            .checked_sub(&value)
            .ok_or(DexError::Underflow("share supply underflow"))?;
        self.balances.insert(from, balance);
        Ok(())
    }

    /// `pool` names the share token in errors.
    pub(crate) fn transfer(
        &mut self,
        pool: Address,
        from: Address,
        to: Address,
        value: Amount,
    ) -> Result<(), DexError> {
        let from_balance = self
            .balance_of(from)
            .checked_sub(&value)
            .ok_or(LedgerError::InsufficientBalance {
                asset: pool,
                owner: from,
            })?;
        self.balances.insert(from, from_balance);
        let to_balance = self.balances.entry(to).or_default();
        *to_balance = to_balance
            .checked_add(&value)
            .ok_or(DexError::Overflow("share balance overflow"))?;
        Ok(())
    }

    pub(crate) fn approve(&mut self, owner: Address, spender: Address, value: Amount) {
        self.allowances.entry(owner).or_default().insert(spender, value);
    }

    /// Decrements an allowance unless it is [`Amount::MAX`].
    pub(crate) fn spend_allowance(
        &mut self,
        pool: Address,
        owner: Address,
        spender: Address,
        value: Amount,
    ) -> Result<(), DexError> {
        let current = self.allowance(owner, spender);
        if current == Amount::MAX {
            return Ok(());
        }
        let remaining = current
            .checked_sub(&value)
            .ok_or(LedgerError::InsufficientAllowance {
                asset: pool,
                owner,
                spender,
            })?;
        self.approve(owner, spender, remaining);
        Ok(())
    }

    /// Returns the current nonce of `owner` and advances it.
    pub(crate) fn use_nonce(&mut self, owner: Address) -> u64 {
        let entry = self.nonces.entry(owner).or_default();
        let current = *entry;
        *entry = entry.wrapping_add(1);
        current
    }
}

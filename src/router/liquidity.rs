//! Adding and removing liquidity through the router.

use serde::{Deserialize, Serialize};

use super::library::{get_reserves, quote, sort_assets};
use super::Router;
use crate::domain::{Address, Amount, PermitSignature};
use crate::error::DexError;
use crate::exchange::Exchange;
use crate::traits::{AssetLedger, Checkpoint, NativeWrapper};

/// Deposit of two assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidity {
    /// First asset.
    pub asset_a: Address,
    /// Second asset.
    pub asset_b: Address,
    /// Most of `asset_a` to deposit.
    pub amount_a_desired: Amount,
    /// Most of `asset_b` to deposit.
    pub amount_b_desired: Amount,
    /// Least of `asset_a` to deposit.
    pub amount_a_min: Amount,
    /// Least of `asset_b` to deposit.
    pub amount_b_min: Amount,
    /// Share recipient.
    pub to: Address,
    /// Latest block time at which the call may run.
    pub deadline: u64,
}

/// Deposit of one asset against native value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityNative {
    /// Non-native asset.
    pub asset: Address,
    /// Most of `asset` to deposit.
    pub amount_desired: Amount,
    /// Least of `asset` to deposit.
    pub amount_min: Amount,
    /// Least native value to deposit.
    pub native_min: Amount,
    /// Share recipient.
    pub to: Address,
    /// Latest block time at which the call may run.
    pub deadline: u64,
}

/// Withdrawal of two assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidity {
    /// First asset.
    pub asset_a: Address,
    /// Second asset.
    pub asset_b: Address,
    /// Shares to redeem.
    pub shares: Amount,
    /// Least of `asset_a` to receive.
    pub amount_a_min: Amount,
    /// Least of `asset_b` to receive.
    pub amount_b_min: Amount,
    /// Asset recipient.
    pub to: Address,
    /// Latest block time at which the call may run.
    pub deadline: u64,
}

/// Withdrawal of one asset plus native value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityNative {
    /// Non-native asset.
    pub asset: Address,
    /// Shares to redeem.
    pub shares: Amount,
    /// Least of `asset` to receive.
    pub amount_min: Amount,
    /// Least native value to receive.
    pub native_min: Amount,
    /// Recipient of both.
    pub to: Address,
    /// Latest block time at which the call may run.
    pub deadline: u64,
}

/// Signed share approval for the `*_with_permit` withdrawals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitApproval {
    /// Approve [`Amount::MAX`] instead of exactly the redeemed shares.
    pub approve_max: bool,
    /// Owner's signature over the permit digest.
    pub signature: PermitSignature,
}

impl Router {
    /// Deposits both assets at the pool's current ratio and mints shares
    /// to `to`.  The pool is created if it does not exist.
    ///
    /// Returns `(amount_a, amount_b, shares)`.
    ///
    /// # Errors
    ///
    /// - [`DexError::Expired`] past the deadline.
    /// - [`DexError::InsufficientAAmount`] / [`DexError::InsufficientBAmount`]
    ///   if the ratio pushes a side under its minimum.
    /// - [`DexError::Ledger`] if the caller's balance or allowance is short.
    pub fn add_liquidity<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        request: &AddLiquidity,
    ) -> Result<(Amount, Amount, Amount), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, request.deadline)?;
        exchange.atomically("add_liquidity", |ex| {
            let (amount_a, amount_b) = self.optimal_amounts(
                ex,
                (request.asset_a, request.asset_b),
                (request.amount_a_desired, request.amount_b_desired),
                (request.amount_a_min, request.amount_b_min),
            )?;
            let pool = self.pool_for(ex, request.asset_a, request.asset_b)?;
            ex.ledger_mut()
                .transfer_from(request.asset_a, self.address, caller, pool, amount_a)?;
            ex.ledger_mut()
                .transfer_from(request.asset_b, self.address, caller, pool, amount_b)?;
            let shares = ex.mint(pool, self.address, request.to)?;
            Ok((amount_a, amount_b, shares))
        })
    }

    /// Deposits `asset` against up to `value` of the caller's native coin.
    /// Exactly the matched native amount is wrapped; the rest is refunded.
    ///
    /// Returns `(amount_asset, amount_native, shares)`.
    ///
    /// # Errors
    ///
    /// As [`Router::add_liquidity`], plus [`DexError::Ledger`] if the
    /// caller holds less than `value`.
    pub fn add_liquidity_native<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        request: &AddLiquidityNative,
        value: Amount,
    ) -> Result<(Amount, Amount, Amount), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, request.deadline)?;
        exchange.atomically("add_liquidity_native", |ex| {
            let wrapped = self.wrapped_native;
            let (amount_asset, amount_native) = self.optimal_amounts(
                ex,
                (request.asset, wrapped),
                (request.amount_desired, value),
                (request.amount_min, request.native_min),
            )?;
            let pool = self.pool_for(ex, request.asset, wrapped)?;
            ex.ledger_mut()
                .transfer_from(request.asset, self.address, caller, pool, amount_asset)?;
            self.wrap_into(ex, caller, value, amount_native, pool)?;
            let shares = ex.mint(pool, self.address, request.to)?;
            Ok((amount_asset, amount_native, shares))
        })
    }

    /// Redeems `shares` of the `(asset_a, asset_b)` pool, pulled from the
    /// caller through a share allowance, and pays both assets to `to`.
    ///
    /// Returns `(amount_a, amount_b)`.
    ///
    /// # Errors
    ///
    /// - [`DexError::Expired`] past the deadline.
    /// - [`DexError::PoolNotFound`] if the pair has no pool.
    /// - [`DexError::InsufficientAAmount`] / [`DexError::InsufficientBAmount`]
    ///   below the minimums.
    pub fn remove_liquidity<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        request: &RemoveLiquidity,
    ) -> Result<(Amount, Amount), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, request.deadline)?;
        exchange.atomically("remove_liquidity", |ex| self.remove(ex, caller, request))
    }

    /// Redeems shares against `asset` and the wrapped native asset; the
    /// native side is unwrapped and sent to `to` as native value.
    ///
    /// Returns `(amount_asset, amount_native)`.
    ///
    /// # Errors
    ///
    /// As [`Router::remove_liquidity`].
    pub fn remove_liquidity_native<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        request: &RemoveLiquidityNative,
    ) -> Result<(Amount, Amount), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, request.deadline)?;
        exchange.atomically("remove_liquidity_native", |ex| {
            self.remove_native(ex, caller, request)
        })
    }

    /// [`Router::remove_liquidity`] preceded by a signed share approval.
    ///
    /// # Errors
    ///
    /// As [`Router::remove_liquidity`], plus [`DexError::InvalidSignature`].
    pub fn remove_liquidity_with_permit<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        request: &RemoveLiquidity,
        permit: &PermitApproval,
    ) -> Result<(Amount, Amount), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, request.deadline)?;
        exchange.atomically("remove_liquidity_with_permit", |ex| {
            let pool = self.pool_for(ex, request.asset_a, request.asset_b)?;
            self.apply_permit(ex, pool, caller, request.shares, request.deadline, permit)?;
            self.remove(ex, caller, request)
        })
    }

    /// [`Router::remove_liquidity_native`] preceded by a signed share
    /// approval.
    ///
    /// # Errors
    ///
    /// As [`Router::remove_liquidity_native`], plus
    /// [`DexError::InvalidSignature`].
    pub fn remove_liquidity_native_with_permit<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        request: &RemoveLiquidityNative,
        permit: &PermitApproval,
    ) -> Result<(Amount, Amount), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        Self::ensure(exchange, request.deadline)?;
        exchange.atomically("remove_liquidity_native_with_permit", |ex| {
            let pool = self.pool_for(ex, request.asset, self.wrapped_native)?;
            self.apply_permit(ex, pool, caller, request.shares, request.deadline, permit)?;
            self.remove_native(ex, caller, request)
        })
    }

    // -- internals ------------------------------------------------------------

    /// Creates the pool when missing and fits the desired amounts to its
    /// reserve ratio.
    fn optimal_amounts<L>(
        &self,
        exchange: &mut Exchange<L>,
        assets: (Address, Address),
        desired: (Amount, Amount),
        min: (Amount, Amount),
    ) -> Result<(Amount, Amount), DexError>
    where
        L: AssetLedger + Checkpoint,
    {
        let (asset_a, asset_b) = assets;
        let (desired_a, desired_b) = desired;
        let (min_a, min_b) = min;

        if exchange.registry().get_pool(asset_a, asset_b).is_none() {
            exchange.create_pool(asset_a, asset_b)?;
        }
        let (reserve_a, reserve_b) = get_reserves(exchange.registry(), asset_a, asset_b)?;
        if reserve_a.is_zero() && reserve_b.is_zero() {
            return Ok((desired_a, desired_b));
        }

        let optimal_b = quote(desired_a, reserve_a, reserve_b)?;
        if optimal_b <= desired_b {
            if optimal_b < min_b {
                return Err(DexError::InsufficientBAmount);
            }
            return Ok((desired_a, optimal_b));
        }
        let optimal_a = quote(desired_b, reserve_b, reserve_a)?;
        if optimal_a > desired_a || optimal_a < min_a {
            return Err(DexError::InsufficientAAmount);
        }
        Ok((optimal_a, desired_b))
    }

    /// Moves `value` native from `caller` to the router, wraps `used` of it
    /// into `pool` and refunds the rest.
    fn wrap_into<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        value: Amount,
        used: Amount,
        pool: Address,
    ) -> Result<(), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
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

    /// Burns the router's wrapped balance of `amount` and sends it to `to`
    /// as native value.
    pub(super) fn unwrap_to<L>(
        &self,
        exchange: &mut Exchange<L>,
        amount: Amount,
        to: Address,
    ) -> Result<(), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        let ledger = exchange.ledger_mut();
        ledger.withdraw(self.address, amount)?;
        ledger.transfer_native(self.address, to, amount)?;
        Ok(())
    }

    fn apply_permit<L>(
        &self,
        exchange: &mut Exchange<L>,
        pool: Address,
        owner: Address,
        shares: Amount,
        deadline: u64,
        permit: &PermitApproval,
    ) -> Result<(), DexError>
    where
        L: AssetLedger + Checkpoint,
    {
        let value = if permit.approve_max { Amount::MAX } else { shares };
        exchange.permit(pool, owner, self.address, value, deadline, &permit.signature)
    }

    fn remove<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        request: &RemoveLiquidity,
    ) -> Result<(Amount, Amount), DexError>
    where
        L: AssetLedger + Checkpoint,
    {
        let pool = self.pool_for(exchange, request.asset_a, request.asset_b)?;
        exchange.transfer_from(pool, self.address, caller, pool, request.shares)?;
        let (amount0, amount1) = exchange.burn(pool, self.address, request.to)?;
        let (token0, _) = sort_assets(request.asset_a, request.asset_b)?;
        let (amount_a, amount_b) = if request.asset_a == token0 {
            (amount0, amount1)
        } else {
            (amount1, amount0)
        };
        if amount_a < request.amount_a_min {
            return Err(DexError::InsufficientAAmount);
        }
        if amount_b < request.amount_b_min {
            return Err(DexError::InsufficientBAmount);
        }
        Ok((amount_a, amount_b))
    }

    fn remove_native<L>(
        &self,
        exchange: &mut Exchange<L>,
        caller: Address,
        request: &RemoveLiquidityNative,
    ) -> Result<(Amount, Amount), DexError>
    where
        L: AssetLedger + NativeWrapper + Checkpoint,
    {
        let inner = RemoveLiquidity {
            asset_a: request.asset,
            asset_b: self.wrapped_native,
            shares: request.shares,
            amount_a_min: request.amount_min,
            amount_b_min: request.native_min,
            to: self.address,
            deadline: request.deadline,
        };
        let (amount_asset, amount_native) = self.remove(exchange, caller, &inner)?;
        exchange
            .ledger_mut()
            .transfer(request.asset, self.address, request.to, amount_asset)?;
        self.unwrap_to(exchange, amount_native, request.to)?;
        Ok((amount_asset, amount_native))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use k256::ecdsa::SigningKey;

    use super::*;
    use crate::config::DexConfig;
    use crate::domain::signer_address;
    use crate::ledger::InMemoryLedger;

    const WETH: u8 = 0xEE;
    const TOKEN: u8 = 0x01;
    const OTHER: u8 = 0x02;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn setup(user: Address) -> (Exchange<InMemoryLedger>, Router) {
        let Ok(mut ex) = Exchange::new(DexConfig::default(), InMemoryLedger::new(addr(WETH)))
        else {
            panic!("valid config");
        };
        let router = Router::new(addr(0x0F), &ex);
        for asset in [TOKEN, OTHER] {
            let Ok(()) = ex.ledger_mut().mint(addr(asset), user, Amount::new(1_000_000)) else {
                panic!("fund");
            };
            ex.ledger_mut()
                .approve(addr(asset), user, router.address(), Amount::MAX);
        }
        let Ok(()) = ex.ledger_mut().credit_native(user, Amount::new(1_000_000)) else {
            panic!("fund native");
        };
        (ex, router)
    }

    fn add(token_a: u8, token_b: u8, a: u128, b: u128, user: Address) -> AddLiquidity {
        AddLiquidity {
            asset_a: addr(token_a),
            asset_b: addr(token_b),
            amount_a_desired: Amount::new(a),
            amount_b_desired: Amount::new(b),
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            to: user,
            deadline: 100,
        }
    }

    // -- add ------------------------------------------------------------------

    #[test]
    fn add_creates_pool_and_mints() {
        let user = addr(0xA1);
        let (mut ex, router) = setup(user);
        let r = router.add_liquidity(&mut ex, user, &add(TOKEN, OTHER, 500, 5_000, user));
        assert_eq!(r, Ok((Amount::new(500), Amount::new(5_000), Amount::new(1_581))));
        assert_eq!(ex.registry().pool_count(), 1);
    }

    #[test]
    fn second_add_uses_pool_ratio() {
        let user = addr(0xA1);
        let (mut ex, router) = setup(user);
        assert!(router
            .add_liquidity(&mut ex, user, &add(TOKEN, OTHER, 500, 5_000, user))
            .is_ok());
        // 100 of TOKEN matches 1_000 of OTHER; 2_000 desired is trimmed
        let r = router.add_liquidity(&mut ex, user, &add(TOKEN, OTHER, 100, 2_000, user));
        let Ok((a, b, _)) = r else {
            panic!("second add");
        };
        assert_eq!((a, b), (Amount::new(100), Amount::new(1_000)));
    }

    #[test]
    fn add_below_minimum_rejected() {
        let user = addr(0xA1);
        let (mut ex, router) = setup(user);
        assert!(router
            .add_liquidity(&mut ex, user, &add(TOKEN, OTHER, 500, 5_000, user))
            .is_ok());
        let mut req = add(TOKEN, OTHER, 100, 2_000, user);
        req.amount_b_min = Amount::new(1_500);
        assert_eq!(
            router.add_liquidity(&mut ex, user, &req),
            Err(DexError::InsufficientBAmount)
        );
    }

    #[test]
    fn expired_deadline() {
        let user = addr(0xA1);
        let (mut ex, router) = setup(user);
        ex.set_timestamp(101);
        assert_eq!(
            router.add_liquidity(&mut ex, user, &add(TOKEN, OTHER, 500, 5_000, user)),
            Err(DexError::Expired)
        );
        assert_eq!(ex.registry().pool_count(), 0);
    }

    #[test]
    fn add_native_refunds_excess() {
        let user = addr(0xA1);
        let (mut ex, router) = setup(user);
        let first = AddLiquidityNative {
            asset: addr(TOKEN),
            amount_desired: Amount::new(1_000),
            amount_min: Amount::ZERO,
            native_min: Amount::ZERO,
            to: user,
            deadline: 100,
        };
        assert!(router
            .add_liquidity_native(&mut ex, user, &first, Amount::new(2_000))
            .is_ok());

        let second = AddLiquidityNative {
            amount_desired: Amount::new(100),
            ..first
        };
        let r = router.add_liquidity_native(&mut ex, user, &second, Amount::new(500));
        let Ok((asset, native, _)) = r else {
            panic!("second add");
        };
        assert_eq!((asset, native), (Amount::new(100), Amount::new(200)));
        assert_eq!(
            ex.ledger().native_balance_of(user),
            Amount::new(1_000_000 - 2_000 - 200)
        );
        assert_eq!(ex.ledger().native_balance_of(router.address()), Amount::ZERO);
    }

    // -- remove ---------------------------------------------------------------

    #[test]
    fn remove_needs_share_allowance() {
        let user = addr(0xA1);
        let (mut ex, router) = setup(user);
        assert!(router
            .add_liquidity(&mut ex, user, &add(TOKEN, OTHER, 400, 900, user))
            .is_ok());
        let req = RemoveLiquidity {
            asset_a: addr(OTHER),
            asset_b: addr(TOKEN),
            shares: Amount::new(300),
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            to: user,
            deadline: 100,
        };
        assert!(router.remove_liquidity(&mut ex, user, &req).is_err());

        let Some(pool) = ex.registry().get_pool(addr(TOKEN), addr(OTHER)) else {
            panic!("pool");
        };
        assert!(ex.approve(pool, user, router.address(), Amount::new(300)).is_ok());
        // half the supply of 600, ordered as (OTHER, TOKEN)
        assert_eq!(
            router.remove_liquidity(&mut ex, user, &req),
            Ok((Amount::new(450), Amount::new(200)))
        );
    }

    #[test]
    fn remove_native_with_permit() {
        let Ok(key) = SigningKey::from_slice(&[0x22; 32]) else {
            panic!("valid scalar");
        };
        let user = signer_address(key.verifying_key());
        let (mut ex, router) = setup(user);
        let add_req = AddLiquidityNative {
            asset: addr(TOKEN),
            amount_desired: Amount::new(400),
            amount_min: Amount::ZERO,
            native_min: Amount::ZERO,
            to: user,
            deadline: 100,
        };
        assert!(router
            .add_liquidity_native(&mut ex, user, &add_req, Amount::new(900))
            .is_ok());
        let Some(pool) = ex.registry().get_pool(addr(TOKEN), addr(WETH)) else {
            panic!("pool");
        };

        let Ok(digest) = ex
            .pool(pool)
            .map(|p| p.shares().permit_digest(user, router.address(), Amount::MAX, 0, 100))
        else {
            panic!("pool");
        };
        let Ok((sig, recid)) = key.sign_prehash_recoverable(&digest) else {
            panic!("sign");
        };
        let bytes = sig.to_bytes();
        let (mut r, mut s) = ([0u8; 32], [0u8; 32]);
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        let permit = PermitApproval {
            approve_max: true,
            signature: PermitSignature::new(recid.to_byte(), r, s),
        };

        let req = RemoveLiquidityNative {
            asset: addr(TOKEN),
            shares: Amount::new(600),
            amount_min: Amount::ZERO,
            native_min: Amount::ZERO,
            to: user,
            deadline: 100,
        };
        let r = router.remove_liquidity_native_with_permit(&mut ex, user, &req, &permit);
        assert_eq!(r, Ok((Amount::new(400), Amount::new(900))));
        assert_eq!(ex.ledger().native_balance_of(user), Amount::new(1_000_000));
        assert_eq!(ex.ledger().native_balance_of(router.address()), Amount::ZERO);
        assert_eq!(
            ex.pool(pool).map(|p| p.shares().allowance(user, router.address())),
            Ok(Amount::MAX)
        );
    }
}

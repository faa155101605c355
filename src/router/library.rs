//! Pure quoting helpers shared by the router and off-line callers.
//!
//! Amount functions dispatch on the pool's [`PricingPolicy`]:
//!
//! | Policy | `get_amount_out` | `get_amount_in` |
//! |--------|------------------|-----------------|
//! | constant product | [`constant_product_out`] | [`constant_product_in`] |
//! | fixed initial ratio | [`fixed_ratio_out`] | [`fixed_ratio_in`] |
//!
//! Path functions return one amount per asset in the path, so
//! `amounts[0]` is what goes into the first pool and `amounts[n − 1]` is
//! what leaves the last.

use crate::domain::{Address, Amount, AssetPair, PricingPolicy, Rounding};
use crate::error::DexError;
use crate::factory::{pool_address, Registry};
use crate::math::mul_div;
use crate::pools::{constant_product_in, constant_product_out, fixed_ratio_in, fixed_ratio_out, Pool};

/// Returns `(a, b)` in canonical order.
///
/// # Errors
///
/// Propagates [`AssetPair::new`].
pub fn sort_assets(a: Address, b: Address) -> Result<(Address, Address), DexError> {
    let pair = AssetPair::new(a, b)?;
    Ok((pair.token0(), pair.token1()))
}

/// Pool address for `(a, b)` under `registry`, computed without lookup.
///
/// # Errors
///
/// Propagates [`AssetPair::new`].
pub fn pool_for(registry: Address, a: Address, b: Address) -> Result<Address, DexError> {
    pool_address(registry, a, b)
}

/// Equivalent amount of the other asset at the current reserve ratio:
/// `amount_a × reserve_b / reserve_a`.
///
/// # Errors
///
/// - [`DexError::InsufficientInputAmount`] for a zero amount.
/// - [`DexError::InsufficientLiquidity`] for an empty reserve.
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, DexError> {
    if amount_a.is_zero() {
        return Err(DexError::InsufficientInputAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(DexError::InsufficientLiquidity);
    }
    mul_div(amount_a, reserve_b, reserve_a, Rounding::Down)
}

/// Reserves of the `(a, b)` pool, ordered as `(reserve_a, reserve_b)`.
///
/// # Errors
///
/// Returns [`DexError::PoolNotFound`] if no pool exists for the pair.
pub fn get_reserves(registry: &Registry, a: Address, b: Address) -> Result<(Amount, Amount), DexError> {
    let pool = hop_pool(registry, a, b)?;
    let o = pool.orient(a)?;
    Ok((o.reserve_in, o.reserve_out))
}

/// Output of `pool` for `amount_in` of `asset_in`.
///
/// # Errors
///
/// - [`DexError::InsufficientInputAmount`] for a zero input.
/// - [`DexError::InsufficientLiquidity`] for an empty pool or, under the
///   fixed ratio, an output that would reach the reserve.
/// - [`DexError::InvalidPath`] if `asset_in` is not in the pool.
pub fn get_amount_out(pool: &Pool, asset_in: Address, amount_in: Amount) -> Result<Amount, DexError> {
    let o = pool.orient(asset_in)?;
    match pool.policy() {
        PricingPolicy::ConstantProduct { fee } => {
            constant_product_out(amount_in, o.reserve_in, o.reserve_out, fee)
        }
        PricingPolicy::FixedInitialRatio => {
            if amount_in.is_zero() {
                return Err(DexError::InsufficientInputAmount);
            }
            let out = fixed_ratio_out(amount_in, o.initial_in, o.initial_out)?;
            if out >= o.reserve_out {
                return Err(DexError::InsufficientLiquidity);
            }
            Ok(out)
        }
    }
}

/// Input of `asset_in` that `pool` needs to pay out `amount_out` of the
/// other asset.
///
/// # Errors
///
/// - [`DexError::InsufficientOutputAmount`] for a zero output.
/// - [`DexError::InsufficientLiquidity`] if `amount_out` reaches the
///   reserve.
/// - [`DexError::InvalidInputOutput`] under the fixed ratio when no
///   integer input yields exactly `amount_out`.
pub fn get_amount_in(pool: &Pool, asset_in: Address, amount_out: Amount) -> Result<Amount, DexError> {
    let o = pool.orient(asset_in)?;
    match pool.policy() {
        PricingPolicy::ConstantProduct { fee } => {
            constant_product_in(amount_out, o.reserve_in, o.reserve_out, fee)
        }
        PricingPolicy::FixedInitialRatio => {
            if amount_out.is_zero() {
                return Err(DexError::InsufficientOutputAmount);
            }
            if amount_out >= o.reserve_out {
                return Err(DexError::InsufficientLiquidity);
            }
            fixed_ratio_in(amount_out, o.initial_in, o.initial_out)
        }
    }
}

/// Chained outputs along `path` for `amount_in`.
///
/// # Errors
///
/// - [`DexError::InvalidPath`] for fewer than two assets.
/// - [`DexError::PoolNotFound`] for a hop without a pool.
/// - Any [`get_amount_out`] error.
pub fn get_amounts_out(
    registry: &Registry,
    amount_in: Amount,
    path: &[Address],
) -> Result<Vec<Amount>, DexError> {
    if path.len() < 2 {
        return Err(DexError::InvalidPath);
    }
    let mut amounts = Vec::with_capacity(path.len());
    amounts.push(amount_in);
    let mut current = amount_in;
    for hop in path.windows(2) {
        let pool = hop_pool(registry, hop[0], hop[1])?;
        current = get_amount_out(pool, hop[0], current)?;
        amounts.push(current);
    }
    Ok(amounts)
}

/// Chained inputs along `path` for `amount_out`, computed backwards.
///
/// # Errors
///
/// - [`DexError::InvalidPath`] for fewer than two assets.
/// - [`DexError::PoolNotFound`] for a hop without a pool.
/// - Any [`get_amount_in`] error.
pub fn get_amounts_in(
    registry: &Registry,
    amount_out: Amount,
    path: &[Address],
) -> Result<Vec<Amount>, DexError> {
    if path.len() < 2 {
        return Err(DexError::InvalidPath);
    }
    let mut amounts = vec![Amount::ZERO; path.len()];
    let mut current = amount_out;
    amounts[path.len() - 1] = current;
    for (i, hop) in path.windows(2).enumerate().rev() {
        let pool = hop_pool(registry, hop[0], hop[1])?;
        current = get_amount_in(pool, hop[0], current)?;
        amounts[i] = current;
    }
    Ok(amounts)
}

pub(crate) fn hop_pool(registry: &Registry, a: Address, b: Address) -> Result<&Pool, DexError> {
    if a == b {
        return Err(DexError::IdenticalAssets);
    }
    registry
        .get_pool(a, b)
        .and_then(|p| registry.pool(p))
        .ok_or(DexError::PoolNotFound)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::DexConfig;
    use crate::domain::SwapFee;
    use crate::exchange::Exchange;
    use crate::ledger::InMemoryLedger;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn seed(
        ex: &mut Exchange<InMemoryLedger>,
        x: u8,
        y: u8,
        policy: PricingPolicy,
        rx: u128,
        ry: u128,
    ) -> Address {
        let Ok(pool) = ex.create_pool_with_policy(addr(x), addr(y), policy) else {
            panic!("created");
        };
        let (Ok(()), Ok(())) = (
            ex.ledger_mut().mint(addr(x), pool, Amount::new(rx)),
            ex.ledger_mut().mint(addr(y), pool, Amount::new(ry)),
        ) else {
            panic!("fund");
        };
        let Ok(_) = ex.mint(pool, addr(0xA1), addr(0xA1)) else {
            panic!("mint");
        };
        pool
    }

    fn exchange() -> Exchange<InMemoryLedger> {
        let Ok(ex) = Exchange::new(DexConfig::default(), InMemoryLedger::new(addr(0xEE))) else {
            panic!("valid config");
        };
        ex
    }

    // -- basics ---------------------------------------------------------------

    #[test]
    fn sort_and_pool_for() {
        assert_eq!(sort_assets(addr(9), addr(3)), Ok((addr(3), addr(9))));
        assert_eq!(sort_assets(addr(3), addr(3)), Err(DexError::IdenticalAssets));
        let registry = addr(0xF0);
        assert_eq!(
            pool_for(registry, addr(9), addr(3)),
            pool_for(registry, addr(3), addr(9))
        );
    }

    #[test]
    fn quote_is_proportional() {
        assert_eq!(
            quote(Amount::new(10), Amount::new(100), Amount::new(250)),
            Ok(Amount::new(25))
        );
        assert_eq!(
            quote(Amount::ZERO, Amount::new(1), Amount::new(1)),
            Err(DexError::InsufficientInputAmount)
        );
        assert_eq!(
            quote(Amount::new(1), Amount::ZERO, Amount::new(1)),
            Err(DexError::InsufficientLiquidity)
        );
    }

    // -- single hop -----------------------------------------------------------

    #[test]
    fn fixed_ratio_amounts_both_directions() {
        let mut ex = exchange();
        let pool = seed(&mut ex, 1, 2, PricingPolicy::FixedInitialRatio, 500, 5_000);
        let Ok(p) = ex.pool(pool) else {
            panic!("pool");
        };
        assert_eq!(get_amount_out(p, addr(1), Amount::new(10)), Ok(Amount::new(100)));
        assert_eq!(get_amount_out(p, addr(2), Amount::new(100)), Ok(Amount::new(10)));
        assert_eq!(get_amount_in(p, addr(1), Amount::new(100)), Ok(Amount::new(10)));
        assert_eq!(
            get_amount_out(p, addr(1), Amount::new(500)),
            Err(DexError::InsufficientLiquidity)
        );
        assert_eq!(get_amount_out(p, addr(7), Amount::new(1)), Err(DexError::InvalidPath));
    }

    #[test]
    fn constant_product_amounts() {
        let mut ex = exchange();
        let policy = PricingPolicy::constant_product(SwapFee::STANDARD);
        let pool = seed(&mut ex, 1, 2, policy, 5_000_000, 10_000_000);
        let Ok(p) = ex.pool(pool) else {
            panic!("pool");
        };
        assert_eq!(
            get_amount_out(p, addr(1), Amount::new(1_000_000)),
            Ok(Amount::new(1_662_497))
        );
        let Ok(needed) = get_amount_in(p, addr(1), Amount::new(1_662_497)) else {
            panic!("quote");
        };
        assert!(needed <= Amount::new(1_000_000));
        assert_eq!(
            get_reserves(ex.registry(), addr(2), addr(1)),
            Ok((Amount::new(10_000_000), Amount::new(5_000_000)))
        );
    }

    // -- paths ----------------------------------------------------------------

    #[test]
    fn path_amounts_chain() {
        let mut ex = exchange();
        seed(&mut ex, 1, 2, PricingPolicy::FixedInitialRatio, 1_000, 2_000);
        seed(&mut ex, 2, 3, PricingPolicy::FixedInitialRatio, 1_000, 3_000);
        let path = [addr(1), addr(2), addr(3)];
        assert_eq!(
            get_amounts_out(ex.registry(), Amount::new(10), &path),
            Ok(vec![Amount::new(10), Amount::new(20), Amount::new(60)])
        );
        assert_eq!(
            get_amounts_in(ex.registry(), Amount::new(60), &path),
            Ok(vec![Amount::new(10), Amount::new(20), Amount::new(60)])
        );
    }

    #[test]
    fn bad_paths() {
        let ex = exchange();
        assert_eq!(
            get_amounts_out(ex.registry(), Amount::new(1), &[addr(1)]),
            Err(DexError::InvalidPath)
        );
        assert_eq!(
            get_amounts_in(ex.registry(), Amount::new(1), &[addr(1), addr(2)]),
            Err(DexError::PoolNotFound)
        );
    }
}

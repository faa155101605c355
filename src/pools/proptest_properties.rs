//! Property-based tests using `proptest` for pool invariants.
//!
//! 1. **Share conservation**: balances always sum to the total supply, and
//!    a full withdrawal never returns more than was deposited.
//! 2. **Constant-product monotonicity**: more input never yields less
//!    output, and `k` never shrinks across a swap.
//! 3. **Fixed-rate exactness**: with an integral rate every quoted swap
//!    passes and one unit more output fails.
//! 4. **No full drain**: a quote never reaches the output reserve.
//! 5. **Registry symmetry**: lookups and derived addresses ignore order.
//! 6. **Burn then mint**: redepositing what a burn returned restores the
//!    reserves.

use proptest::prelude::*;

use crate::config::DexConfig;
use crate::domain::{Address, Amount, PricingPolicy, SwapFee};
use crate::error::DexError;
use crate::exchange::Exchange;
use crate::factory::pool_address;
use crate::ledger::InMemoryLedger;
use crate::router::library::get_amount_out;
use crate::traits::AssetLedger;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn tok_a() -> Address {
    Address::from_bytes([1u8; 20])
}

fn tok_b() -> Address {
    Address::from_bytes([2u8; 20])
}

fn lp() -> Address {
    Address::from_bytes([0xA1; 20])
}

fn trader() -> Address {
    Address::from_bytes([0xB0; 20])
}

fn cp() -> PricingPolicy {
    PricingPolicy::constant_product(SwapFee::STANDARD)
}

fn exchange() -> Exchange<InMemoryLedger> {
    let Ok(ex) = Exchange::new(
        DexConfig::default(),
        InMemoryLedger::new(Address::from_bytes([0xEE; 20])),
    ) else {
        panic!("valid config");
    };
    ex
}

/// Pool seeded by `lp()` with `ra` of `tok_a` and `rb` of `tok_b`.
fn make_pool(policy: PricingPolicy, ra: u128, rb: u128) -> Option<(Exchange<InMemoryLedger>, Address)> {
    let mut ex = exchange();
    let pool = ex.create_pool_with_policy(tok_a(), tok_b(), policy).ok()?;
    deposit(&mut ex, pool, ra, rb).ok()?;
    Some((ex, pool))
}

fn deposit(
    ex: &mut Exchange<InMemoryLedger>,
    pool: Address,
    a: u128,
    b: u128,
) -> Result<Amount, DexError> {
    ex.ledger_mut().mint(tok_a(), pool, Amount::new(a))?;
    ex.ledger_mut().mint(tok_b(), pool, Amount::new(b))?;
    ex.mint(pool, lp(), lp())
}

fn reserves(ex: &Exchange<InMemoryLedger>, pool: Address) -> (Amount, Amount) {
    let Ok(p) = ex.pool(pool) else {
        panic!("pool exists");
    };
    let (r0, r1, _) = p.reserves();
    (r0, r1)
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=10_000_000u128
}

fn trade_strategy() -> impl Strategy<Value = u128> {
    1u128..=100_000u128
}

fn policy_strategy() -> impl Strategy<Value = PricingPolicy> {
    prop_oneof![Just(PricingPolicy::FixedInitialRatio), Just(cp())]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Property 1: share conservation

    #[test]
    fn prop_full_withdrawal_never_profits(
        policy in policy_strategy(),
        ra in reserve_strategy(),
        rb in reserve_strategy(),
    ) {
        let Some((mut ex, pool)) = make_pool(policy, ra, rb) else {
            return Ok(());
        };
        let Ok(p) = ex.pool(pool) else {
            return Ok(());
        };
        let shares = p.shares().balance_of(lp());
        let floor = p.shares().balance_of(Address::ZERO);
        prop_assert_eq!(shares.get() + floor.get(), p.shares().total_supply().get());

        let Ok(()) = ex.transfer(pool, lp(), pool, shares) else {
            return Ok(());
        };
        let Ok((a, b)) = ex.burn(pool, lp(), lp()) else {
            return Ok(());
        };
        prop_assert!(a.get() <= ra && b.get() <= rb, "withdrew {a}/{b} from {ra}/{rb}");
        let (r0, r1) = reserves(&ex, pool);
        prop_assert_eq!(r0.get() + a.get(), ra);
        prop_assert_eq!(r1.get() + b.get(), rb);
    }

    // Property 2: constant-product monotonicity

    #[test]
    fn prop_cp_output_monotone(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        x in trade_strategy(),
        dx in trade_strategy(),
    ) {
        let Some((ex, pool)) = make_pool(cp(), ra, rb) else {
            return Ok(());
        };
        let Ok(p) = ex.pool(pool) else {
            return Ok(());
        };
        let (Ok(small), Ok(large)) = (
            get_amount_out(p, tok_a(), Amount::new(x)),
            get_amount_out(p, tok_a(), Amount::new(x + dx)),
        ) else {
            return Ok(());
        };
        prop_assert!(large >= small, "out({}) = {} < out({}) = {}", x + dx, large, x, small);
    }

    #[test]
    fn prop_cp_k_never_decreases(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        x in trade_strategy(),
    ) {
        let Some((mut ex, pool)) = make_pool(cp(), ra, rb) else {
            return Ok(());
        };
        let (r0, r1) = reserves(&ex, pool);
        let k_before = r0.to_u256() * r1.to_u256();
        let Ok(out) = ex.pool(pool).and_then(|p| get_amount_out(p, tok_a(), Amount::new(x))) else {
            return Ok(());
        };
        if out.is_zero() {
            return Ok(());
        }
        let Ok(()) = ex.ledger_mut().mint(tok_a(), pool, Amount::new(x)) else {
            return Ok(());
        };
        prop_assert_eq!(ex.swap(pool, trader(), Amount::ZERO, out, trader(), None), Ok(()));
        let (n0, n1) = reserves(&ex, pool);
        prop_assert!(n0.to_u256() * n1.to_u256() >= k_before);
    }

    // Property 3: fixed-rate exactness

    #[test]
    fn prop_fixed_rate_exact(
        base in 2_000u128..=100_000u128,
        rate in 1u128..=50u128,
        x in 1u128..=999u128,
    ) {
        let Some((mut ex, pool)) = make_pool(PricingPolicy::FixedInitialRatio, base, base * rate) else {
            return Ok(());
        };
        let Ok(()) = ex.ledger_mut().mint(tok_a(), pool, Amount::new(x)) else {
            return Ok(());
        };
        let greedy = ex.swap(pool, trader(), Amount::ZERO, Amount::new(x * rate + 1), trader(), None);
        prop_assert_eq!(greedy, Err(DexError::InvalidInputOutput));
        let exact = ex.swap(pool, trader(), Amount::ZERO, Amount::new(x * rate), trader(), None);
        prop_assert_eq!(exact, Ok(()));
        prop_assert_eq!(ex.ledger().balance_of(tok_b(), trader()), Amount::new(x * rate));
    }

    // Property 4: no full drain

    #[test]
    fn prop_quote_never_drains(
        policy in policy_strategy(),
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        x in 1u128..=u128::from(u64::MAX),
    ) {
        let Some((ex, pool)) = make_pool(policy, ra, rb) else {
            return Ok(());
        };
        let Ok(p) = ex.pool(pool) else {
            return Ok(());
        };
        match get_amount_out(p, tok_a(), Amount::new(x)) {
            Ok(out) => prop_assert!(out.get() < rb),
            Err(e) => prop_assert_eq!(e, DexError::InsufficientLiquidity),
        }
    }

    // Property 5: registry symmetry

    #[test]
    fn prop_registry_symmetric(a in 1u8..=255u8, b in 1u8..=255u8) {
        prop_assume!(a != b);
        let (x, y) = (Address::from_bytes([a; 20]), Address::from_bytes([b; 20]));
        let mut ex = exchange();
        let Ok(pool) = ex.create_pool(x, y) else {
            return Ok(());
        };
        prop_assert_eq!(ex.registry().get_pool(x, y), Some(pool));
        prop_assert_eq!(ex.registry().get_pool(y, x), Some(pool));
        prop_assert_eq!(pool_address(ex.registry().address(), y, x), Ok(pool));
        prop_assert_eq!(ex.create_pool(y, x), Err(DexError::PoolExists));
    }

    // Property 6: burn then mint restores reserves

    #[test]
    fn prop_burn_then_mint_restores(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        part in 1u128..=100u128,
    ) {
        let Some((mut ex, pool)) = make_pool(PricingPolicy::FixedInitialRatio, ra, rb) else {
            return Ok(());
        };
        let before = reserves(&ex, pool);
        let Ok(p) = ex.pool(pool) else {
            return Ok(());
        };
        let shares = Amount::new(p.shares().balance_of(lp()).get() * part / 100);
        let Ok(()) = ex.transfer(pool, lp(), pool, shares) else {
            return Ok(());
        };
        let Ok((a, b)) = ex.burn(pool, lp(), lp()) else {
            return Ok(());
        };
        let Ok(_) = deposit(&mut ex, pool, a.get(), b.get()) else {
            return Ok(());
        };
        prop_assert_eq!(reserves(&ex, pool), before);
    }
}

//! Fixed-initial-ratio pool example.
//!
//! Seeds a pool at 1 A : 10 B, swaps through the router at exactly that
//! rate, then shows that a direct swap asking for a different output is
//! rejected and leaves the pool untouched.
//!
//! # Run
//!
//! ```bash
//! cargo run --example fixed_ratio
//! ```

use hydra_dex::config::DexConfig;
use hydra_dex::domain::{Address, Amount, PricingPolicy};
use hydra_dex::exchange::Exchange;
use hydra_dex::ledger::InMemoryLedger;
use hydra_dex::router::{AddLiquidity, Router};
use hydra_dex::traits::AssetLedger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fixed Initial Ratio ===\n");

    // ── 1. Accounts and assets ──────────────────────────────────────────
    let tok_a = Address::from_bytes([0x0A; 20]);
    let tok_b = Address::from_bytes([0x0B; 20]);
    let alice = Address::from_bytes([0xA1; 20]);
    let bob = Address::from_bytes([0xB0; 20]);
    let deadline = 1_000;

    // ── 2. Exchange, router and funding ─────────────────────────────────
    let config = DexConfig::new(Address::from_bytes([0x5E; 20]), PricingPolicy::FixedInitialRatio)?;
    let mut ex = Exchange::new(config, InMemoryLedger::new(Address::from_bytes([0xEE; 20])))?;
    let router = Router::new(Address::from_bytes([0x0F; 20]), &ex);
    for user in [alice, bob] {
        for asset in [tok_a, tok_b] {
            ex.ledger_mut().mint(asset, user, Amount::new(1_000_000))?;
            ex.ledger_mut().approve(asset, user, router.address(), Amount::MAX);
        }
    }

    // ── 3. Seed the pool: the first deposit fixes the rate ──────────────
    let seed = AddLiquidity {
        asset_a: tok_a,
        asset_b: tok_b,
        amount_a_desired: Amount::new(500),
        amount_b_desired: Amount::new(5_000),
        amount_a_min: Amount::ZERO,
        amount_b_min: Amount::ZERO,
        to: alice,
        deadline,
    };
    let (used_a, used_b, shares) = router.add_liquidity(&mut ex, alice, &seed)?;
    let pool = ex
        .registry()
        .get_pool(tok_a, tok_b)
        .ok_or("pool was not registered")?;
    println!("Seeded pool {pool}");
    println!("  deposited:   {used_a} A + {used_b} B");
    println!("  shares:      {shares}");
    println!("  fixed rate:  {:?}", ex.pool(pool)?.initial_reserves());

    // ── 4. Swap at the fixed rate through the router ────────────────────
    let amounts = router.swap_exact_tokens_for_tokens(
        &mut ex,
        bob,
        Amount::new(10),
        Amount::new(100),
        &[tok_a, tok_b],
        bob,
        deadline,
    )?;
    println!("\nBob swapped {} A for {} B", amounts[0], amounts[1]);

    // ── 5. An off-ratio request is rejected ─────────────────────────────
    //    tok_a sorts first, so B is side 1 of the pool.
    let before = ex.pool(pool)?.reserves();
    ex.ledger_mut().transfer(tok_a, bob, pool, Amount::new(10))?;
    match ex.swap(pool, bob, Amount::ZERO, Amount::new(99), bob, None) {
        Ok(()) => println!("\nUnexpected: 10 A for 99 B was accepted"),
        Err(err) => println!("\n10 A for 99 B rejected: {err}"),
    }
    println!("  reserves unchanged: {}", ex.pool(pool)?.reserves() == before);

    // Bob takes the stray deposit back.
    ex.skim(pool, bob)?;
    println!("  A balance of bob:   {}", ex.ledger().balance_of(tok_a, bob));

    println!("\n=== Done ===");
    Ok(())
}

//! Multi-hop routing example.
//!
//! Builds two constant-product pools, A/B and B/C, quotes an exact-input
//! trade along A → B → C and executes it through the router.
//!
//! # Run
//!
//! ```bash
//! cargo run --example router
//! ```

use hydra_dex::config::DexConfig;
use hydra_dex::domain::{Address, Amount, PricingPolicy, SwapFee};
use hydra_dex::exchange::Exchange;
use hydra_dex::ledger::InMemoryLedger;
use hydra_dex::router::library::get_amounts_out;
use hydra_dex::router::{AddLiquidity, Router};
use hydra_dex::traits::AssetLedger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Multi-hop Router ===\n");

    // ── 1. Accounts and assets ──────────────────────────────────────────
    let tok_a = Address::from_bytes([0x0A; 20]);
    let tok_b = Address::from_bytes([0x0B; 20]);
    let tok_c = Address::from_bytes([0x0C; 20]);
    let lp = Address::from_bytes([0xA1; 20]);
    let trader = Address::from_bytes([0xB0; 20]);
    let deadline = 1_000;

    // ── 2. Constant-product exchange with a 0.3% fee ────────────────────
    let policy = PricingPolicy::constant_product(SwapFee::STANDARD);
    let config = DexConfig::new(Address::from_bytes([0x5E; 20]), policy)?;
    let mut ex = Exchange::new(config, InMemoryLedger::new(Address::from_bytes([0xEE; 20])))?;
    let router = Router::new(Address::from_bytes([0x0F; 20]), &ex);
    for user in [lp, trader] {
        for asset in [tok_a, tok_b, tok_c] {
            ex.ledger_mut().mint(asset, user, Amount::new(100_000_000))?;
            ex.ledger_mut().approve(asset, user, router.address(), Amount::MAX);
        }
    }

    // ── 3. Liquidity: A/B at 1:2, B/C at 1:4 ────────────────────────────
    for (x, y, amount_x, amount_y) in [
        (tok_a, tok_b, 1_000_000, 2_000_000),
        (tok_b, tok_c, 1_000_000, 4_000_000),
    ] {
        let request = AddLiquidity {
            asset_a: x,
            asset_b: y,
            amount_a_desired: Amount::new(amount_x),
            amount_b_desired: Amount::new(amount_y),
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            to: lp,
            deadline,
        };
        let (_, _, shares) = router.add_liquidity(&mut ex, lp, &request)?;
        println!("Pool {x}/{y}: {amount_x} + {amount_y}, {shares} shares");
    }

    // ── 4. Quote A → B → C ──────────────────────────────────────────────
    let path = [tok_a, tok_b, tok_c];
    let amount_in = Amount::new(10_000);
    let quote = get_amounts_out(ex.registry(), amount_in, &path)?;
    println!("\nQuote for {amount_in} A along A → B → C:");
    for (asset, amount) in path.iter().zip(&quote) {
        println!("  {asset}: {amount}");
    }

    // ── 5. Execute with a 1% slippage bound ─────────────────────────────
    let expected = quote.last().copied().unwrap_or(Amount::ZERO);
    let min_out = Amount::new(expected.get() - expected.get() / 100);
    let c_before = ex.ledger().balance_of(tok_c, trader);
    let amounts = router.swap_exact_tokens_for_tokens(
        &mut ex, trader, amount_in, min_out, &path, trader, deadline,
    )?;
    let received = ex.ledger().balance_of(tok_c, trader).get() - c_before.get();
    println!("\nExecuted hops: {amounts:?}");
    println!("Trader received {received} C (minimum {min_out})");

    // ── 6. Pool state after the trade ───────────────────────────────────
    for (x, y) in [(tok_a, tok_b), (tok_b, tok_c)] {
        let pool = ex.registry().get_pool(x, y).ok_or("pool was not registered")?;
        let (r0, r1, _) = ex.pool(pool)?.reserves();
        println!("  {pool}: reserves {r0} / {r1}");
    }

    println!("\n=== Done ===");
    Ok(())
}

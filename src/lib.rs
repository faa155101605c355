//! # Hydra DEX
//!
//! Two-asset liquidity pools, a deterministic pool registry and a
//! multi-hop router, all driven through a single owned [`Exchange`](exchange::Exchange).
//!
//! Every pool runs one of two pricing policies:
//!
//! - **Fixed initial ratio**: the first deposit fixes an exchange rate that
//!   every later swap must match exactly, with no fee.
//! - **Constant product** (Uniswap v2 style): `x × y` may not shrink after a
//!   fee-adjusted swap; an optional protocol fee accrues on liquidity
//!   events.
//!
//! # Quick Start
//!
//! ```rust
//! use hydra_dex::config::DexConfig;
//! use hydra_dex::domain::{Address, Amount};
//! use hydra_dex::exchange::Exchange;
//! use hydra_dex::ledger::InMemoryLedger;
//! use hydra_dex::router::Router;
//! use hydra_dex::traits::AssetLedger;
//!
//! let weth = Address::from_bytes([0xEE; 20]);
//! let (usdc, dai) = (Address::from_bytes([1u8; 20]), Address::from_bytes([2u8; 20]));
//! let alice = Address::from_bytes([0xA1; 20]);
//!
//! // 1. An exchange over an in-memory ledger
//! let mut ex = Exchange::new(DexConfig::default(), InMemoryLedger::new(weth)).expect("valid config");
//! let router = Router::new(Address::from_bytes([0x0F; 20]), &ex);
//!
//! // 2. Fund alice and let the router pull her assets
//! for asset in [usdc, dai] {
//!     ex.ledger_mut().mint(asset, alice, Amount::new(10_000)).expect("fits");
//!     ex.ledger_mut().approve(asset, alice, router.address(), Amount::MAX);
//! }
//!
//! // 3. Seed a fixed-ratio pool at 1 USDC : 10 DAI
//! let (a, b, shares) = router
//!     .add_liquidity(
//!         &mut ex,
//!         alice,
//!         &hydra_dex::router::AddLiquidity {
//!             asset_a: usdc,
//!             asset_b: dai,
//!             amount_a_desired: Amount::new(500),
//!             amount_b_desired: Amount::new(5_000),
//!             amount_a_min: Amount::ZERO,
//!             amount_b_min: Amount::ZERO,
//!             to: alice,
//!             deadline: 60,
//!         },
//!     )
//!     .expect("first deposit");
//! assert_eq!((a.get(), b.get(), shares.get()), (500, 5_000, 1_581));
//!
//! // 4. Swap exactly 10 USDC for exactly 100 DAI
//! let amounts = router
//!     .swap_exact_tokens_for_tokens(&mut ex, alice, Amount::new(10), Amount::new(100), &[usdc, dai], alice, 60)
//!     .expect("swap");
//! assert_eq!(amounts, vec![Amount::new(10), Amount::new(100)]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Router     │  deadlines, ratio fitting, paths, native wrapping
//! └──────┬──────┘
//!        │ &mut Exchange (atomic per call)
//!        ▼
//! ┌─────────────┐
//! │  Exchange    │  checkpoints, locks, events, ledger access
//! └──────┬──────┘
//!        │ owns
//!        ▼
//! ┌─────────────┐
//! │  Registry    │  pair → pool, creation order, protocol fee switch
//! └──────┬──────┘
//!        │ owns
//!        ▼
//! ┌─────────────┐
//! │    Pools     │  reserves, shares, accumulators, pricing policy
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Address`](domain::Address), [`Amount`](domain::Amount), [`PricingPolicy`](domain::PricingPolicy), … |
//! | [`traits`] | Collaborator seams: [`AssetLedger`](traits::AssetLedger), [`NativeWrapper`](traits::NativeWrapper), [`SwapCallback`](traits::SwapCallback) |
//! | [`config`] | [`DexConfig`](config::DexConfig) and the per-pool [`PoolConfig`](config::PoolConfig) |
//! | [`pools`] | [`Pool`](pools::Pool) state, share token and pricing arithmetic |
//! | [`factory`] | [`Registry`](factory::Registry) and deterministic pool addresses |
//! | [`exchange`] | [`Exchange`](exchange::Exchange): the single mutable entry point |
//! | [`router`] | [`Router`](router::Router) façade and the quoting [`library`](router::library) |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) reference collaborator |
//! | [`events`] | [`Event`](events::Event) log |
//! | [`math`] | Checked 256-bit arithmetic, `mul_div`, UQ112x112 prices |
//! | [`error`] | [`DexError`](error::DexError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod exchange;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod router;
pub mod traits;

//! Router: user-facing liquidity and multi-hop swap entry points.
//!
//! The router holds no state of its own beyond three addresses.  Every
//! entry point checks the caller's deadline against the exchange clock and
//! runs as a single atomic unit on the [`Exchange`].
//!
//! Assets are pulled from the caller through ledger allowances granted to
//! [`Router::address`] and pushed straight into the first pool; each hop
//! pays the next pool directly.  Native value is wrapped on the way in and
//! unwrapped on the way out, so the router's own native balance is zero
//! after every call.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`library`] | pure quoting helpers |
//! | `liquidity` | add / remove liquidity, with and without native value or permits |
//! | `swap` | exact-in and exact-out swaps over token and native paths |

pub mod library;
mod liquidity;
mod swap;

use tracing::debug;

pub use liquidity::{AddLiquidity, AddLiquidityNative, PermitApproval, RemoveLiquidity, RemoveLiquidityNative};

use crate::domain::{Address, Amount};
use crate::error::DexError;
use crate::exchange::Exchange;
use crate::traits::{AssetLedger, Checkpoint, NativeWrapper};

/// Stateless façade over an [`Exchange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    address: Address,
    registry: Address,
    wrapped_native: Address,
}

impl Router {
    /// Router at `address`, bound to `exchange`'s registry and wrapped
    /// native asset.
    #[must_use]
    pub fn new<L: AssetLedger + NativeWrapper + Checkpoint>(address: Address, exchange: &Exchange<L>) -> Self {
        Self {
            address,
            registry: exchange.registry().address(),
            wrapped_native: exchange.ledger().wrapped_asset(),
        }
    }

    /// Account that holds allowances and transient balances.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Registry the router resolves pools in.
    #[must_use]
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// Wrapped-native asset.
    #[must_use]
    pub const fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    fn ensure<L>(exchange: &Exchange<L>, deadline: u64) -> Result<(), DexError>
    where
        L: AssetLedger + Checkpoint,
    {
        if exchange.now() > deadline {
            return Err(DexError::Expired);
        }
        Ok(())
    }

    /// Pool for one hop, checking it against the deterministic address.
    fn pool_for<L>(&self, exchange: &Exchange<L>, a: Address, b: Address) -> Result<Address, DexError>
    where
        L: AssetLedger + Checkpoint,
    {
        let pool = library::pool_for(self.registry, a, b)?;
        exchange.pool(pool)?;
        Ok(pool)
    }

    /// Executes the hops of `path`, assuming `amounts[0]` already sits in
    /// the first pool.
    fn swap_hops<L>(
        &self,
        exchange: &mut Exchange<L>,
        amounts: &[Amount],
        path: &[Address],
        to: Address,
    ) -> Result<(), DexError>
    where
        L: AssetLedger + Checkpoint,
    {
        for (i, hop) in path.windows(2).enumerate() {
            let (input, output) = (hop[0], hop[1]);
            let pool = self.pool_for(exchange, input, output)?;
            let amount_out = amounts[i + 1];
            let (amount0_out, amount1_out) = if exchange.pool(pool)?.pair().is_token0(input)? {
                (Amount::ZERO, amount_out)
            } else {
                (amount_out, Amount::ZERO)
            };
            let recipient = match path.get(i + 2) {
                Some(next) => self.pool_for(exchange, output, *next)?,
                None => to,
            };
            exchange.swap(pool, self.address, amount0_out, amount1_out, recipient, None)?;
            debug!(hop = i, pool = %pool, amount_in = %amounts[i], amount_out = %amount_out, "router hop");
        }
        Ok(())
    }
}

//! Two-asset pool state and its invariant arithmetic.
//!
//! A [`Pool`] is pure state: it never touches the asset ledger.  The
//! [`Exchange`](crate::exchange::Exchange) reads live balances, hands them
//! to the methods here, and moves assets according to the results.
//!
//! # Share issuance
//!
//! | Situation | Shares minted |
//! |-----------|---------------|
//! | first deposit | `⌊√(a0 × a1)⌋ − minimum_liquidity` |
//! | later deposits | `min(a0 × S / r0, a1 × S / r1)` |
//!
//! # Swap rules
//!
//! - Constant product with fee `n/d`:
//!   `(b0·d − in0·n) × (b1·d − in1·n) ≥ r0 × r1 × d²`
//! - Fixed initial ratio: exactly one input side, output only on the other
//!   side, and `out == ⌊in × initial_out / initial_in⌋`.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::ShareToken;
use crate::config::PoolConfig;
use crate::domain::{Address, Amount, AssetPair, LockState, PricingPolicy, Rounding};
use crate::error::DexError;
use crate::math::uq112x112::{self, MAX_RESERVE};
use crate::math::{mul_div, CheckedArithmetic};
use crate::traits::FromConfig;

/// Reserves and initial reserves seen from one trading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    /// `true` when the input asset is side `0`.
    pub zero_for_one: bool,
    /// Reserve of the input asset.
    pub reserve_in: Amount,
    /// Reserve of the output asset.
    pub reserve_out: Amount,
    /// First-deposit amount of the input asset (fixed-ratio pools).
    pub initial_in: Amount,
    /// First-deposit amount of the output asset (fixed-ratio pools).
    pub initial_out: Amount,
}

/// State of a single pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    address: Address,
    pair: AssetPair,
    policy: PricingPolicy,
    reserve0: Amount,
    reserve1: Amount,
    block_timestamp_last: u32,
    initial_reserves: Option<(Amount, Amount)>,
    price0_cumulative_last: U256,
    price1_cumulative_last: U256,
    k_last: U256,
    minimum_liquidity: Amount,
    lock: LockState,
    shares: ShareToken,
}

impl FromConfig<PoolConfig> for Pool {
    fn from_config(config: &PoolConfig) -> Result<Self, DexError> {
        config.validate()?;
        Ok(Self {
            address: config.address(),
            pair: config.pair(),
            policy: config.policy(),
            reserve0: Amount::ZERO,
            reserve1: Amount::ZERO,
            block_timestamp_last: 0,
            initial_reserves: None,
            price0_cumulative_last: U256::ZERO,
            price1_cumulative_last: U256::ZERO,
            k_last: U256::ZERO,
            minimum_liquidity: config.minimum_liquidity(),
            lock: LockState::Unlocked,
            shares: ShareToken::new(config.share_token(), config.chain_id(), config.address()),
        })
    }
}

impl Pool {
    // -- queries ------------------------------------------------------------

    /// Pool address; also the address of its share token.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Canonically ordered assets.
    #[must_use]
    pub const fn pair(&self) -> AssetPair {
        self.pair
    }

    /// Side-0 asset.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.pair.token0()
    }

    /// Side-1 asset.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.pair.token1()
    }

    /// Pricing policy.
    #[must_use]
    pub const fn policy(&self) -> PricingPolicy {
        self.policy
    }

    /// `(reserve0, reserve1, block_timestamp_last)`.
    #[must_use]
    pub const fn reserves(&self) -> (Amount, Amount, u32) {
        (self.reserve0, self.reserve1, self.block_timestamp_last)
    }

    /// First-deposit amounts, zero until the first mint of a fixed-ratio
    /// pool.
    #[must_use]
    pub fn initial_reserves(&self) -> (Amount, Amount) {
        self.initial_reserves.unwrap_or_default()
    }

    /// Cumulative UQ112x112 prices `(price0, price1)`.
    #[must_use]
    pub const fn price_cumulative_last(&self) -> (U256, U256) {
        (self.price0_cumulative_last, self.price1_cumulative_last)
    }

    /// Reserve product at the last fee-affecting mint or burn.
    #[must_use]
    pub const fn k_last(&self) -> U256 {
        self.k_last
    }

    /// Shares locked to the zero address on first deposit.
    pub const fn minimum_liquidity(&self) -> Amount {
        self.minimum_liquidity
    }

    /// Reentrancy guard state.
    #[must_use]
    pub const fn lock_state(&self) -> LockState {
        self.lock
    }

    /// Share token.
    #[must_use]
    pub const fn shares(&self) -> &ShareToken {
        &self.shares
    }

    /// Reserves and initial reserves oriented for a trade selling `asset_in`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidPath`] if `asset_in` is not in the pool.
    pub fn orient(&self, asset_in: Address) -> Result<Orientation, DexError> {
        let zero_for_one = self.pair.is_token0(asset_in)?;
        let (i0, i1) = self.initial_reserves();
        Ok(if zero_for_one {
            Orientation {
                zero_for_one,
                reserve_in: self.reserve0,
                reserve_out: self.reserve1,
                initial_in: i0,
                initial_out: i1,
            }
        } else {
            Orientation {
                zero_for_one,
                reserve_in: self.reserve1,
                reserve_out: self.reserve0,
                initial_in: i1,
                initial_out: i0,
            }
        })
    }

    // -- guard --------------------------------------------------------------

    pub(crate) fn acquire_lock(&mut self) -> Result<(), DexError> {
        self.lock.acquire()
    }

    pub(crate) fn release_lock(&mut self) {
        self.lock.release();
    }

    pub(crate) fn shares_mut(&mut self) -> &mut ShareToken {
        &mut self.shares
    }

    // -- sync ---------------------------------------------------------------

    /// Advances the accumulators over the elapsed time with the old
    /// reserves, then stores the new balances as reserves.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if a balance exceeds `2^112 − 1`.
    pub(crate) fn update(
        &mut self,
        balance0: Amount,
        balance1: Amount,
        now: u32,
    ) -> Result<(), DexError> {
        if balance0.get() > MAX_RESERVE || balance1.get() > MAX_RESERVE {
            return Err(DexError::Overflow("reserve exceeds 112 bits"));
        }
        let elapsed = now.wrapping_sub(self.block_timestamp_last);
        if elapsed > 0 && !self.reserve0.is_zero() && !self.reserve1.is_zero() {
            let dt = U256::from(elapsed);
            if let Some(p0) = uq112x112::price(self.reserve1, self.reserve0) {
                self.price0_cumulative_last =
                    self.price0_cumulative_last.wrapping_add(p0.wrapping_mul(dt));
            }
            if let Some(p1) = uq112x112::price(self.reserve0, self.reserve1) {
                self.price1_cumulative_last =
                    self.price1_cumulative_last.wrapping_add(p1.wrapping_mul(dt));
            }
        }
        self.reserve0 = balance0;
        self.reserve1 = balance1;
        self.block_timestamp_last = now;
        Ok(())
    }

    // -- protocol fee -------------------------------------------------------

    /// Whether the protocol fee applies on this pool given the registry's
    /// recipient setting.
    #[must_use]
    pub fn fee_on(&self, fee_to: Option<Address>) -> bool {
        fee_to.is_some() && !self.policy.is_fixed_ratio()
    }

    /// Shares owed to the protocol for invariant growth since `k_last`:
    /// `S × (√k − √k_last) / (5√k + √k_last)`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the result exceeds `u128`.
    pub fn protocol_fee_shares(&self) -> Result<Amount, DexError> {
        if self.k_last.is_zero() {
            return Ok(Amount::ZERO);
        }
        let root_k = self.reserve0.to_u256().safe_mul(&self.reserve1.to_u256())?.root(2);
        let root_k_last = self.k_last.root(2);
        if root_k <= root_k_last {
            return Ok(Amount::ZERO);
        }
        let numerator = self
            .shares
            .total_supply()
            .to_u256()
            .safe_mul(&root_k.safe_sub(&root_k_last)?)?;
        let denominator = root_k.safe_mul(&U256::from(5u8))?.safe_add(&root_k_last)?;
        Amount::try_from_u256(numerator.safe_div(&denominator, Rounding::Down)?)
            .ok_or(DexError::Overflow("protocol fee shares exceed u128"))
    }

    /// Stores `reserve0 × reserve1` as the new `k_last`, or clears it.
    pub(crate) fn set_k_last(&mut self, fee_on: bool) {
        self.k_last = if fee_on {
            self.reserve0.to_u256() * self.reserve1.to_u256()
        } else {
            U256::ZERO
        };
    }

    // -- mint / burn --------------------------------------------------------

    /// Shares for a deposit of `amount0`/`amount1` on top of the current
    /// reserves.  On the first deposit the locked floor is subtracted.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InsufficientLiquidityMinted`] if the result is
    /// zero or the first deposit does not exceed the floor.
    pub fn liquidity_for_deposit(
        &self,
        amount0: Amount,
        amount1: Amount,
    ) -> Result<Amount, DexError> {
        let total = self.shares.total_supply();
        let shares = if total.is_zero() {
            geometric_mean(amount0, amount1)?
                .checked_sub(&self.minimum_liquidity)
                .ok_or(DexError::InsufficientLiquidityMinted)?
        } else {
            let by0 = mul_div(amount0, total, self.reserve0, Rounding::Down)?;
            let by1 = mul_div(amount1, total, self.reserve1, Rounding::Down)?;
            by0.min(by1)
        };
        if shares.is_zero() {
            return Err(DexError::InsufficientLiquidityMinted);
        }
        Ok(shares)
    }

    /// Records the first deposit of a fixed-ratio pool.  Later calls are
    /// ignored.
    pub(crate) fn record_initial_reserves(&mut self, amount0: Amount, amount1: Amount) {
        if self.policy.is_fixed_ratio() && self.initial_reserves.is_none() {
            self.initial_reserves = Some((amount0, amount1));
        }
    }

    /// Assets returned for redeeming `shares` against live balances.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InsufficientLiquidityBurned`] if either amount
    /// rounds to zero.
    pub fn redemption(
        &self,
        shares: Amount,
        balance0: Amount,
        balance1: Amount,
    ) -> Result<(Amount, Amount), DexError> {
        let total = self.shares.total_supply();
        if shares.is_zero() || total.is_zero() {
            return Err(DexError::InsufficientLiquidityBurned);
        }
        let amount0 = mul_div(shares, balance0, total, Rounding::Down)?;
        let amount1 = mul_div(shares, balance1, total, Rounding::Down)?;
        if amount0.is_zero() || amount1.is_zero() {
            return Err(DexError::InsufficientLiquidityBurned);
        }
        Ok((amount0, amount1))
    }

    // -- swap ---------------------------------------------------------------

    /// Rejects output requests the pool cannot honour before any transfer.
    ///
    /// # Errors
    ///
    /// - [`DexError::InsufficientOutputAmount`] if both outputs are zero.
    /// - [`DexError::InsufficientLiquidity`] if an output reaches its reserve.
    /// - [`DexError::InvalidRecipient`] if `to` is one of the pool's assets.
    pub fn check_swap_request(
        &self,
        amount0_out: Amount,
        amount1_out: Amount,
        to: Address,
    ) -> Result<(), DexError> {
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(DexError::InsufficientOutputAmount);
        }
        if amount0_out >= self.reserve0 || amount1_out >= self.reserve1 {
            return Err(DexError::InsufficientLiquidity);
        }
        if self.pair.contains(to) {
            return Err(DexError::InvalidRecipient);
        }
        Ok(())
    }

    /// Inputs implied by post-transfer balances: `balance − (reserve − out)`
    /// where positive.
    #[must_use]
    pub fn inputs(
        &self,
        balance0: Amount,
        balance1: Amount,
        amount0_out: Amount,
        amount1_out: Amount,
    ) -> (Amount, Amount) {
        let floor0 = self.reserve0.excess_over(&amount0_out);
        let floor1 = self.reserve1.excess_over(&amount1_out);
        (balance0.excess_over(&floor0), balance1.excess_over(&floor1))
    }

    /// Applies the pricing rule to a completed transfer.
    ///
    /// # Errors
    ///
    /// - [`DexError::InsufficientInputAmount`] if nothing came in.
    /// - [`DexError::InvariantViolation`] under constant product.
    /// - [`DexError::InvalidInputOutput`] under fixed initial ratio.
    pub fn validate_swap(
        &self,
        amounts_in: (Amount, Amount),
        amounts_out: (Amount, Amount),
        balances: (Amount, Amount),
    ) -> Result<(), DexError> {
        let (in0, in1) = amounts_in;
        if in0.is_zero() && in1.is_zero() {
            return Err(DexError::InsufficientInputAmount);
        }
        match self.policy {
            PricingPolicy::ConstantProduct { fee } => {
                let den = U256::from(fee.denominator());
                let num = U256::from(fee.numerator());
                let adjusted = |balance: Amount, input: Amount| {
                    balance
                        .to_u256()
                        .safe_mul(&den)?
                        .safe_sub(&input.to_u256().safe_mul(&num)?)
                };
                let lhs = adjusted(balances.0, in0)?.safe_mul(&adjusted(balances.1, in1)?)?;
                let rhs = self
                    .reserve0
                    .to_u256()
                    .safe_mul(&self.reserve1.to_u256())?
                    .safe_mul(&den.safe_mul(&den)?)?;
                if lhs < rhs {
                    return Err(DexError::InvariantViolation);
                }
                Ok(())
            }
            PricingPolicy::FixedInitialRatio => {
                let (out0, out1) = amounts_out;
                let (i0, i1) = self.initial_reserves();
                let (amount_in, amount_out, init_in, init_out, stray_out) = match (
                    in0.is_zero(),
                    in1.is_zero(),
                ) {
                    (false, true) => (in0, out1, i0, i1, out0),
                    (true, false) => (in1, out0, i1, i0, out1),
                    _ => return Err(DexError::InvalidInputOutput),
                };
                if !stray_out.is_zero() {
                    return Err(DexError::InvalidInputOutput);
                }
                let required = fixed_ratio_out(amount_in, init_in, init_out)?;
                if amount_out != required {
                    return Err(DexError::InvalidInputOutput);
                }
                Ok(())
            }
        }
    }
}

/// `⌊√(a × b)⌋`, the share count of a first deposit before the floor.
///
/// # Errors
///
/// Returns [`DexError::Overflow`] if the root does not fit in `u128`,
/// which two `u128` factors cannot produce.
pub fn geometric_mean(a: Amount, b: Amount) -> Result<Amount, DexError> {
    let root = a.to_u256().safe_mul(&b.to_u256())?.root(2);
    Amount::try_from_u256(root).ok_or(DexError::Overflow("square root exceeds u128"))
}

/// `⌊amount_in × initial_out / initial_in⌋`.
///
/// # Errors
///
/// Returns [`DexError::InsufficientLiquidity`] if the initial ratio is not
/// yet recorded.
pub fn fixed_ratio_out(
    amount_in: Amount,
    initial_in: Amount,
    initial_out: Amount,
) -> Result<Amount, DexError> {
    if initial_in.is_zero() || initial_out.is_zero() {
        return Err(DexError::InsufficientLiquidity);
    }
    mul_div(amount_in, initial_out, initial_in, Rounding::Down)
}

/// Smallest input whose fixed-ratio output is exactly `amount_out`.
///
/// # Errors
///
/// - [`DexError::InsufficientLiquidity`] if the ratio is not yet recorded.
/// - [`DexError::InvalidInputOutput`] if no integer input maps to
///   `amount_out`.
pub fn fixed_ratio_in(
    amount_out: Amount,
    initial_in: Amount,
    initial_out: Amount,
) -> Result<Amount, DexError> {
    if initial_in.is_zero() || initial_out.is_zero() {
        return Err(DexError::InsufficientLiquidity);
    }
    let amount_in = mul_div(amount_out, initial_in, initial_out, Rounding::Up)?;
    if fixed_ratio_out(amount_in, initial_in, initial_out)? != amount_out {
        return Err(DexError::InvalidInputOutput);
    }
    Ok(amount_in)
}

/// Constant-product output for `amount_in`:
/// `in·(d−n)·r_out / (r_in·d + in·(d−n))`.
///
/// # Errors
///
/// - [`DexError::InsufficientInputAmount`] for a zero input.
/// - [`DexError::InsufficientLiquidity`] for an empty reserve.
pub fn constant_product_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: crate::domain::SwapFee,
) -> Result<Amount, DexError> {
    if amount_in.is_zero() {
        return Err(DexError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(DexError::InsufficientLiquidity);
    }
    let in_with_fee = amount_in.to_u256().safe_mul(&U256::from(fee.retained()))?;
    let numerator = in_with_fee.safe_mul(&reserve_out.to_u256())?;
    let denominator = reserve_in
        .to_u256()
        .safe_mul(&U256::from(fee.denominator()))?
        .safe_add(&in_with_fee)?;
    Amount::try_from_u256(numerator.safe_div(&denominator, Rounding::Down)?)
        .ok_or(DexError::Overflow("amount out exceeds u128"))
}

/// Constant-product input needed for `amount_out`:
/// `r_in·out·d / ((r_out − out)·(d−n)) + 1`.
///
/// # Errors
///
/// - [`DexError::InsufficientOutputAmount`] for a zero output.
/// - [`DexError::InsufficientLiquidity`] if `amount_out ≥ reserve_out` or a
///   reserve is empty.
pub fn constant_product_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: crate::domain::SwapFee,
) -> Result<Amount, DexError> {
    if amount_out.is_zero() {
        return Err(DexError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(DexError::InsufficientLiquidity);
    }
    let numerator = reserve_in
        .to_u256()
        .safe_mul(&amount_out.to_u256())?
        .safe_mul(&U256::from(fee.denominator()))?;
    let denominator = reserve_out
        .to_u256()
        .safe_sub(&amount_out.to_u256())?
        .safe_mul(&U256::from(fee.retained()))?;
    let amount_in = numerator
        .safe_div(&denominator, Rounding::Down)?
        .safe_add(&U256::from(1u8))?;
    Amount::try_from_u256(amount_in).ok_or(DexError::Overflow("amount in exceeds u128"))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::ShareTokenConfig;
    use crate::domain::SwapFee;

    // -- helpers --------------------------------------------------------------

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    fn make_pool(policy: PricingPolicy) -> Pool {
        let Ok(pair) = AssetPair::new(addr(1), addr(2)) else {
            panic!("valid pair");
        };
        let Ok(cfg) = PoolConfig::new(
            addr(0x50),
            pair,
            policy,
            Amount::new(1_000),
            ShareTokenConfig::default(),
            1,
        ) else {
            panic!("valid config");
        };
        let Ok(pool) = Pool::from_config(&cfg) else {
            panic!("valid pool");
        };
        pool
    }

    /// Pool with reserves and shares as if `r0`/`r1` had been deposited.
    fn seeded(policy: PricingPolicy, r0: u128, r1: u128) -> Pool {
        let mut pool = make_pool(policy);
        let (a0, a1) = (Amount::new(r0), Amount::new(r1));
        let Ok(shares) = pool.liquidity_for_deposit(a0, a1) else {
            panic!("deposit accepted");
        };
        let floor = pool.minimum_liquidity();
        let Ok(()) = pool.shares_mut().mint(Address::ZERO, floor) else {
            panic!("mint floor");
        };
        let Ok(()) = pool.shares_mut().mint(addr(0xA1), shares) else {
            panic!("mint shares");
        };
        pool.record_initial_reserves(a0, a1);
        let Ok(()) = pool.update(a0, a1, 0) else {
            panic!("update");
        };
        pool
    }

    fn cp() -> PricingPolicy {
        PricingPolicy::constant_product(SwapFee::STANDARD)
    }

    // -- construction -------------------------------------------------------

    #[test]
    fn starts_empty_and_unlocked() {
        let pool = make_pool(cp());
        assert_eq!(pool.reserves(), (Amount::ZERO, Amount::ZERO, 0));
        assert_eq!(pool.lock_state(), LockState::Unlocked);
        assert_eq!(pool.shares().total_supply(), Amount::ZERO);
        assert_eq!(pool.token0(), addr(1));
    }

    // -- deposits -------------------------------------------------------------

    #[test]
    fn geometric_mean_floors() {
        for (a, b, r) in [(0u128, 9u128, 0u128), (1, 1, 1), (3, 1, 1), (4, 4, 4), (3, 5, 3), (17, 1, 4)] {
            assert_eq!(geometric_mean(Amount::new(a), Amount::new(b)), Ok(Amount::new(r)));
        }
        assert_eq!(geometric_mean(Amount::MAX, Amount::MAX), Ok(Amount::MAX));
    }

    #[test]
    fn fixed_ratio_first_deposit_is_plain_sqrt() {
        let pool = make_pool(PricingPolicy::FixedInitialRatio);
        assert_eq!(
            pool.liquidity_for_deposit(Amount::new(500), Amount::new(5_000)),
            Ok(Amount::new(1_581))
        );
    }

    #[test]
    fn constant_product_first_deposit_subtracts_floor() {
        let pool = make_pool(cp());
        assert_eq!(
            pool.liquidity_for_deposit(Amount::new(1_000_000), Amount::new(4_000_000)),
            Ok(Amount::new(2_000_000 - 1_000))
        );
    }

    #[test]
    fn first_deposit_at_floor_rejected() {
        let pool = make_pool(cp());
        assert_eq!(
            pool.liquidity_for_deposit(Amount::new(1_000), Amount::new(1_000)),
            Err(DexError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn later_deposit_takes_min_ratio() {
        let pool = seeded(cp(), 1_000_000, 1_000_000);
        // 10% of side 0, 5% of side 1 → 5% of supply
        let shares = pool.liquidity_for_deposit(Amount::new(100_000), Amount::new(50_000));
        assert_eq!(shares, Ok(Amount::new(50_000)));
    }

    #[test]
    fn initial_reserves_recorded_once() {
        let mut pool = seeded(PricingPolicy::FixedInitialRatio, 500, 5_000);
        pool.record_initial_reserves(Amount::new(1), Amount::new(1));
        assert_eq!(
            pool.initial_reserves(),
            (Amount::new(500), Amount::new(5_000))
        );
    }

    #[test]
    fn constant_product_has_no_initial_reserves() {
        let pool = seeded(cp(), 500, 5_000);
        assert_eq!(pool.initial_reserves(), (Amount::ZERO, Amount::ZERO));
    }

    // -- redemption -------------------------------------------------------------

    #[test]
    fn redemption_is_pro_rata() {
        let pool = seeded(PricingPolicy::FixedInitialRatio, 400, 900);
        // supply 600; a third of it
        let r = pool.redemption(Amount::new(200), Amount::new(400), Amount::new(900));
        assert_eq!(r, Ok((Amount::new(133), Amount::new(300))));
    }

    #[test]
    fn zero_redemption_rejected() {
        let pool = seeded(PricingPolicy::FixedInitialRatio, 400, 900);
        assert_eq!(
            pool.redemption(Amount::ZERO, Amount::new(400), Amount::new(900)),
            Err(DexError::InsufficientLiquidityBurned)
        );
    }

    // -- swap validation ----------------------------------------------------

    #[test]
    fn request_checks() {
        let pool = seeded(cp(), 1_000, 1_000);
        assert_eq!(
            pool.check_swap_request(Amount::ZERO, Amount::ZERO, addr(9)),
            Err(DexError::InsufficientOutputAmount)
        );
        assert_eq!(
            pool.check_swap_request(Amount::new(1_000), Amount::ZERO, addr(9)),
            Err(DexError::InsufficientLiquidity)
        );
        assert_eq!(
            pool.check_swap_request(Amount::new(1), Amount::ZERO, addr(1)),
            Err(DexError::InvalidRecipient)
        );
    }

    #[test]
    fn inputs_from_balance_deltas() {
        let pool = seeded(cp(), 1_000, 1_000);
        // 100 of side 1 sent out, 120 of side 0 came in
        let (in0, in1) = pool.inputs(
            Amount::new(1_120),
            Amount::new(900),
            Amount::ZERO,
            Amount::new(100),
        );
        assert_eq!((in0, in1), (Amount::new(120), Amount::ZERO));
    }

    #[test]
    fn constant_product_quote_passes_invariant() {
        let pool = seeded(cp(), 5_000_000, 10_000_000);
        let amount_in = Amount::new(10_000);
        let Ok(out) =
            constant_product_out(amount_in, Amount::new(5_000_000), Amount::new(10_000_000), SwapFee::STANDARD)
        else {
            panic!("quote");
        };
        let balances = (Amount::new(5_010_000), Amount::new(10_000_000 - out.get()));
        assert!(pool
            .validate_swap((amount_in, Amount::ZERO), (Amount::ZERO, out), balances)
            .is_ok());

        let greedy = (Amount::new(5_010_000), Amount::new(10_000_000 - out.get() - 1));
        assert_eq!(
            pool.validate_swap(
                (amount_in, Amount::ZERO),
                (Amount::ZERO, Amount::new(out.get() + 1)),
                greedy
            ),
            Err(DexError::InvariantViolation)
        );
    }

    #[test]
    fn no_input_rejected() {
        let pool = seeded(cp(), 1_000, 1_000);
        assert_eq!(
            pool.validate_swap(
                (Amount::ZERO, Amount::ZERO),
                (Amount::new(1), Amount::ZERO),
                (Amount::new(999), Amount::new(1_000))
            ),
            Err(DexError::InsufficientInputAmount)
        );
    }

    #[test]
    fn fixed_ratio_exact_output_accepted() {
        let pool = seeded(PricingPolicy::FixedInitialRatio, 500, 5_000);
        let r = pool.validate_swap(
            (Amount::new(10), Amount::ZERO),
            (Amount::ZERO, Amount::new(100)),
            (Amount::new(510), Amount::new(4_900)),
        );
        assert!(r.is_ok());
    }

    #[test]
    fn fixed_ratio_short_output_rejected() {
        let pool = seeded(PricingPolicy::FixedInitialRatio, 500, 5_000);
        let r = pool.validate_swap(
            (Amount::new(10), Amount::ZERO),
            (Amount::ZERO, Amount::new(99)),
            (Amount::new(510), Amount::new(4_901)),
        );
        assert_eq!(r, Err(DexError::InvalidInputOutput));
    }

    #[test]
    fn fixed_ratio_output_on_input_side_rejected() {
        let pool = seeded(PricingPolicy::FixedInitialRatio, 500, 5_000);
        let r = pool.validate_swap(
            (Amount::new(10), Amount::ZERO),
            (Amount::new(1), Amount::new(100)),
            (Amount::new(509), Amount::new(4_900)),
        );
        assert_eq!(r, Err(DexError::InvalidInputOutput));
    }

    #[test]
    fn fixed_ratio_two_inputs_rejected() {
        let pool = seeded(PricingPolicy::FixedInitialRatio, 500, 5_000);
        let r = pool.validate_swap(
            (Amount::new(10), Amount::new(1)),
            (Amount::ZERO, Amount::new(100)),
            (Amount::new(510), Amount::new(4_901)),
        );
        assert_eq!(r, Err(DexError::InvalidInputOutput));
    }

    // -- quote helpers ------------------------------------------------------

    #[test]
    fn fixed_ratio_in_round_trips() {
        assert_eq!(
            fixed_ratio_in(Amount::new(100), Amount::new(500), Amount::new(5_000)),
            Ok(Amount::new(10))
        );
        // 5000 → 500: one unit of output needs ten of input
        assert_eq!(
            fixed_ratio_in(Amount::new(3), Amount::new(5_000), Amount::new(500)),
            Ok(Amount::new(30))
        );
    }

    #[test]
    fn fixed_ratio_in_unrepresentable_output() {
        // 500 → 5000: outputs come in steps of 10
        assert_eq!(
            fixed_ratio_in(Amount::new(99), Amount::new(500), Amount::new(5_000)),
            Err(DexError::InvalidInputOutput)
        );
    }

    #[test]
    fn constant_product_known_values() {
        // 1 in against 5/10 with 0.3% fee
        let out = constant_product_out(
            Amount::new(1_000_000_000_000_000_000),
            Amount::new(5_000_000_000_000_000_000),
            Amount::new(10_000_000_000_000_000_000),
            SwapFee::STANDARD,
        );
        assert_eq!(out, Ok(Amount::new(1_662_497_915_624_478_906)));
    }

    #[test]
    fn constant_product_in_covers_out() {
        let (r_in, r_out) = (Amount::new(1_000_000), Amount::new(2_000_000));
        let Ok(needed) = constant_product_in(Amount::new(10_000), r_in, r_out, SwapFee::STANDARD)
        else {
            panic!("quote");
        };
        let Ok(got) = constant_product_out(needed, r_in, r_out, SwapFee::STANDARD) else {
            panic!("quote");
        };
        assert!(got >= Amount::new(10_000));
    }

    #[test]
    fn constant_product_in_rejects_draining() {
        assert_eq!(
            constant_product_in(Amount::new(5), Amount::new(5), Amount::new(5), SwapFee::STANDARD),
            Err(DexError::InsufficientLiquidity)
        );
    }

    // -- accumulators & protocol fee ----------------------------------------

    #[test]
    fn accumulators_advance_with_old_reserves() {
        let mut pool = seeded(PricingPolicy::FixedInitialRatio, 500, 5_000);
        let Ok(()) = pool.update(Amount::new(1_000), Amount::new(1_000), 7) else {
            panic!("update");
        };
        let (p0, p1) = pool.price_cumulative_last();
        assert_eq!(p0, (U256::from(10u8) << 112) * U256::from(7u8));
        assert_eq!(p1, ((U256::from(500u16) << 112) / U256::from(5_000u16)) * U256::from(7u8));
        assert_eq!(pool.reserves(), (Amount::new(1_000), Amount::new(1_000), 7));
    }

    #[test]
    fn same_block_does_not_accumulate() {
        let mut pool = seeded(cp(), 500, 5_000);
        let Ok(()) = pool.update(Amount::new(600), Amount::new(5_000), 0) else {
            panic!("update");
        };
        assert_eq!(pool.price_cumulative_last(), (U256::ZERO, U256::ZERO));
    }

    #[test]
    fn reserve_above_112_bits_rejected() {
        let mut pool = make_pool(cp());
        let r = pool.update(Amount::new(MAX_RESERVE + 1), Amount::new(1), 1);
        assert!(matches!(r, Err(DexError::Overflow(_))));
    }

    #[test]
    fn protocol_fee_formula() {
        let mut pool = seeded(cp(), 1_000_000, 1_000_000);
        pool.set_k_last(true);
        // k grows from 1e12 to 1.21e12: √k 1_000_000 → 1_100_000
        let Ok(()) = pool.update(Amount::new(1_100_000), Amount::new(1_100_000), 1) else {
            panic!("update");
        };
        // 1_000_000 × 100_000 / (5_500_000 + 1_000_000) = 15_384
        assert_eq!(pool.protocol_fee_shares(), Ok(Amount::new(15_384)));
    }

    #[test]
    fn protocol_fee_zero_without_k_last() {
        let pool = seeded(cp(), 1_000_000, 1_000_000);
        assert_eq!(pool.protocol_fee_shares(), Ok(Amount::ZERO));
        assert!(pool.fee_on(Some(addr(7))));
        assert!(!pool.fee_on(None));
        let fixed = seeded(PricingPolicy::FixedInitialRatio, 10, 10);
        assert!(!fixed.fee_on(Some(addr(7))));
    }
}

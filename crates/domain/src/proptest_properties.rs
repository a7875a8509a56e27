//! Property-based tests for the valuation pipeline.
//!
//! 1. **Price round trip**: sqrt price -> price -> tick -> sqrt price stays
//!    within `ROUND_TRIP_TOLERANCE_BPS` over the whole tick range, or the
//!    price conversion fails loudly when the price is outside what a
//!    `Decimal` holds.
//! 2. **Range alignment**: `lower <= tick < upper`, both multiples of spacing.
//! 3. **Regimes**: single-sided outside the range, two-sided inside it.
//! 4. **Liquidity scaling**: amounts are monotone and linear up to rounding.
//! 5. **Zero liquidity**: TVL is zero at any price.
//! 6. **Zero TVL**: APR is undefined.

use proptest::prelude::*;

use crate::entities::{LiquidityPosition, PoolSnapshot};
use crate::enums::{PriceRegime, TokenSide};
use crate::error::{DomainError, ValuationError};
use crate::math::concentrated_liquidity::get_amounts_for_liquidity;
use crate::math::price_tick::{
    price_to_tick, sqrt_price_x96_to_price, sqrt_prices_within_tolerance, tick_to_sqrt_price_x96,
};
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use crate::math::tick_range::align_range;
use crate::metrics::apr::apr;
use crate::metrics::tvl::tvl;
use primitive_types::U256;
use rust_decimal::Decimal;

/// log10(1.0001) scaled by 1e9.
const LOG10_TICK_BASE_E9: i64 = 43_427;

fn fail(err: impl std::fmt::Display) -> TestCaseError {
    TestCaseError::fail(err.to_string())
}

fn decimals_strategy() -> impl Strategy<Value = u8> {
    prop::sample::select(vec![0u8, 6, 8, 18, 36])
}

/// Rough decimal exponent of the price at `tick`, floored.
fn price_exponent(tick: i32, decimals0: u8, decimals1: u8) -> i64 {
    (i64::from(tick) * LOG10_TICK_BASE_E9).div_euclid(1_000_000_000) + i64::from(decimals0)
        - i64::from(decimals1)
}

fn liquidity_strategy() -> impl Strategy<Value = u128> {
    1_000_000_000_000u128..1_000_000_000_000_000_000_000_000u128
}

/// A range `[lower, upper)` with at least two ticks and an interior tick.
fn range_with_interior() -> impl Strategy<Value = (i32, i32, i32)> {
    (-100_000i32..100_000, 2i32..5_000).prop_flat_map(|(lower, width)| {
        let upper = lower + width;
        (Just(lower), Just(upper), (lower + 1)..upper)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_price_round_trip(
        tick in MIN_TICK..MAX_TICK,
        fraction in 0u32..1_000,
        decimals0 in decimals_strategy(),
        decimals1 in decimals_strategy(),
    ) {
        let here = tick_to_sqrt_price_x96(tick).map_err(fail)?;
        let next = tick_to_sqrt_price_x96(tick + 1).map_err(fail)?;
        let sqrt_price = here + (next - here) * U256::from(fraction) / U256::from(1_000u32);
        let exponent = price_exponent(tick, decimals0, decimals1);

        match sqrt_price_x96_to_price(sqrt_price, decimals0, decimals1) {
            Ok(price) => {
                let back_tick = price_to_tick(price, decimals0, decimals1).map_err(fail)?;
                let back = tick_to_sqrt_price_x96(back_tick).map_err(fail)?;
                prop_assert!(
                    sqrt_prices_within_tolerance(sqrt_price, back),
                    "round trip drifted: {} -> tick {} -> {}",
                    sqrt_price, back_tick, back
                );
                prop_assert!(back_tick == tick || back_tick == tick - 1);
            }
            Err(ValuationError::Domain(
                DomainError::Underflow { .. }
                | DomainError::PrecisionLoss { .. }
                | DomainError::Overflow { .. },
            )) => {
                // Prices between 1e-14 and 1e26 always fit.
                prop_assert!(
                    !(-14..=26).contains(&exponent),
                    "price ~1e{} at tick {} failed to convert",
                    exponent, tick
                );
            }
            Err(other) => return Err(fail(other)),
        }
    }

    #[test]
    fn prop_align_range(tick in MIN_TICK..=MAX_TICK, spacing in 1i32..=16_384) {
        let range = align_range(tick, spacing).map_err(fail)?;
        prop_assert!(range.lower() <= tick && tick < range.upper());
        prop_assert_eq!(range.lower().rem_euclid(spacing), 0);
        prop_assert_eq!(range.width(), i64::from(spacing));
    }

    #[test]
    fn prop_regimes(
        (lower, upper, inner) in range_with_interior(),
        liquidity in liquidity_strategy(),
    ) {
        let sqrt_lower = tick_to_sqrt_price_x96(lower).map_err(fail)?;
        let sqrt_upper = tick_to_sqrt_price_x96(upper).map_err(fail)?;
        let sqrt_inner = tick_to_sqrt_price_x96(inner).map_err(fail)?;

        let below = get_amounts_for_liquidity(lower, upper, liquidity, sqrt_lower - U256::one())
            .map_err(fail)?;
        prop_assert_eq!(below.regime, PriceRegime::BelowRange);
        prop_assert!(below.amount1.is_zero());

        let above = get_amounts_for_liquidity(lower, upper, liquidity, sqrt_upper).map_err(fail)?;
        prop_assert_eq!(above.regime, PriceRegime::AboveRange);
        prop_assert!(above.amount0.is_zero());

        let inside = get_amounts_for_liquidity(lower, upper, liquidity, sqrt_inner).map_err(fail)?;
        prop_assert_eq!(inside.regime, PriceRegime::InRange);
        prop_assert!(!inside.amount0.is_zero() && inside.amount0 < below.amount0);
        prop_assert!(!inside.amount1.is_zero() && inside.amount1 < above.amount1);
    }

    #[test]
    fn prop_liquidity_scaling(
        (lower, upper, inner) in range_with_interior(),
        liquidity in liquidity_strategy(),
        extra in 0u128..1_000_000_000,
    ) {
        let sqrt_price = tick_to_sqrt_price_x96(inner).map_err(fail)?;
        let one = get_amounts_for_liquidity(lower, upper, liquidity, sqrt_price).map_err(fail)?;
        let more = get_amounts_for_liquidity(lower, upper, liquidity + extra, sqrt_price)
            .map_err(fail)?;
        let double = get_amounts_for_liquidity(lower, upper, liquidity * 2, sqrt_price)
            .map_err(fail)?;

        prop_assert!(more.amount0 >= one.amount0 && more.amount1 >= one.amount1);

        // Floor rounding loses at most one unit per doubling.
        let two = U256::from(2u32);
        let (a0, a1) = (one.amount0.as_u256(), one.amount1.as_u256());
        let (d0, d1) = (double.amount0.as_u256(), double.amount1.as_u256());
        prop_assert!(d0 >= a0 * two && d0 <= a0 * two + U256::one());
        prop_assert!(d1 >= a1 * two && d1 <= a1 * two + U256::one());
    }

    #[test]
    fn prop_zero_liquidity_zero_tvl(
        tick in -880_000i32..880_000,
        spacing in 1i32..1_000,
        decimals0 in decimals_strategy(),
        decimals1 in decimals_strategy(),
    ) {
        let sqrt_price = tick_to_sqrt_price_x96(tick).map_err(fail)?;
        let pool = PoolSnapshot::new("0xpool", 1, sqrt_price, tick, spacing, decimals0, decimals1)
            .map_err(fail)?;
        for reference in [TokenSide::Token0, TokenSide::Token1] {
            let valuation = tvl(&pool, &LiquidityPosition::active(0), reference).map_err(fail)?;
            prop_assert!(valuation.tvl.is_zero());
        }
    }

    #[test]
    fn prop_zero_tvl_apr_undefined(mantissa in 1i64..i64::MAX, scale in 0u32..18, days in 1u32..366) {
        let reward = Decimal::new(mantissa, scale);
        let result = apr(reward, Decimal::ZERO, days);
        prop_assert!(matches!(result, Err(ref e) if e.is_division_by_zero()));
    }
}

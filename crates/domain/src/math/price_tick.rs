use crate::error::{DomainError, Result};
use crate::math::fixed_point::{
    Q96, decimal_adjustment, decimal_to_ratio, integer_sqrt, ratio_to_decimal,
};
use crate::math::tick_math::{
    MIN_SQRT_RATIO, MIN_TICK, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio,
};
use crate::value_objects::price::Price;
use primitive_types::{U256, U512};

/// Relative tolerance, in basis points of the sqrt price, for comparing a
/// sqrt price with one reconstructed from its decimal price and tick.
///
/// One bp is two tick steps of `sqrt(1.0001) - 1 ≈ 0.5 bp`: one for tick
/// quantization and one for truncating the decimal price.
pub const ROUND_TRIP_TOLERANCE_BPS: u32 = 1;

/// Exact `(numerator, denominator)` of the token0 price in token1:
/// `sqrtPriceX96^2 * 10^decimals0 / (2^192 * 10^decimals1)`, reduced by the
/// common power of ten.
fn price_ratio(
    sqrt_price_x96: U256,
    decimals0: u8,
    decimals1: u8,
    operation: &'static str,
) -> Result<(U512, U512)> {
    if sqrt_price_x96.is_zero() {
        return Err(DomainError::ZeroSqrtPrice.into());
    }
    let (adjust_num, adjust_den) = decimal_adjustment(decimals0, decimals1)?;

    let sqrt = U512::from(sqrt_price_x96);
    let q96 = U512::from(Q96);
    let overflow = || {
        DomainError::overflow(
            operation,
            format!("sqrt_price_x96={sqrt_price_x96} decimals=({decimals0}, {decimals1})"),
        )
    };

    let numerator = (sqrt * sqrt).checked_mul(adjust_num).ok_or_else(overflow)?;
    let denominator = (q96 * q96).checked_mul(adjust_den).ok_or_else(overflow)?;
    Ok((numerator, denominator))
}

/// Converts the pool's `sqrtPriceX96` to a decimal price of token0 in token1.
/// P = (sqrtPriceX96 / 2^96)^2 * 10^(decimals0 - decimals1)
///
/// # Errors
///
/// [`DomainError::ZeroSqrtPrice`] for zero. [`DomainError::Underflow`],
/// [`DomainError::PrecisionLoss`] or [`DomainError::Overflow`] when the price
/// does not fit a `Decimal`.
pub fn sqrt_price_x96_to_price(
    sqrt_price_x96: U256,
    decimals0: u8,
    decimals1: u8,
) -> Result<Price> {
    let operation = "sqrt_price_x96_to_price";
    let (numerator, denominator) = price_ratio(sqrt_price_x96, decimals0, decimals1, operation)?;
    Ok(Price::new(ratio_to_decimal(numerator, denominator, operation)?))
}

/// Converts the pool's `sqrtPriceX96` to a decimal price of token1 in token0.
/// 1/P = 2^192 * 10^decimals1 / (sqrtPriceX96^2 * 10^decimals0)
///
/// Computed from the exact ratio rather than by inverting
/// [`sqrt_price_x96_to_price`], so a price too small for a `Decimal` still
/// has a precise inverse.
pub fn sqrt_price_x96_to_inverse_price(
    sqrt_price_x96: U256,
    decimals0: u8,
    decimals1: u8,
) -> Result<Price> {
    let operation = "sqrt_price_x96_to_inverse_price";
    let (numerator, denominator) = price_ratio(sqrt_price_x96, decimals0, decimals1, operation)?;
    Ok(Price::new(ratio_to_decimal(denominator, numerator, operation)?))
}

/// Returns `sqrt(1.0001^tick) * 2^96` in the pool's own encoding.
pub fn tick_to_sqrt_price_x96(tick: i32) -> Result<U256> {
    get_sqrt_ratio_at_tick(tick)
}

/// Returns the decimal price at a given tick.
/// P = 1.0001 ^ tick * 10^(decimals0 - decimals1)
pub fn tick_to_price(tick: i32, decimals0: u8, decimals1: u8) -> Result<Price> {
    sqrt_price_x96_to_price(get_sqrt_ratio_at_tick(tick)?, decimals0, decimals1)
}

/// Converts a decimal price back to `sqrtPriceX96`, rounding down.
///
/// # Errors
///
/// [`DomainError::ZeroPrice`] for zero and [`DomainError::NegativeValue`] for
/// negative prices.
pub fn price_to_sqrt_price_x96(price: Price, decimals0: u8, decimals1: u8) -> Result<U256> {
    if price.value.is_zero() {
        return Err(DomainError::ZeroPrice { price: price.value }.into());
    }
    let (mantissa, scale) = decimal_to_ratio(price.value, "price")?;
    let (adjust_num, adjust_den) = decimal_adjustment(decimals0, decimals1)?;

    // raw = price / 10^(decimals0 - decimals1); sqrtPriceX96 = sqrt(raw * 2^192)
    let q192 = U512::from(Q96) * U512::from(Q96);
    let numerator = mantissa * adjust_den * q192;
    let denominator = scale * adjust_num;
    let root = integer_sqrt(numerator / denominator);

    let sqrt_price_x96 = U256::try_from(root).map_err(|_| {
        DomainError::overflow("price_to_sqrt_price_x96", format!("price={price}"))
    })?;
    if sqrt_price_x96.is_zero() {
        return Err(DomainError::Underflow {
            operation: "price_to_sqrt_price_x96",
            inputs: format!("price={price}"),
        }
        .into());
    }
    Ok(sqrt_price_x96)
}

/// Returns the greatest tick whose price is at most `price`.
/// tick = floor(log_1.0001(P))
///
/// A price that truncation left just under the price of [`MIN_TICK`], within
/// [`ROUND_TRIP_TOLERANCE_BPS`], maps to [`MIN_TICK`].
pub fn price_to_tick(price: Price, decimals0: u8, decimals1: u8) -> Result<i32> {
    let sqrt_price_x96 = price_to_sqrt_price_x96(price, decimals0, decimals1)?;
    if sqrt_price_x96 < MIN_SQRT_RATIO && sqrt_prices_within_tolerance(sqrt_price_x96, MIN_SQRT_RATIO)
    {
        return Ok(MIN_TICK);
    }
    get_tick_at_sqrt_ratio(sqrt_price_x96)
}

/// True when `a` and `b` differ by at most [`ROUND_TRIP_TOLERANCE_BPS`] of the
/// larger value.
pub fn sqrt_prices_within_tolerance(a: U256, b: U256) -> bool {
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    let diff = U512::from(hi - lo) * U512::from(10_000u32);
    diff <= U512::from(hi) * U512::from(ROUND_TRIP_TOLERANCE_BPS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;
    use crate::math::tick_math::MAX_TICK;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_at_q96_is_one() {
        let p = sqrt_price_x96_to_price(Q96, 18, 18).unwrap();
        assert_eq!(p.value, Decimal::ONE);
    }

    #[test]
    fn test_price_decimal_adjustment() {
        // Raw ratio 4 (sqrt 2), token0 has 6 decimals and token1 18.
        let sqrt = Q96 * U256::from(2);
        assert_eq!(sqrt_price_x96_to_price(sqrt, 18, 18).unwrap().value, dec!(4));
        assert_eq!(sqrt_price_x96_to_price(sqrt, 6, 18).unwrap().value, dec!(0.000000000004));
        assert_eq!(sqrt_price_x96_to_price(sqrt, 18, 6).unwrap().value, dec!(4000000000000));
    }

    #[test]
    fn test_price_zero_sqrt_is_rejected() {
        assert!(matches!(
            sqrt_price_x96_to_price(U256::zero(), 18, 18),
            Err(crate::error::ValuationError::Domain(DomainError::ZeroSqrtPrice))
        ));
    }

    #[test]
    fn test_price_precision_beyond_f64() {
        // 2^96 + 1 squared differs from 1 by ~2.5e-29, below Decimal's scale,
        // while 2^96 + 2^50 moves the 14th significant digit.
        let sqrt = Q96 + (U256::one() << 50u32);
        let p = sqrt_price_x96_to_price(sqrt, 18, 18).unwrap();
        assert!(p.value > Decimal::ONE);
        assert!(p.value < dec!(1.000000000000030));
    }

    #[test]
    fn test_tick_to_price() {
        assert_eq!(tick_to_price(0, 18, 18).unwrap().value, Decimal::ONE);

        // Tick 100 -> 1.0001^100 ~= 1.010049662
        let p100 = tick_to_price(100, 18, 18).unwrap().value;
        assert!((p100 - dec!(1.010049662)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_price_to_tick() {
        assert_eq!(price_to_tick(Price::ONE, 18, 18).unwrap(), 0);
        assert_eq!(price_to_tick(Price::new(dec!(1.0101)), 18, 18).unwrap(), 100);
        assert_eq!(price_to_tick(Price::new(dec!(0.9999)), 18, 18).unwrap(), -2);
        assert!(price_to_tick(Price::new(Decimal::ZERO), 18, 18).is_err());
        assert!(price_to_tick(Price::new(dec!(-1)), 18, 18).is_err());
    }

    #[test]
    fn test_price_to_sqrt_price_round_trip() {
        let sqrt = price_to_sqrt_price_x96(Price::ONE, 18, 18).unwrap();
        assert_eq!(sqrt, Q96);

        // USDC (6) / WETH (18) style pool.
        let price = Price::new(dec!(0.00032));
        let sqrt = price_to_sqrt_price_x96(price, 6, 18).unwrap();
        let back = sqrt_price_x96_to_price(sqrt, 6, 18).unwrap();
        assert!((back.value - price.value).abs() < dec!(0.000000000001));
    }

    #[test]
    fn test_inverse_price() {
        let sqrt = Q96 * U256::from(2);
        assert_eq!(sqrt_price_x96_to_inverse_price(sqrt, 18, 18).unwrap().value, dec!(0.25));
        assert_eq!(
            sqrt_price_x96_to_inverse_price(sqrt, 6, 18).unwrap().value,
            dec!(250000000000)
        );
        assert!(sqrt_price_x96_to_inverse_price(U256::zero(), 18, 18).is_err());
    }

    #[test]
    fn test_low_price_fails_instead_of_truncating() {
        // 1.0001^-600000 ~= 8.8e-27 keeps two digits at scale 28.
        let sqrt = get_sqrt_ratio_at_tick(-600_000).unwrap();
        let err = sqrt_price_x96_to_price(sqrt, 18, 18).unwrap_err();
        assert!(matches!(
            err,
            ValuationError::Domain(DomainError::PrecisionLoss {
                significant_digits: 2,
                ..
            })
        ));

        // The inverse keeps full precision.
        let inverse = sqrt_price_x96_to_inverse_price(sqrt, 18, 18).unwrap();
        assert_eq!(inverse.value, dec!(113858672924455549761832476.03));

        // 1.0001^-700000 ~= 4e-31 is below the smallest decimal step.
        let sqrt = get_sqrt_ratio_at_tick(-700_000).unwrap();
        assert!(matches!(
            sqrt_price_x96_to_price(sqrt, 18, 18),
            Err(ValuationError::Domain(DomainError::Underflow { .. }))
        ));
        assert!(matches!(
            sqrt_price_x96_to_inverse_price(sqrt, 18, 18),
            Err(ValuationError::Domain(DomainError::Overflow { .. }))
        ));
    }

    #[test]
    fn test_price_to_sqrt_price_underflow() {
        // 1e-28 / 10^36 * 2^192 < 1, so the root is zero.
        let price = Price::new(dec!(0.0000000000000000000000000001));
        assert!(matches!(
            price_to_sqrt_price_x96(price, 36, 0),
            Err(ValuationError::Domain(DomainError::Underflow {
                operation: "price_to_sqrt_price_x96",
                ..
            }))
        ));
    }

    #[test]
    fn test_round_trip_near_tick_bounds() {
        let round_trip = |tick: i32, decimals0: u8, decimals1: u8| {
            let sqrt = get_sqrt_ratio_at_tick(tick).unwrap();
            let price = sqrt_price_x96_to_price(sqrt, decimals0, decimals1).unwrap();
            let back = price_to_tick(price, decimals0, decimals1).unwrap();
            assert!(
                sqrt_prices_within_tolerance(sqrt, get_sqrt_ratio_at_tick(back).unwrap()),
                "tick {tick} came back as {back}"
            );
            back
        };

        // Decimals shift the extreme raw prices into the decimal range.
        assert_eq!(round_trip(MIN_TICK, 36, 0), MIN_TICK);
        assert_eq!(round_trip(MIN_TICK + 1, 36, 0), MIN_TICK);
        assert_eq!(round_trip(MAX_TICK, 0, 36), MAX_TICK - 1);
        assert_eq!(round_trip(MAX_TICK - 1, 0, 36), MAX_TICK - 2);
        assert_eq!(round_trip(-368_000, 18, 18), -368_001);
    }

    #[test]
    fn test_tolerance() {
        let base = Q96;
        assert!(sqrt_prices_within_tolerance(base, base));
        let within = base + base / U256::from(20_000);
        assert!(sqrt_prices_within_tolerance(base, within));
        let outside = base + base / U256::from(5_000);
        assert!(!sqrt_prices_within_tolerance(base, outside));
        assert!(!sqrt_prices_within_tolerance(outside, base));
    }
}

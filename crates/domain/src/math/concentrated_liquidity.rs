use crate::enums::PriceRegime;
use crate::error::{DomainError, Result};
use crate::math::fixed_point::{Q96, RESOLUTION, mul_div};
use crate::math::tick_math::get_sqrt_ratio_at_tick;
use crate::token::TokenAmount;
use crate::value_objects::amounts::TokenAmounts;
use crate::value_objects::tick_range::TickRange;
use primitive_types::U256;

fn sorted(sqrt_price_a: U256, sqrt_price_b: U256) -> (U256, U256) {
    if sqrt_price_a < sqrt_price_b {
        (sqrt_price_a, sqrt_price_b)
    } else {
        (sqrt_price_b, sqrt_price_a)
    }
}

/// Calculates the amount of token0 (x) given liquidity and a sqrt price range.
/// delta_x = L * (sqrt(P_b) - sqrt(P_a)) / (sqrt(P_a) * sqrt(P_b))
///
/// Inputs are Q64.96; the result rounds down in two steps.
pub fn get_amount0_delta(
    sqrt_price_a: U256,
    sqrt_price_b: U256,
    liquidity: u128,
) -> Result<TokenAmount> {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);
    if lower.is_zero() {
        return Err(DomainError::ZeroSqrtPrice.into());
    }

    let numerator1 = U256::from(liquidity) << RESOLUTION;
    let numerator2 = upper - lower;

    // (L << 96) * diff / upper never exceeds L << 96.
    let amount = mul_div(numerator1, numerator2, upper)? / lower;
    Ok(TokenAmount(amount))
}

/// Calculates the amount of token1 (y) given liquidity and a sqrt price range.
/// delta_y = L * (sqrt(P_b) - sqrt(P_a))
///
/// Inputs are Q64.96; the result rounds down.
pub fn get_amount1_delta(
    sqrt_price_a: U256,
    sqrt_price_b: U256,
    liquidity: u128,
) -> Result<TokenAmount> {
    let (lower, upper) = sorted(sqrt_price_a, sqrt_price_b);
    let amount = mul_div(U256::from(liquidity), upper - lower, Q96)?;
    Ok(TokenAmount(amount))
}

/// Classifies `sqrt_price_x96` against the range's sqrt bounds.
pub fn price_regime(sqrt_price_x96: U256, sqrt_lower: U256, sqrt_upper: U256) -> PriceRegime {
    if sqrt_price_x96 < sqrt_lower {
        PriceRegime::BelowRange
    } else if sqrt_price_x96 >= sqrt_upper {
        PriceRegime::AboveRange
    } else {
        PriceRegime::InRange
    }
}

/// Decomposes `liquidity` over `[tick_lower, tick_upper)` into token amounts
/// at the current `sqrt_price_x96`.
///
/// The regime comes from comparing `sqrt_price_x96` with the bounds' sqrt
/// ratios directly, never from a separately derived current tick. At exactly
/// the lower bound the in-range formula yields `amount1 == 0`, the same
/// result as the below-range formula.
///
/// # Errors
///
/// [`DomainError::InvalidTickRange`] unless `tick_lower < tick_upper`,
/// [`DomainError::ZeroSqrtPrice`] for a zero price, and
/// [`DomainError::TickOutOfBounds`] for bounds the pool cannot address.
pub fn get_amounts_for_liquidity(
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    sqrt_price_x96: U256,
) -> Result<TokenAmounts> {
    let range = TickRange::new(tick_lower, tick_upper)?;
    if sqrt_price_x96.is_zero() {
        return Err(DomainError::ZeroSqrtPrice.into());
    }

    let sqrt_lower = get_sqrt_ratio_at_tick(range.lower())?;
    let sqrt_upper = get_sqrt_ratio_at_tick(range.upper())?;
    let regime = price_regime(sqrt_price_x96, sqrt_lower, sqrt_upper);

    let (amount0, amount1) = match regime {
        PriceRegime::BelowRange => (
            get_amount0_delta(sqrt_lower, sqrt_upper, liquidity)?,
            TokenAmount::zero(),
        ),
        PriceRegime::AboveRange => (
            TokenAmount::zero(),
            get_amount1_delta(sqrt_lower, sqrt_upper, liquidity)?,
        ),
        PriceRegime::InRange => (
            get_amount0_delta(sqrt_price_x96, sqrt_upper, liquidity)?,
            get_amount1_delta(sqrt_lower, sqrt_price_x96, liquidity)?,
        ),
    };

    Ok(TokenAmounts {
        amount0,
        amount1,
        regime,
    })
}

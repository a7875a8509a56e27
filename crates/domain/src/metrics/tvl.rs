use crate::entities::{LiquidityPosition, PoolSnapshot};
use crate::enums::TokenSide;
use crate::error::{DomainError, Result};
use crate::math::concentrated_liquidity::get_amounts_for_liquidity;
use crate::math::fixed_point::{Q96, pow10, ratio_to_decimal};
use crate::value_objects::amount::Amount;
use crate::value_objects::amounts::{PositionAmounts, TokenAmounts};
use crate::value_objects::tick_range::TickRange;
use primitive_types::U512;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A position's holdings and their total value in one of the pool's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    pub amounts: PositionAmounts,
    /// Token the value is expressed in.
    pub reference: TokenSide,
    pub tvl: Decimal,
}

fn raw_amounts(pool: &PoolSnapshot, position: &LiquidityPosition) -> Result<(TickRange, TokenAmounts)> {
    pool.validate()?;
    let range = match position.range {
        Some(range) => range,
        None => pool.aligned_range()?,
    };

    let raw = get_amounts_for_liquidity(
        range.lower(),
        range.upper(),
        position.liquidity,
        pool.sqrt_price_x96,
    )?;
    Ok((range, raw))
}

/// Token amounts held by `position` at the snapshot price, scaled by each
/// token's decimals.
pub fn current_amounts(pool: &PoolSnapshot, position: &LiquidityPosition) -> Result<PositionAmounts> {
    let (range, raw) = raw_amounts(pool, position)?;
    scaled_amounts(pool, range, &raw)
}

fn scaled_amounts(pool: &PoolSnapshot, range: TickRange, raw: &TokenAmounts) -> Result<PositionAmounts> {
    Ok(PositionAmounts {
        amount0: Amount::from_token_amount(raw.amount0, pool.decimals0).to_decimal()?,
        amount1: Amount::from_token_amount(raw.amount1, pool.decimals1).to_decimal()?,
        range,
        regime: raw.regime,
    })
}

/// Values `position` in units of `reference`.
///
/// With [`TokenSide::Token0`] token0 counts as one unit and
/// `tvl = amount0 + amount1 / price`; with [`TokenSide::Token1`],
/// `tvl = amount0 * price + amount1`.
///
/// Both forms share the exact numerator `raw0 * sqrtP^2 + raw1 * 2^192`, so
/// the value is converted to a `Decimal` once and never goes through a
/// truncated price.
///
/// # Errors
///
/// Any error of [`current_amounts`], and [`DomainError::Overflow`],
/// [`DomainError::Underflow`] or [`DomainError::PrecisionLoss`] when the
/// value does not fit a `Decimal`.
pub fn tvl(pool: &PoolSnapshot, position: &LiquidityPosition, reference: TokenSide) -> Result<Valuation> {
    let (range, raw) = raw_amounts(pool, position)?;
    let amounts = scaled_amounts(pool, range, &raw)?;

    let sqrt = U512::from(pool.sqrt_price_x96);
    let q96 = U512::from(Q96);
    let overflow = || {
        DomainError::overflow(
            "tvl",
            format!(
                "amount0={} amount1={} sqrt_price_x96={} reference={reference}",
                amounts.amount0, amounts.amount1, pool.sqrt_price_x96
            ),
        )
    };

    let value0 = U512::from(raw.amount0.as_u256())
        .checked_mul(sqrt * sqrt)
        .ok_or_else(overflow)?;
    let value1 = U512::from(raw.amount1.as_u256())
        .checked_mul(q96 * q96)
        .ok_or_else(overflow)?;
    let numerator = value0.checked_add(value1).ok_or_else(overflow)?;
    let denominator = match reference {
        TokenSide::Token0 => (sqrt * sqrt).checked_mul(pow10(u32::from(pool.decimals0))),
        TokenSide::Token1 => (q96 * q96).checked_mul(pow10(u32::from(pool.decimals1))),
    }
    .ok_or_else(overflow)?;

    let tvl = ratio_to_decimal(numerator, denominator, "tvl")?;

    tracing::debug!(
        pool = %pool.pool_id,
        block = pool.block_number,
        regime = %amounts.regime,
        %tvl,
        "valued position"
    );

    Ok(Valuation {
        amounts,
        reference,
        tvl,
    })
}

use crate::enums::TokenSide;
use crate::error::{DomainError, Result};
use crate::math::fixed_point::validate_decimals;
use crate::math::price_tick::{sqrt_price_x96_to_inverse_price, sqrt_price_x96_to_price};
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use crate::math::tick_range::align_range;
use crate::value_objects::price::Price;
use crate::value_objects::tick_range::TickRange;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Pool state read at one block height.
///
/// All derived values of a valuation come from a single snapshot, so the
/// price, tick and liquidity a result is built from are always consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub pool_id: String,
    pub block_number: u64,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub tick_spacing: i32,
    pub decimals0: u8,
    pub decimals1: u8,
}

impl PoolSnapshot {
    /// Builds a snapshot, rejecting readings no pool can report.
    ///
    /// # Errors
    ///
    /// [`DomainError::ZeroSqrtPrice`], [`DomainError::InvalidTickSpacing`],
    /// [`DomainError::TickOutOfBounds`] or [`DomainError::InvalidDecimals`].
    pub fn new(
        pool_id: impl Into<String>,
        block_number: u64,
        sqrt_price_x96: U256,
        tick: i32,
        tick_spacing: i32,
        decimals0: u8,
        decimals1: u8,
    ) -> Result<Self> {
        let snapshot = Self {
            pool_id: pool_id.into(),
            block_number,
            sqrt_price_x96,
            tick,
            tick_spacing,
            decimals0,
            decimals1,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks the invariants `new` enforces. Useful after deserializing.
    pub fn validate(&self) -> Result<()> {
        if self.sqrt_price_x96.is_zero() {
            return Err(DomainError::ZeroSqrtPrice.into());
        }
        if self.tick_spacing <= 0 {
            return Err(DomainError::InvalidTickSpacing {
                spacing: self.tick_spacing,
            }
            .into());
        }
        if !(MIN_TICK..=MAX_TICK).contains(&self.tick) {
            return Err(DomainError::TickOutOfBounds {
                tick: self.tick,
                min: MIN_TICK,
                max: MAX_TICK,
            }
            .into());
        }
        validate_decimals(self.decimals0)?;
        validate_decimals(self.decimals1)?;
        Ok(())
    }

    /// Decimal-adjusted price of token0 in token1.
    pub fn price(&self) -> Result<Price> {
        sqrt_price_x96_to_price(self.sqrt_price_x96, self.decimals0, self.decimals1)
    }

    /// Price of `token` in units of the pool's other token.
    pub fn price_of(&self, token: TokenSide) -> Result<Price> {
        match token {
            TokenSide::Token0 => self.price(),
            TokenSide::Token1 => {
                sqrt_price_x96_to_inverse_price(self.sqrt_price_x96, self.decimals0, self.decimals1)
            }
        }
    }

    /// The spacing-aligned range that contains the current tick.
    pub fn aligned_range(&self) -> Result<TickRange> {
        align_range(self.tick, self.tick_spacing)
    }
}

//! Reward emissions streamed to a pool's stakers.

use crate::entities::PoolSnapshot;
use crate::enums::TokenSide;
use crate::error::{DomainError, Result};
use crate::math::fixed_point::{pow10, ratio_to_decimal, validate_decimals};
use crate::value_objects::price::Price;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;

pub const SECONDS_PER_WEEK: u64 = 604_800;

/// Reward tokens are 18-decimal fixed point unless stated otherwise.
pub const DEFAULT_REWARD_DECIMALS: u8 = 18;

/// Reward tokens emitted in one week from a per-second `reward_rate`.
pub fn weekly_emissions(reward_rate: U256, reward_decimals: u8) -> Result<Decimal> {
    validate_decimals(reward_decimals)?;
    let weekly = U512::from(reward_rate) * U512::from(SECONDS_PER_WEEK);
    ratio_to_decimal(weekly, pow10(u32::from(reward_decimals)), "weekly_emissions")
}

/// Price of the reward token in the other token of `reference_pool`.
pub fn reward_token_price(reference_pool: &PoolSnapshot, reward_side: TokenSide) -> Result<Price> {
    reference_pool.price_of(reward_side)
}

pub fn weekly_emissions_value(weekly_emissions: Decimal, reward_price: Price) -> Result<Decimal> {
    if weekly_emissions.is_sign_negative() && !weekly_emissions.is_zero() {
        return Err(DomainError::NegativeValue {
            name: "weekly_emissions",
            value: weekly_emissions,
        }
        .into());
    }
    weekly_emissions
        .checked_mul(reward_price.value)
        .ok_or_else(|| {
            DomainError::overflow(
                "weekly_emissions_value",
                format!("emissions={weekly_emissions} price={reward_price}"),
            )
            .into()
        })
}

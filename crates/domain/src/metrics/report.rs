use crate::entities::{LiquidityPosition, PoolSnapshot};
use crate::enums::TokenSide;
use crate::error::Result;
use crate::metrics::apr::{DEFAULT_PERIOD_DAYS, YieldResult, apr};
use crate::metrics::emissions::{weekly_emissions, weekly_emissions_value};
use crate::metrics::tvl::{Valuation, tvl};
use crate::value_objects::price::Price;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reward stream of a pool and the price it is valued at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardInputs {
    /// Reward tokens per second, in the reward token's smallest unit.
    pub reward_rate: U256,
    pub reward_decimals: u8,
    /// Reward token price in the valuation's reference token.
    pub reward_price: Price,
}

/// Everything known about a pool's yield at one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolYield {
    pub pool_id: String,
    pub block_number: u64,
    pub valuation: Valuation,
    pub weekly_emissions: Decimal,
    pub weekly_emissions_value: Decimal,
    /// `None` when the position holds no value and the rate is undefined.
    pub apr: Option<YieldResult>,
}

/// Values `position` and annualizes the pool's weekly reward against it.
pub fn pool_yield(
    pool: &PoolSnapshot,
    position: &LiquidityPosition,
    reward: &RewardInputs,
    reference: TokenSide,
) -> Result<PoolYield> {
    let valuation = tvl(pool, position, reference)?;
    let emissions = weekly_emissions(reward.reward_rate, reward.reward_decimals)?;
    let emissions_value = weekly_emissions_value(emissions, reward.reward_price)?;

    let apr = match apr(emissions_value, valuation.tvl, DEFAULT_PERIOD_DAYS) {
        Ok(result) => Some(result),
        Err(err) if err.is_division_by_zero() => {
            tracing::debug!(pool = %pool.pool_id, "apr undefined: {err}");
            None
        }
        Err(err) => return Err(err),
    };

    Ok(PoolYield {
        pool_id: pool.pool_id.clone(),
        block_number: pool.block_number,
        valuation,
        weekly_emissions: emissions,
        weekly_emissions_value: emissions_value,
        apr,
    })
}

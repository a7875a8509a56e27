//! Prelude module for convenient imports.
//!
//! ```rust
//! use clmm_yield_domain::prelude::*;
//! ```

pub use crate::entities::{LiquidityPosition, PoolSnapshot};
pub use crate::enums::{PriceRegime, TokenSide};
pub use crate::error::{DomainError, Result, ValuationError};

pub use crate::math::concentrated_liquidity::get_amounts_for_liquidity;
pub use crate::math::fixed_point::{MAX_TOKEN_DECIMALS, Q96};
pub use crate::math::price_tick::{
    ROUND_TRIP_TOLERANCE_BPS, price_to_sqrt_price_x96, price_to_tick, sqrt_price_x96_to_inverse_price,
    sqrt_price_x96_to_price, tick_to_price, tick_to_sqrt_price_x96,
};
pub use crate::math::tick_math::{MAX_TICK, MIN_TICK};
pub use crate::math::tick_range::align_range;

pub use crate::metrics::apr::{DAYS_PER_YEAR, DEFAULT_PERIOD_DAYS, YieldResult, apr};
pub use crate::metrics::emissions::{
    DEFAULT_REWARD_DECIMALS, SECONDS_PER_WEEK, reward_token_price, weekly_emissions,
    weekly_emissions_value,
};
pub use crate::metrics::report::{PoolYield, RewardInputs, pool_yield};
pub use crate::metrics::tvl::{Valuation, current_amounts, tvl};

pub use crate::token::TokenAmount;
pub use crate::value_objects::{Amount, Percentage, PositionAmounts, Price, TickRange, TokenAmounts};

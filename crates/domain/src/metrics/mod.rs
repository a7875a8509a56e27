//! Valuation and yield metrics built on the pool math.

pub mod apr;
pub mod emissions;
pub mod report;
pub mod tvl;

pub use apr::{YieldResult, apr};
pub use emissions::{reward_token_price, weekly_emissions, weekly_emissions_value};
pub use report::{PoolYield, RewardInputs, pool_yield};
pub use tvl::{Valuation, current_amounts, tvl};

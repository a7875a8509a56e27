use crate::value_objects::tick_range::TickRange;
use serde::{Deserialize, Serialize};

/// Liquidity supplied to a pool.
///
/// Without an explicit range the position is valued over the active,
/// spacing-aligned range around the pool's current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiquidityPosition {
    pub liquidity: u128,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<TickRange>,
}

impl LiquidityPosition {
    pub fn new(liquidity: u128, range: TickRange) -> Self {
        Self {
            liquidity,
            range: Some(range),
        }
    }

    /// Liquidity valued over the range containing the current tick.
    pub fn active(liquidity: u128) -> Self {
        Self {
            liquidity,
            range: None,
        }
    }
}

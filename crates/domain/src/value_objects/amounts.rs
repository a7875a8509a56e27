use crate::enums::PriceRegime;
use crate::token::TokenAmount;
use crate::value_objects::tick_range::TickRange;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw token quantities a liquidity amount represents at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmounts {
    pub amount0: TokenAmount,
    pub amount1: TokenAmount,
    pub regime: PriceRegime,
}

/// Decimal-scaled quantities of a position at the snapshot price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAmounts {
    pub amount0: Decimal,
    pub amount1: Decimal,
    /// Range the amounts were decomposed over.
    pub range: TickRange,
    pub regime: PriceRegime,
}

use crate::error::Result;
use crate::math::fixed_point::{pow10, ratio_to_decimal, validate_decimals};
use crate::token::TokenAmount;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A raw token quantity together with the token's decimal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn from_token_amount(amount: TokenAmount, decimals: u8) -> Self {
        Self::new(amount.as_u256(), decimals)
    }

    /// Human-scale quantity, `raw / 10^decimals`, truncated toward zero.
    ///
    /// Above 28 decimals the smallest units fall below a `Decimal`'s scale; a
    /// non-zero amount that would truncate to zero or to a few digits fails
    /// with [`DomainError::Underflow`] or [`DomainError::PrecisionLoss`].
    ///
    /// [`DomainError::Underflow`]: crate::error::DomainError::Underflow
    /// [`DomainError::PrecisionLoss`]: crate::error::DomainError::PrecisionLoss
    pub fn to_decimal(&self) -> Result<Decimal> {
        validate_decimals(self.decimals)?;
        ratio_to_decimal(
            U512::from(self.raw),
            pow10(u32::from(self.decimals)),
            "amount_to_decimal",
        )
    }
}

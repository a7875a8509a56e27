use crate::error::{DomainError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal-adjusted price of one pool token in the other, token1 per token0
/// unless stated otherwise, or its inverse after [`Price::invert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub const ONE: Self = Self {
        value: Decimal::ONE,
    };

    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Returns `1 / price`, rounded to a `Decimal`'s precision.
    ///
    /// # Errors
    ///
    /// [`DomainError::ZeroPrice`] when the price is zero.
    pub fn invert(&self) -> Result<Self> {
        if self.value.is_zero() {
            return Err(DomainError::ZeroPrice { price: self.value }.into());
        }
        let value = Decimal::ONE
            .checked_div(self.value)
            .ok_or_else(|| DomainError::overflow("invert", self.value.to_string()))?;
        Ok(Self { value })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

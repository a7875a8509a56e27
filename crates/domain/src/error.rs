//! Error types for position valuation.
//!
//! Every fallible operation in this crate returns [`ValuationError`]. Invalid
//! numeric input, and results a [`Decimal`] cannot hold to at least twelve
//! significant digits, are reported as [`DomainError`]; a zero TVL when
//! annualizing a reward is reported separately as [`ValuationError::DivisionByZero`] so that
//! callers can render the rate as undefined instead of failing.

use primitive_types::U256;
use rust_decimal::Decimal;

/// Invalid numeric input to one of the valuation components.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Tick spacing must be strictly positive.
    #[error("tick spacing must be positive, got {spacing}")]
    InvalidTickSpacing {
        /// The offending spacing.
        spacing: i32,
    },
    /// Lower tick must be strictly below upper tick.
    #[error("tick range [{lower}, {upper}) is empty: lower must be below upper")]
    InvalidTickRange {
        /// Lower bound.
        lower: i32,
        /// Upper bound.
        upper: i32,
    },
    /// Tick outside the range supported by the pool's price encoding.
    #[error("tick {tick} is outside [{min}, {max}]")]
    TickOutOfBounds {
        /// The offending tick.
        tick: i32,
        /// Minimum supported tick.
        min: i32,
        /// Maximum supported tick.
        max: i32,
    },
    /// The square-root price is zero.
    #[error("sqrt price must be positive")]
    ZeroSqrtPrice,
    /// The square-root price cannot be mapped back to a tick.
    #[error("sqrt price {sqrt_price_x96} is outside the tick-addressable range")]
    SqrtPriceOutOfBounds {
        /// The offending Q64.96 value.
        sqrt_price_x96: U256,
    },
    /// A price of zero cannot be inverted or converted to a tick.
    #[error("price must be positive, got {price}")]
    ZeroPrice {
        /// The offending price.
        price: Decimal,
    },
    /// A value that must be non-negative was negative.
    #[error("{name} must be non-negative, got {value}")]
    NegativeValue {
        /// Name of the input.
        name: &'static str,
        /// The offending value.
        value: Decimal,
    },
    /// Token decimals beyond what the fixed-point domain supports.
    #[error("token decimals {decimals} exceed the supported maximum of {max}")]
    InvalidDecimals {
        /// The offending decimals.
        decimals: u8,
        /// Maximum supported decimals.
        max: u8,
    },
    /// The reward period must span at least one day.
    #[error("reward period must be at least one day, got {days}")]
    InvalidPeriod {
        /// The offending period length.
        days: u32,
    },
    /// A non-zero value is too small for the decimal representation.
    #[error("underflow in {operation} ({inputs})")]
    Underflow {
        /// Operation that underflowed.
        operation: &'static str,
        /// Rendered inputs of the operation.
        inputs: String,
    },
    /// A truncating conversion kept too few significant digits to be trusted.
    #[error("{operation} kept only {significant_digits} significant digits, need {min}")]
    PrecisionLoss {
        /// Operation that truncated.
        operation: &'static str,
        /// Significant digits that survived the conversion.
        significant_digits: u32,
        /// Required significant digits.
        min: u32,
    },
    /// An intermediate or final value does not fit its representation.
    #[error("overflow in {operation} ({inputs})")]
    Overflow {
        /// Operation that overflowed.
        operation: &'static str,
        /// Rendered inputs of the operation.
        inputs: String,
    },
}

impl DomainError {
    /// Builds an [`DomainError::Overflow`] from an operation name and its inputs.
    pub fn overflow(operation: &'static str, inputs: impl Into<String>) -> Self {
        Self::Overflow {
            operation,
            inputs: inputs.into(),
        }
    }
}

/// Error returned by valuation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValuationError {
    /// Invalid numeric input.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The rate is undefined because the locked value is zero.
    #[error("rate is undefined: tvl is zero (reward value {reward_value} over {period_days} days)")]
    DivisionByZero {
        /// Reward value over the period.
        reward_value: Decimal,
        /// Period length in days.
        period_days: u32,
    },
}

impl ValuationError {
    /// Returns true for the zero-TVL case.
    #[must_use]
    pub fn is_division_by_zero(&self) -> bool {
        matches!(self, Self::DivisionByZero { .. })
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ValuationError>;

//! Valuation core for concentrated-liquidity pool positions.
//!
//! Given one pool snapshot (sqrt price, tick, tick spacing, token decimals)
//! and a liquidity amount, this crate:
//! - converts the Q64.96 sqrt price into a decimal price
//! - aligns the current tick to the pool's tick spacing
//! - decomposes liquidity into token0/token1 amounts
//! - values the amounts in one of the pool's tokens
//! - annualizes a weekly reward into an APR
//!
//! All functions are pure and synchronous. Integer math stays in exact
//! 256/512-bit fixed point and is converted to [`rust_decimal::Decimal`]
//! only at the edges.

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool snapshot and liquidity position.
pub mod entities;
/// Shared enums.
pub mod enums;
/// Error types.
pub mod error;
/// Fixed-point and tick math.
pub mod math;
/// TVL, APR and emissions.
pub mod metrics;
/// Raw token quantities.
pub mod token;
/// Prices, ranges and amounts.
pub mod value_objects;

#[cfg(test)]
mod proptest_properties;

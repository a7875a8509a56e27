//! Q64.96 fixed-point helpers.
//!
//! Pool prices arrive as `sqrt(price) * 2^96` in a 160-bit integer. Squaring
//! that value or scaling it by token decimals overflows every native type, so
//! intermediate results are kept as exact 512-bit rationals and converted to
//! [`Decimal`] exactly once, at the edge, truncating toward zero. A conversion
//! that would keep fewer than [`MIN_SIGNIFICANT_DIGITS`] fails instead.

use crate::error::{DomainError, Result};
use primitive_types::{U256, U512};
use rust_decimal::Decimal;

/// 2^96, the Q64.96 scaling factor.
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// Fractional bits of a Q64.96 value.
pub const RESOLUTION: u32 = 96;

/// Largest token decimals accepted by the price and amount conversions.
pub const MAX_TOKEN_DECIMALS: u8 = 36;

/// Below this many significant digits a truncating conversion fails with
/// [`DomainError::PrecisionLoss`].
pub const MIN_SIGNIFICANT_DIGITS: u32 = 12;

/// Largest scale a [`Decimal`] can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Computes `floor(a * b / denominator)` with a 512-bit intermediate.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    if denominator.is_zero() {
        return Err(DomainError::overflow("mul_div", format!("{a} * {b} / 0")).into());
    }
    let quotient = U512::from(a) * U512::from(b) / U512::from(denominator);
    U256::try_from(quotient)
        .map_err(|_| DomainError::overflow("mul_div", format!("{a} * {b} / {denominator}")).into())
}

/// `10^exponent` as a 512-bit integer.
pub fn pow10(exponent: u32) -> U512 {
    U512::exp10(exponent as usize)
}

/// Rejects decimals the fixed-point domain cannot scale by.
pub fn validate_decimals(decimals: u8) -> Result<()> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(DomainError::InvalidDecimals {
            decimals,
            max: MAX_TOKEN_DECIMALS,
        }
        .into());
    }
    Ok(())
}

/// Splits `10^(decimals0 - decimals1)` into a numerator and a denominator so
/// that the adjustment stays an exact integer ratio.
pub fn decimal_adjustment(decimals0: u8, decimals1: u8) -> Result<(U512, U512)> {
    validate_decimals(decimals0)?;
    validate_decimals(decimals1)?;
    let (d0, d1) = (u32::from(decimals0), u32::from(decimals1));
    if d0 >= d1 {
        Ok((pow10(d0 - d1), U512::one()))
    } else {
        Ok((U512::one(), pow10(d1 - d0)))
    }
}

/// Floor of the square root of `value` (Newton iteration).
pub fn integer_sqrt(value: U512) -> U512 {
    if value.is_zero() {
        return U512::zero();
    }
    // 2^ceil(bits/2) is never below the root.
    let mut x = U512::one() << value.bits().div_ceil(2);
    loop {
        let y = (x + value / x) >> 1u32;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Splits a non-negative decimal into `(mantissa, 10^scale)`.
pub fn decimal_to_ratio(value: Decimal, name: &'static str) -> Result<(U512, U512)> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::NegativeValue { name, value }.into());
    }
    let mantissa = value.mantissa().unsigned_abs();
    Ok((U512::from(mantissa), pow10(value.scale())))
}

/// Converts the exact ratio `numerator / denominator` to a [`Decimal`].
///
/// Picks the largest scale whose mantissa fits in 96 bits and truncates the
/// rest. `operation` labels errors.
///
/// # Errors
///
/// [`DomainError::Overflow`] when the value exceeds the decimal range,
/// [`DomainError::Underflow`] when a non-zero ratio truncates to zero, and
/// [`DomainError::PrecisionLoss`] when an inexact result keeps fewer than
/// [`MIN_SIGNIFICANT_DIGITS`].
pub fn ratio_to_decimal(
    numerator: U512,
    denominator: U512,
    operation: &'static str,
) -> Result<Decimal> {
    if denominator.is_zero() {
        return Err(DomainError::overflow(operation, format!("{numerator} / 0")).into());
    }
    if numerator.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let max_mantissa = (U512::one() << 96u32) - U512::one();
    for scale in (0..=MAX_DECIMAL_SCALE).rev() {
        // An overflowing product means the quotient is far past 96 bits too.
        let Some(scaled) = numerator.checked_mul(pow10(scale)) else {
            continue;
        };
        let mantissa = scaled / denominator;
        if mantissa > max_mantissa {
            continue;
        }

        if mantissa.is_zero() {
            return Err(DomainError::Underflow {
                operation,
                inputs: format!("{numerator} / {denominator}"),
            }
            .into());
        }
        if !(scaled % denominator).is_zero() {
            let significant_digits = significant_digits(mantissa);
            if significant_digits < MIN_SIGNIFICANT_DIGITS {
                return Err(DomainError::PrecisionLoss {
                    operation,
                    significant_digits,
                    min: MIN_SIGNIFICANT_DIGITS,
                }
                .into());
            }
        }

        let value = Decimal::try_from_i128_with_scale(mantissa.low_u128() as i128, scale)
            .map_err(|_| DomainError::overflow(operation, format!("{numerator} / {denominator}")))?;
        return Ok(value.normalize());
    }

    Err(DomainError::overflow(operation, format!("{numerator} / {denominator}")).into())
}

fn significant_digits(mantissa: U512) -> u32 {
    mantissa.to_string().len() as u32
}

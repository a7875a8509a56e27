use crate::error::{DomainError, Result, ValuationError};
use crate::value_objects::percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DAYS_PER_YEAR: u32 = 365;

/// Rewards are reported per week.
pub const DEFAULT_PERIOD_DAYS: u32 = 7;

/// Annualized, non-compounding yield of a periodic reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldResult {
    pub apr: Percentage,
    /// Reward value scaled to one year.
    pub annualized_reward: Decimal,
    pub period_days: u32,
}

/// Calculates APR from the reward value earned over `period_days`.
/// APR = reward * 365 / period_days / tvl * 100
///
/// Both inputs must be in the same unit of account.
///
/// # Errors
///
/// [`ValuationError::DivisionByZero`] when `tvl` is zero: the rate is
/// undefined, not zero. [`DomainError`] for a zero period, negative inputs
/// or a result outside the `Decimal` range.
pub fn apr(reward_value: Decimal, tvl: Decimal, period_days: u32) -> Result<YieldResult> {
    if period_days == 0 {
        return Err(DomainError::InvalidPeriod { days: period_days }.into());
    }
    if reward_value.is_sign_negative() && !reward_value.is_zero() {
        return Err(DomainError::NegativeValue {
            name: "reward_value",
            value: reward_value,
        }
        .into());
    }
    if tvl.is_sign_negative() && !tvl.is_zero() {
        return Err(DomainError::NegativeValue {
            name: "tvl",
            value: tvl,
        }
        .into());
    }
    if tvl.is_zero() {
        return Err(ValuationError::DivisionByZero {
            reward_value,
            period_days,
        });
    }

    let days = Decimal::from(period_days);
    let year = Decimal::from(DAYS_PER_YEAR);
    let overflow = || {
        DomainError::overflow(
            "apr",
            format!("reward_value={reward_value} tvl={tvl} period_days={period_days}"),
        )
    };

    // Multiply before dividing so 365/7 is never rounded on its own.
    let yearly = reward_value.checked_mul(year).ok_or_else(overflow)?;
    let annualized_reward = yearly.checked_div(days).ok_or_else(overflow)?;
    let rate = yearly
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|n| tvl.checked_mul(days).and_then(|d| n.checked_div(d)))
        .ok_or_else(overflow)?;

    Ok(YieldResult {
        apr: Percentage::new(rate.normalize()),
        annualized_reward: annualized_reward.normalize(),
        period_days,
    })
}

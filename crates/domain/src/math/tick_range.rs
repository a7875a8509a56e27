use crate::error::{DomainError, Result};
use crate::value_objects::tick_range::TickRange;

/// Returns the spacing-aligned range `[lower, lower + spacing)` that contains
/// `current_tick`.
///
/// Uses the Euclidean remainder, so negative ticks align downward:
/// `(-5, 10)` gives `[-10, 0)`.
///
/// # Errors
///
/// [`DomainError::InvalidTickSpacing`] when `spacing <= 0`, and
/// [`DomainError::Overflow`] if a bound leaves the `i32` range.
pub fn align_range(current_tick: i32, spacing: i32) -> Result<TickRange> {
    if spacing <= 0 {
        return Err(DomainError::InvalidTickSpacing { spacing }.into());
    }

    let decrement = current_tick.rem_euclid(spacing);
    let overflow = || {
        DomainError::overflow(
            "align_range",
            format!("tick={current_tick} spacing={spacing}"),
        )
    };
    let lower = current_tick.checked_sub(decrement).ok_or_else(overflow)?;
    let upper = lower.checked_add(spacing).ok_or_else(overflow)?;

    TickRange::new(lower, upper)
}

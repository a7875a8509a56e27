use crate::error::{DomainError, Result, ValuationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open tick interval `[lower, upper)` a position provides liquidity over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTickRange")]
pub struct TickRange {
    lower: i32,
    upper: i32,
}

impl TickRange {
    /// # Errors
    ///
    /// [`DomainError::InvalidTickRange`] unless `lower < upper`.
    pub fn new(lower: i32, upper: i32) -> Result<Self> {
        if lower >= upper {
            return Err(DomainError::InvalidTickRange { lower, upper }.into());
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> i32 {
        self.lower
    }

    pub fn upper(&self) -> i32 {
        self.upper
    }

    pub fn width(&self) -> i64 {
        i64::from(self.upper) - i64::from(self.lower)
    }
}

#[derive(Deserialize)]
struct RawTickRange {
    lower: i32,
    upper: i32,
}

impl TryFrom<RawTickRange> for TickRange {
    type Error = ValuationError;

    fn try_from(raw: RawTickRange) -> Result<Self> {
        Self::new(raw.lower, raw.upper)
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_order() {
        assert!(TickRange::new(0, 10).is_ok());
        assert!(TickRange::new(10, 10).is_err());
        assert!(TickRange::new(10, 0).is_err());
    }

    #[test]
    fn test_width_and_display() {
        let r = TickRange::new(-10, 0).unwrap();
        assert_eq!(r.width(), 10);
        assert_eq!(TickRange::new(-887_272, 887_272).unwrap().width(), 1_774_544);
        assert_eq!(r.to_string(), "[-10, 0)");
    }
}

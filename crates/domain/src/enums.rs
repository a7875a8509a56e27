use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the current price sits relative to a position's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceRegime {
    /// Price below the lower bound: the position holds only token0.
    BelowRange,
    /// Price inside `[lower, upper)`: the position holds both tokens.
    InRange,
    /// Price at or above the upper bound: the position holds only token1.
    AboveRange,
}

impl fmt::Display for PriceRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BelowRange => "below range",
            Self::InRange => "in range",
            Self::AboveRange => "above range",
        };
        f.write_str(s)
    }
}

/// One side of a token pair.
///
/// Used both for the unit of account of a valuation and for locating the
/// reward token inside its pricing pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSide {
    #[default]
    Token0,
    Token1,
}

impl fmt::Display for TokenSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token0 => f.write_str("token0"),
            Self::Token1 => f.write_str("token1"),
        }
    }
}

impl FromStr for TokenSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "token0" => Ok(Self::Token0),
            "1" | "token1" => Ok(Self::Token1),
            other => Err(format!("unknown token side '{other}', expected token0 or token1")),
        }
    }
}

//! Option type and resolved contract inputs
//!
//! A `Contract` is the set of scalars the pricer needs for one listed option,
//! built per request from a chain record and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::HeatmapError;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    #[default]
    #[serde(alias = "c", alias = "calls")]
    Call,
    #[serde(alias = "p", alias = "puts")]
    Put,
}

impl OptionType {
    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl FromStr for OptionType {
    type Err = HeatmapError;

    /// Accepts the short tags used by the web front end (`c`, `p`) as well as
    /// the chain side names (`calls`, `puts`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "call" | "calls" => Ok(OptionType::Call),
            "p" | "put" | "puts" => Ok(OptionType::Put),
            other => Err(HeatmapError::invalid_argument(format!(
                "unrecognized option type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Resolved pricing inputs for a single contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Underlying last trade price
    #[serde(alias = "under_price")]
    pub underlying_price: f64,
    pub strike_price: f64,
    /// Years to expiry (calendar days / 365)
    #[serde(alias = "time")]
    pub time_to_expiry: f64,
    /// Annualized, as a fraction (0.30 rather than 30%)
    #[serde(alias = "vol")]
    pub implied_volatility: f64,
    /// Annualized, as a fraction
    #[serde(alias = "intrest")]
    pub risk_free_rate: f64,
    #[serde(default)]
    pub option_type: OptionType,
    /// Market price used as the P&L baseline
    #[serde(alias = "option_price")]
    pub last_traded_price: f64,
}

impl Contract {
    /// Days to expiry, rounded half-to-even
    pub fn days_to_expiry(&self) -> i64 {
        (self.time_to_expiry * 365.0).round_ties_even() as i64
    }

    /// Copy of this contract priced as the other side
    pub fn with_option_type(&self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..self.clone()
        }
    }
}

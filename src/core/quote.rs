//! Option chain records
//!
//! Market data for one ticker as it travels to and from the web front end:
//! per expiration date, one record per listed call or put. Field names on the
//! wire are the display labels the front end renders as table headers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{HeatmapError, HeatmapResult};
use super::option::OptionType;

/// Placeholder shown for a quote field the provider did not report
pub const MISSING: &str = "-";

/// Records keyed by expiration date (`YYYY-MM-DD`)
pub type ExpiryMap = BTreeMap<String, Vec<ContractRecord>>;

/// One row of an option chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    #[serde(rename = "Contract Name")]
    pub contract_symbol: String,
    #[serde(rename = "Strike")]
    pub strike: f64,
    #[serde(rename = "Last Price", default)]
    pub last_price: Option<f64>,
    #[serde(rename = "Bid", default)]
    pub bid: Option<f64>,
    #[serde(rename = "Ask", default)]
    pub ask: Option<f64>,
    #[serde(rename = "Change", default)]
    pub change: Option<f64>,
    #[serde(rename = "% Change", default)]
    pub percent_change: Option<f64>,
    #[serde(rename = "Volume", default, with = "dash_or_count")]
    pub volume: Option<u64>,
    #[serde(rename = "Open Interest", default, with = "dash_or_count")]
    pub open_interest: Option<u64>,
    /// Percentage string such as `"31.25%"`, or `"-"` when undefined
    #[serde(rename = "Implied Volatility", default = "missing")]
    pub implied_volatility: String,
    #[serde(rename = "Underlying Price")]
    pub underlying_price: f64,
}

fn missing() -> String {
    MISSING.to_string()
}

impl ContractRecord {
    /// Format a provider volatility (fraction) for display
    pub fn format_implied_volatility(iv: Option<f64>) -> String {
        match iv {
            Some(v) if v.is_finite() && v != 0.0 => format!("{:.2}%", v * 100.0),
            _ => missing(),
        }
    }

    /// Implied volatility as an annualized fraction
    pub fn implied_volatility_fraction(&self) -> HeatmapResult<f64> {
        let raw = self.implied_volatility.trim();
        if raw == MISSING {
            return Err(HeatmapError::invalid_argument(format!(
                "{} has no implied volatility",
                self.contract_symbol
            )));
        }

        raw.trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(|pct| pct / 100.0)
            .map_err(|_| {
                HeatmapError::invalid_argument(format!(
                    "unparsable implied volatility '{}' for {}",
                    raw, self.contract_symbol
                ))
            })
    }
}

/// Option chain for one ticker across all listed expirations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionChain {
    /// Expiration dates in provider order
    pub expirations: Vec<String>,
    pub underlying_price: f64,
    pub calls: ExpiryMap,
    pub puts: ExpiryMap,
}

impl OptionChain {
    pub fn new(underlying_price: f64) -> Self {
        Self {
            underlying_price,
            ..Default::default()
        }
    }

    /// Records for one side of the chain
    pub fn side(&self, option_type: OptionType) -> &ExpiryMap {
        match option_type {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.values().all(Vec::is_empty) && self.puts.values().all(Vec::is_empty)
    }

    /// Listed strikes for one expiration, ascending
    pub fn strikes(&self, expiration: &str, option_type: OptionType) -> Vec<f64> {
        let mut strikes: Vec<f64> = self
            .side(option_type)
            .get(expiration)
            .map(|records| records.iter().map(|r| r.strike).collect())
            .unwrap_or_default();
        strikes.sort_by(f64::total_cmp);
        strikes
    }
}

/// Volume-style counts: a number, or `"-"` when the provider omits them
mod dash_or_count {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => s.serialize_u64(*n),
            None => s.serialize_str(super::MISSING),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Option::<Raw>::deserialize(d)? {
            Some(Raw::Number(n)) if n.is_finite() && n >= 0.0 => Some(n as u64),
            Some(Raw::Text(t)) => t.trim().parse::<u64>().ok(),
            _ => None,
        })
    }
}

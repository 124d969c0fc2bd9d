//! Market data seams
//!
//! The resolver and the HTTP layer only see these traits, so tests and the
//! CLI can swap the live Yahoo client for fixed data.

use crate::core::{HeatmapResult, OptionChain};

/// Provider of option chains
pub trait ChainSource: Send + Sync {
    /// All listed expirations with their call and put records
    fn fetch_chain(&self, ticker: &str) -> HeatmapResult<OptionChain>;
}

/// Provider of the current risk-free rate
pub trait RateSource: Send + Sync {
    /// Annualized rate as a fraction
    fn risk_free_rate(&self) -> HeatmapResult<f64>;
}

/// Both collaborators behind one object
pub trait MarketData: ChainSource + RateSource {}

impl<T: ChainSource + RateSource> MarketData for T {}

/// Constant rate, for offline use
#[derive(Debug, Clone, Copy)]
pub struct FixedRate(pub f64);

impl RateSource for FixedRate {
    fn risk_free_rate(&self) -> HeatmapResult<f64> {
        Ok(self.0)
    }
}

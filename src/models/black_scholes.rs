//! Black-Scholes Model
//!
//! European call/put pricing from five scalars. Used by the heatmap engine to
//! revalue a contract at every (underlying price, days to expiry) cell.
//!
//! Inputs are validated up front: a zero volatility or a non-positive
//! underlying/strike has no finite d1, so those are reported as
//! `HeatmapError::Domain` instead of leaking NaN into the grid.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::core::{HeatmapError, HeatmapResult, OptionType};

/// Stand-in for a time to expiry of exactly zero, keeping d1/d2 finite.
/// The resulting price is near intrinsic, not the exact expiry limit.
pub const EXPIRY_EPSILON: f64 = 1e-7;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    Normal::standard().cdf(x)
}

/// Black-Scholes d1 and d2
fn d1_d2(spot: f64, strike: f64, time: f64, vol: f64, rate: f64) -> (f64, f64) {
    let vol_sqrt_t = vol * time.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Black-Scholes European option price
///
/// `time` is in years and `vol`/`rate` are annualized fractions.
pub fn price(
    spot: f64,
    strike: f64,
    time: f64,
    vol: f64,
    rate: f64,
    option_type: OptionType,
) -> HeatmapResult<f64> {
    if !(spot > 0.0 && spot.is_finite()) {
        return Err(HeatmapError::domain(format!(
            "underlying price must be positive, got {}",
            spot
        )));
    }
    if !(strike > 0.0 && strike.is_finite()) {
        return Err(HeatmapError::domain(format!("strike must be positive, got {}", strike)));
    }
    if !(vol > 0.0 && vol.is_finite()) {
        return Err(HeatmapError::domain(format!("volatility must be positive, got {}", vol)));
    }
    if !(time >= 0.0 && time.is_finite()) {
        return Err(HeatmapError::domain(format!(
            "time to expiry must be non-negative, got {}",
            time
        )));
    }
    if !rate.is_finite() {
        return Err(HeatmapError::domain("risk-free rate is not finite"));
    }

    let time = if time == 0.0 { EXPIRY_EPSILON } else { time };
    let (d1, d2) = d1_d2(spot, strike, time, vol, rate);
    let discounted_strike = strike * (-rate * time).exp();

    let value = match option_type {
        OptionType::Call => spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - spot * norm_cdf(-d1),
    };
    Ok(value)
}

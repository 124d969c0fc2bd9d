//! Heatmap axes
//!
//! Rows are underlying price levels, columns are days to expiration.
//!
//! Columns run from the contract's remaining days down to zero. Short-dated
//! contracts get one column per day; past 50 days the step widens so the grid
//! stays around 50 columns wide.
//!
//! Rows come in two modes:
//! - Default range: geometric steps around the current underlying price,
//!   skewed toward the side where the option gains (5 below / 25 above for a
//!   call, 25 below / 5 above for a put). Steps are 0.5% for horizons of 30
//!   days or less, 1% otherwise.
//! - Explicit range: 30 evenly spaced levels starting at `range_min`.
//!
//! Rows are always returned highest price first.

use serde::{Deserialize, Serialize};

use crate::core::{HeatmapError, HeatmapResult, OptionType};

/// Number of price levels in either row mode
pub const ROW_COUNT: usize = 30;

/// Horizons shorter than this get a column for every day
const DAILY_COLUMN_LIMIT: i64 = 51;

/// Target column count for long horizons
const COLUMN_TARGET: f64 = 50.0;

/// Horizons up to this many days use the fine price step
const SHORT_HORIZON_DAYS: i64 = 30;

/// One cent per row
const MIN_EXPLICIT_WIDTH: f64 = 0.01 * ROW_COUNT as f64;

/// Steps on the side of the underlying where the option loses value
const MINOR_SIDE_STEPS: usize = 5;

/// Row and column labels for one heatmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisPair {
    /// Underlying price levels, descending
    pub row_prices: Vec<f64>,
    /// Days to expiration, descending
    pub col_days: Vec<i64>,
}

/// Round half-to-even, the convention used for day counts
fn round_days(days: f64) -> i64 {
    days.round_ties_even() as i64
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Total calendar days covered by `time_years`
pub fn total_days(time_years: f64) -> i64 {
    round_days(time_years * 365.0)
}

/// Days-to-expiration columns, descending from `total_days`
pub fn day_columns(total_days: i64) -> Vec<i64> {
    if total_days < 0 {
        return Vec::new();
    }

    let step = if total_days < DAILY_COLUMN_LIMIT {
        1
    } else {
        round_days(total_days as f64 / COLUMN_TARGET).max(1)
    };

    (0..=total_days).rev().step_by(step as usize).collect()
}

/// Default price levels around `underlying`, ascending
fn default_prices(underlying: f64, total_days: i64, option_type: OptionType) -> Vec<f64> {
    let (up, down) = if total_days <= SHORT_HORIZON_DAYS {
        (1.005_f64, 0.995_f64)
    } else {
        (1.01_f64, 0.99_f64)
    };

    let major_side = ROW_COUNT - MINOR_SIDE_STEPS;
    let (steps_below, steps_above) = match option_type {
        OptionType::Call => (MINOR_SIDE_STEPS, major_side),
        OptionType::Put => (major_side, MINOR_SIDE_STEPS),
    };

    // Levels strictly below the underlying, then the underlying and above
    let below = (1..=steps_below)
        .rev()
        .map(|i| round_cents(underlying * down.powi(i as i32)));
    let above = (0..steps_above).map(|i| round_cents(underlying * up.powi(i as i32)));

    below.chain(above).collect()
}

/// Evenly spaced levels from `range_min`, ascending
fn explicit_prices(range_min: f64, range_max: f64) -> Vec<f64> {
    let increment = (range_max - range_min) / ROW_COUNT as f64;
    (0..ROW_COUNT)
        .map(|i| round_cents(range_min + increment * i as f64))
        .collect()
}

/// Build the price rows and day columns for a contract.
///
/// `range_min == range_max == 0` selects the default range around
/// `underlying_price`; otherwise `range_max > range_min >= 0` is required.
pub fn build_axes(
    time_years: f64,
    option_type: OptionType,
    range_min: f64,
    range_max: f64,
    underlying_price: f64,
) -> HeatmapResult<AxisPair> {
    if !(time_years >= 0.0 && time_years.is_finite()) {
        return Err(HeatmapError::invalid_argument(format!(
            "time to expiry must be non-negative, got {}",
            time_years
        )));
    }

    let days = total_days(time_years);
    let col_days = day_columns(days);

    let mut row_prices = if range_min == 0.0 && range_max == 0.0 {
        if !(underlying_price > 0.0 && underlying_price.is_finite()) {
            return Err(HeatmapError::invalid_argument(format!(
                "underlying price must be positive, got {}",
                underlying_price
            )));
        }
        default_prices(underlying_price, days, option_type)
    } else if range_max > range_min
        && range_max > 0.0
        && range_min >= 0.0
        && range_max.is_finite()
    {
        // Rows are rounded to cents; narrower ranges repeat levels
        if range_max - range_min < MIN_EXPLICIT_WIDTH - 1e-9 {
            return Err(HeatmapError::invalid_argument(format!(
                "price range [{}, {}] is narrower than {:.2}",
                range_min, range_max, MIN_EXPLICIT_WIDTH
            )));
        }
        explicit_prices(range_min, range_max)
    } else {
        return Err(HeatmapError::invalid_argument(format!(
            "invalid price range [{}, {}]",
            range_min, range_max
        )));
    };

    row_prices.reverse();

    Ok(AxisPair { row_prices, col_days })
}

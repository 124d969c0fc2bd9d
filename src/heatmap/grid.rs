//! Heatmap engine
//!
//! Revalues a contract with Black-Scholes at every (price, day) cell and
//! reports the percentage P&L against the contract's last traded price.

use ndarray::Array2;
use serde::ser::{Serialize, Serializer};

use super::axes::build_axes;
use crate::core::{Contract, HeatmapError, HeatmapResult, OptionType};
use crate::models::black_scholes;

/// Percentage P&L grid with its axis labels
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapGrid {
    /// Underlying price levels, descending
    pub rows: Vec<f64>,
    /// Days to expiration, descending
    pub cols: Vec<i64>,
    /// `values[[i, j]]` is the P&L at `(rows[i], cols[j])`
    pub values: Array2<f64>,
}

impl HeatmapGrid {
    /// (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Cell lookup by axis labels
    pub fn value_at(&self, price: f64, days: i64) -> Option<f64> {
        let i = self.rows.iter().position(|&p| p == price)?;
        let j = self.cols.iter().position(|&d| d == days)?;
        self.values.get([i, j]).copied()
    }

    /// Row-major nested vectors
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }
}

/// Wire shape expected by the front end: `{index, columns, values}`
impl Serialize for HeatmapGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Table<'a> {
            index: &'a [f64],
            columns: &'a [i64],
            values: Vec<Vec<f64>>,
        }

        Table {
            index: &self.rows,
            columns: &self.cols,
            values: self.to_rows(),
        }
        .serialize(serializer)
    }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage change of `theoretical` over `baseline`, one decimal place
pub fn pnl_percent(theoretical: f64, baseline: f64) -> f64 {
    round_tenths((theoretical - baseline) / baseline * 100.0)
}

/// Model price of `contract` with the underlying at `spot` and `time` years left.
///
/// An explicit range may start at zero; an underlying worth nothing leaves
/// a call worthless and a put worth the discounted strike.
fn cell_price(contract: &Contract, spot: f64, time: f64) -> HeatmapResult<f64> {
    if spot == 0.0 {
        return Ok(match contract.option_type {
            OptionType::Call => 0.0,
            OptionType::Put => contract.strike_price * (-contract.risk_free_rate * time).exp(),
        });
    }

    black_scholes::price(
        spot,
        contract.strike_price,
        time,
        contract.implied_volatility,
        contract.risk_free_rate,
        contract.option_type,
    )
}

/// Generate the P&L heatmap for `contract`.
///
/// Pass `range_min = range_max = 0` for the default price range around the
/// underlying; see [`build_axes`](super::axes::build_axes).
pub fn generate(contract: &Contract, range_min: f64, range_max: f64) -> HeatmapResult<HeatmapGrid> {
    let baseline = contract.last_traded_price;
    if baseline == 0.0 || !baseline.is_finite() {
        return Err(HeatmapError::invalid_argument(format!(
            "last traded price must be non-zero to compute P&L, got {}",
            baseline
        )));
    }

    let axes = build_axes(
        contract.time_to_expiry,
        contract.option_type,
        range_min,
        range_max,
        contract.underlying_price,
    )?;

    let mut values = Array2::<f64>::zeros((axes.row_prices.len(), axes.col_days.len()));
    for ((i, j), cell) in values.indexed_iter_mut() {
        let time = axes.col_days[j] as f64 / 365.0;
        let theoretical = cell_price(contract, axes.row_prices[i], time)?;
        *cell = pnl_percent(theoretical, baseline);
    }

    tracing::debug!(
        "Generated {}x{} {} heatmap for strike {}",
        axes.row_prices.len(),
        axes.col_days.len(),
        contract.option_type,
        contract.strike_price
    );

    Ok(HeatmapGrid {
        rows: axes.row_prices,
        cols: axes.col_days,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(option_type: OptionType) -> Contract {
        Contract {
            underlying_price: 100.0,
            strike_price: 100.0,
            time_to_expiry: 1.0,
            implied_volatility: 0.20,
            risk_free_rate: 0.05,
            option_type,
            last_traded_price: 10.4506,
        }
    }

    #[test]
    fn test_dimensions_match_axes() {
        let grid = generate(&contract(OptionType::Call), 0.0, 0.0).unwrap();
        let (n_rows, n_cols) = grid.dim();

        assert_eq!(n_rows, grid.rows.len());
        assert_eq!(n_cols, grid.cols.len());
        assert_eq!(n_rows, 30);
        assert!(grid.to_rows().iter().all(|r| r.len() == n_cols));
    }

    #[test]
    fn test_fair_price_cell_is_flat() {
        // Last price equals the model price at spot and full horizon
        let grid = generate(&contract(OptionType::Call), 0.0, 0.0).unwrap();
        let cell = grid.value_at(100.0, 365).unwrap();

        assert!(cell.abs() <= 0.1, "expected ~0% P&L, got {}", cell);
    }

    #[test]
    fn test_call_gains_with_price_and_loses_with_time() {
        let grid = generate(&contract(OptionType::Call), 0.0, 0.0).unwrap();

        // Higher rows are higher prices: P&L decreases down each column
        for j in 0..grid.cols.len() {
            let column = grid.values.column(j);
            assert!(column.iter().zip(column.iter().skip(1)).all(|(a, b)| a >= b));
        }

        // At the money, value decays toward expiry
        let i = grid.rows.iter().position(|&p| p == 100.0).unwrap();
        let row = grid.values.row(i);
        assert!(row[0] > row[row.len() - 1]);
    }

    #[test]
    fn test_expiry_column_is_near_intrinsic() {
        let c = contract(OptionType::Put);
        let short = Contract {
            time_to_expiry: 0.1,
            last_traded_price: 5.0,
            ..c
        };
        let grid = generate(&short, 80.0, 110.0).unwrap();

        let expiry = *grid.cols.last().unwrap();
        assert_eq!(expiry, 0);
        // Put at 80 is worth ~20 at expiry, +300% over a 5.00 baseline
        assert_eq!(grid.value_at(80.0, 0), Some(300.0));
        // Far out of the money put expires worthless
        assert_eq!(grid.value_at(109.0, 0), Some(-100.0));
    }

    #[test]
    fn test_range_from_zero_prices_bottom_row() {
        let call = generate(&contract(OptionType::Call), 0.0, 150.0).unwrap();
        assert_eq!(call.rows[29], 0.0);
        assert!(call.values.row(29).iter().all(|&v| v == -100.0));

        let put = Contract {
            last_traded_price: 5.5735,
            ..contract(OptionType::Put)
        };
        let grid = generate(&put, 0.0, 150.0).unwrap();
        assert!(grid.values.iter().all(|v| v.is_finite()));

        // Worthless underlying: put pays the discounted strike
        let full_horizon = grid.value_at(0.0, 365).unwrap();
        let expected = pnl_percent(100.0 * (-0.05_f64).exp(), 5.5735);
        assert_eq!(full_horizon, expected);
    }

    #[test]
    fn test_zero_baseline_rejected() {
        let c = Contract {
            last_traded_price: 0.0,
            ..contract(OptionType::Call)
        };
        assert!(matches!(generate(&c, 0.0, 0.0), Err(HeatmapError::InvalidArgument(_))));
    }

    #[test]
    fn test_zero_vol_propagates_domain_error() {
        let c = Contract {
            implied_volatility: 0.0,
            ..contract(OptionType::Call)
        };
        assert!(matches!(generate(&c, 0.0, 0.0), Err(HeatmapError::Domain(_))));
    }

    #[test]
    fn test_bad_range_propagates() {
        let result = generate(&contract(OptionType::Call), 120.0, 90.0);
        assert!(matches!(result, Err(HeatmapError::InvalidArgument(_))));
    }

    #[test]
    fn test_serializes_as_table() {
        let grid = generate(&contract(OptionType::Call), 90.0, 120.0).unwrap();
        let value = serde_json::to_value(&grid).unwrap();

        assert_eq!(value["index"].as_array().unwrap().len(), 30);
        assert_eq!(value["columns"][0], 365);
        assert_eq!(value["values"].as_array().unwrap().len(), 30);
        assert_eq!(value["values"][0].as_array().unwrap().len(), grid.cols.len());
    }

    #[test]
    fn test_pnl_percent_rounding() {
        assert_eq!(pnl_percent(12.0, 10.0), 20.0);
        assert_eq!(pnl_percent(10.04, 10.0), 0.4);
        assert_eq!(pnl_percent(0.0, 3.0), -100.0);
    }
}

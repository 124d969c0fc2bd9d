//! Property-based tests using proptest.
//!
//! These check pricing and grid invariants across random inputs rather than
//! fixed examples.

use option_heatmap::heatmap::ROW_COUNT;
use option_heatmap::prelude::*;
use proptest::prelude::*;

// --- Put-call parity ---

proptest! {
    /// C - P = S - K e^{-rt} for any valid inputs.
    #[test]
    fn put_call_parity_holds(
        spot in 1.0_f64..1000.0,
        moneyness in 0.5_f64..1.5,
        time in 0.0_f64..3.0,
        vol in 0.01_f64..2.0,
        rate in -0.02_f64..0.15,
    ) {
        let strike = spot * moneyness;
        let call = bs_price(spot, strike, time, vol, rate, OptionType::Call).unwrap();
        let put = bs_price(spot, strike, time, vol, rate, OptionType::Put).unwrap();
        let t = if time == 0.0 { option_heatmap::models::EXPIRY_EPSILON } else { time };
        let parity = spot - strike * (-rate * t).exp();

        prop_assert!(
            (call - put - parity).abs() < 1e-8 * spot.max(1.0),
            "parity gap {} for S={} K={} t={} vol={} r={}",
            call - put - parity, spot, strike, time, vol, rate
        );
    }
}

// --- Vol monotonicity ---

proptest! {
    /// Raising vol never lowers the price of a call or a put.
    #[test]
    fn price_non_decreasing_in_vol(
        spot in 10.0_f64..500.0,
        moneyness in 0.7_f64..1.3,
        time in 0.01_f64..2.0,
        vol in 0.05_f64..1.0,
        bump in 0.001_f64..0.5,
        rate in 0.0_f64..0.1,
    ) {
        let strike = spot * moneyness;
        for option_type in [OptionType::Call, OptionType::Put] {
            let low = bs_price(spot, strike, time, vol, rate, option_type).unwrap();
            let high = bs_price(spot, strike, time, vol + bump, rate, option_type).unwrap();
            prop_assert!(high >= low - 1e-9, "{:?}: {} < {}", option_type, high, low);
        }
    }
}

// --- Grid shape ---

proptest! {
    /// Grid dimensions always match the axis labels.
    #[test]
    fn grid_matches_axes(
        spot in 5.0_f64..800.0,
        moneyness in 0.8_f64..1.2,
        days in 0_i64..900,
        vol in 0.05_f64..1.5,
        last in 0.05_f64..50.0,
        is_put in any::<bool>(),
    ) {
        let contract = Contract {
            underlying_price: spot,
            strike_price: spot * moneyness,
            time_to_expiry: days as f64 / 365.0,
            implied_volatility: vol,
            risk_free_rate: 0.04,
            option_type: if is_put { OptionType::Put } else { OptionType::Call },
            last_traded_price: last,
        };

        let grid = generate(&contract, 0.0, 0.0).unwrap();
        let (n_rows, n_cols) = grid.dim();

        prop_assert_eq!(n_rows, grid.rows.len());
        prop_assert_eq!(n_cols, grid.cols.len());
        prop_assert_eq!(n_rows, ROW_COUNT);
        prop_assert_eq!(grid.cols[0], days);
        prop_assert!(grid.cols.windows(2).all(|w| w[0] > w[1]));
        prop_assert!(n_cols <= 75);
        prop_assert!(grid.values.iter().all(|v| v.is_finite()));
    }
}

// --- Explicit range ---

proptest! {
    /// Explicit ranges give 30 descending levels starting at range_min.
    #[test]
    fn explicit_range_rows(
        lo in 0.0_f64..500.0,
        width in 30.0_f64..500.0,
    ) {
        let axes = build_axes(0.25, OptionType::Call, lo, lo + width, 100.0).unwrap();
        let rows = &axes.row_prices;

        prop_assert_eq!(rows.len(), ROW_COUNT);
        prop_assert!((rows[ROW_COUNT - 1] - lo).abs() <= 0.005 + 1e-9);
        prop_assert!(rows.windows(2).all(|w| w[0] > w[1]));
    }
}

//! # Option Heatmap - Black-Scholes P&L Surfaces
//!
//! Computes how the value of a single listed option would change across a
//! range of underlying prices and days to expiration, expressed as percentage
//! profit/loss against the price it last traded at.
//!
//! ## Key Components
//!
//! - **Data Fetching**: Yahoo Finance option chains and the ^IRX T-bill yield
//! - **Contract Resolver**: chain record -> pricing inputs
//! - **Black-Scholes**: European call/put pricing
//! - **Heatmap**: price/day axes and the per-cell P&L grid
//! - **Server**: JSON API consumed by the web front end
//!
//! ## Usage
//!
//! ```rust,no_run
//! use option_heatmap::prelude::*;
//!
//! let yahoo = YahooClient::default();
//! let chain = yahoo.fetch_chain("AAPL").unwrap();
//! let expiry = &chain.expirations[0];
//! let strike = chain.strikes(expiry, OptionType::Call)[0];
//!
//! let contract = resolve_today(&chain.calls, expiry, strike, OptionType::Call, &yahoo).unwrap();
//! let grid = generate(&contract, 0.0, 0.0).unwrap();
//! println!("{} price levels x {} days", grid.rows.len(), grid.cols.len());
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Compute Greeks
//! - Model a volatility surface (one flat implied vol per grid)
//! - Handle American early exercise (European pricing only)
//! - Stream quotes or persist anything

pub mod config;
pub mod core;
pub mod data;
pub mod heatmap;
pub mod models;
pub mod server;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        Contract, ContractRecord, ExpiryMap, HeatmapError, HeatmapResult, OptionChain, OptionType,
    };

    // Data fetching
    pub use crate::data::{
        resolve, resolve_today, sanitize, ChainSource, FixedRate, MarketData, RateSource,
        YahooClient,
    };

    // Pricing
    pub use crate::heatmap::{build_axes, generate, AxisPair, HeatmapGrid};
    pub use crate::models::price as bs_price;

    pub use crate::config::AppConfig;
}

// Re-export main types at crate root
pub use crate::core::{HeatmapError, HeatmapResult};
pub use crate::heatmap::{generate, HeatmapGrid};

//! P&L heatmap generation
//!
//! - `axes`: price rows and day-to-expiry columns
//! - `grid`: per-cell Black-Scholes revaluation and P&L normalization

pub mod axes;
pub mod grid;

pub use axes::{build_axes, AxisPair, ROW_COUNT};
pub use grid::{generate, pnl_percent, HeatmapGrid};

//! Pricing models
//!
//! Implements:
//! - Black-Scholes (European call/put closed form)

pub mod black_scholes;

pub use black_scholes::{norm_cdf, price, EXPIRY_EPSILON};

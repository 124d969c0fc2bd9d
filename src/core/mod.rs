//! Core data types
//!
//! Defines fundamental types:
//! - Contract: resolved pricing inputs for one option
//! - OptionType: call/put tag
//! - ContractRecord / OptionChain: market data as fetched
//! - HeatmapError: crate-wide error

pub mod error;
pub mod option;
pub mod quote;

pub use error::*;
pub use option::*;
pub use quote::*;

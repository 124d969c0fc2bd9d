//! Market data
//!
//! Handles:
//! - Yahoo Finance API for option chains and the risk-free rate (free)
//! - Resolving a chain record into pricing inputs
//! - JSON sanitation of provider data before transport

pub mod resolver;
pub mod sanitize;
pub mod source;
pub mod yahoo;

pub use resolver::*;
pub use sanitize::*;
pub use source::*;
pub use yahoo::*;

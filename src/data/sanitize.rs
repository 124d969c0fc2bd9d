//! JSON sanitation for transport
//!
//! Provider data can carry NaN quotes (no bid, no change). JSON has no NaN,
//! so before a structure leaves the service every non-finite float leaf is
//! replaced with `null`, at any depth of maps and sequences.

use serde::Serialize;
use serde_json::Value;

use crate::core::HeatmapResult;

/// Convert any serializable value to JSON with non-finite floats as `null`
pub fn sanitize<T: Serialize + ?Sized>(value: &T) -> HeatmapResult<Value> {
    // serde_json::Value cannot hold NaN or infinities; its serializer maps them to Null
    Ok(serde_json::to_value(value)?)
}

/// Same, for a float leaf on its own
pub fn finite_or_none(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

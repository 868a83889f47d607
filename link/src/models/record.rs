//! Untyped resource rows.

use serde_json::{Map, Value};

/// A single resource row as returned by the server
///
/// The console drives every resource through the same schema-driven pipeline,
/// so rows stay as JSON objects instead of per-resource structs.
pub type Record = Map<String, Value>;

/// Extract a numeric id from a JSON value
///
/// Servers are inconsistent about id types; numbers and numeric strings both
/// resolve. Anything else is `None`.
pub fn json_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// The `id` column of a row, if present and numeric
pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(json_id)
}

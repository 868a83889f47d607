//! Schema-driven view engine.
//!
//! The moving parts behind every resource view: reference option
//! resolution, role/permission join aggregation, form state with
//! validation and payload building, and the list filter/stats pass.
//! Everything except the two fetch helpers is pure and tested without a
//! server.

use serde_json::Value;

pub mod form;
pub mod join;
pub mod list;
pub mod reference;

pub use form::{FieldValue, FormMode, FormState};
pub use join::{build_permission_map, load_permission_map, PermissionMap};
pub use list::{compute_stats, filter_rows, ViewStats};
pub use reference::{load_reference_options, RefOption, ReferenceOptions};

/// Truthiness of a JSON value: null, false, 0, and "" are falsy
pub(crate) fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain-text form of a JSON value; null renders empty
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Text form of a truthy value, used by label fallback chains
pub(crate) fn truthy_text(value: &Value) -> Option<String> {
    if json_truthy(value) {
        Some(value_text(value))
    } else {
        None
    }
}

//! Server validation error normalization.
//!
//! Error payloads differ wildly between endpoints: a plain string, a
//! `message`/`error`/`title` key, an `errors` array of strings or objects, a
//! field-to-messages map, or any of those nested under `details`/`data`.
//! This module folds every shape into one [`ValidationReport`] so the console
//! can show per-field errors next to form fields and everything else as a
//! general message.

use serde_json::Value;
use std::collections::BTreeMap;

/// Maximum nesting depth followed through `details`/`data` wrappers
const MAX_DEPTH: usize = 8;

/// Normalized validation outcome
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// General error message not tied to a single field
    pub message: Option<String>,

    /// Per-field messages, keyed by field key
    ///
    /// Only keys the caller listed as known fields land here; everything else
    /// folds into `message`.
    pub field_errors: BTreeMap<String, String>,
}

impl ValidationReport {
    /// True when the payload yielded neither a message nor field errors
    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.field_errors.is_empty()
    }
}

/// Normalize an arbitrary error payload against a set of known field keys
pub fn normalize_validation(payload: &Value, field_keys: &[&str]) -> ValidationReport {
    let mut report = ValidationReport::default();
    walk(payload, field_keys, 0, &mut report);
    report
}

fn walk(value: &Value, known: &[&str], depth: usize, report: &mut ValidationReport) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::String(text) => set_message(report, text),
        Value::Object(map) => read_object(map, known, depth, report),
        _ => {}
    }
}

fn read_object(
    map: &serde_json::Map<String, Value>,
    known: &[&str],
    depth: usize,
    report: &mut ValidationReport,
) {
    for key in ["message", "error", "title"] {
        if let Some(Value::String(text)) = map.get(key) {
            set_message(report, text);
        }
    }

    match map.get("errors") {
        Some(Value::Array(items)) => {
            for item in items {
                match item {
                    Value::String(text) => set_message(report, text),
                    Value::Object(entry) => {
                        let key = first_string(entry, &["field", "path", "param", "key"]);
                        let text =
                            first_string(entry, &["message", "msg", "error", "description"]);
                        add_error(report, known, key, text);
                    }
                    _ => {}
                }
            }
        }
        Some(Value::Object(entries)) => {
            for (key, value) in entries {
                let text = match value {
                    Value::String(text) => Some(text.as_str()),
                    Value::Array(items) => items.first().and_then(Value::as_str),
                    _ => None,
                };
                add_error(report, known, Some(key.as_str()), text);
            }
        }
        _ => {}
    }

    // Some backends wrap the real payload one level down
    for nested in ["details", "data"] {
        if let Some(value @ Value::Object(_)) = map.get(nested) {
            walk(value, known, depth + 1, report);
        }
    }
}

fn add_error(
    report: &mut ValidationReport,
    known: &[&str],
    key: Option<&str>,
    text: Option<&str>,
) {
    match key {
        Some(key) if !key.is_empty() && known.contains(&key) => {
            let text = text.filter(|t| !t.is_empty()).unwrap_or("Invalid value.");
            report.field_errors.insert(key.to_string(), text.to_string());
        }
        _ => {
            if let Some(text) = text {
                set_message(report, text);
            }
        }
    }
}

fn first_string<'a>(
    entry: &'a serde_json::Map<String, Value>,
    keys: &[&str],
) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
}

fn set_message(report: &mut ValidationReport, text: &str) {
    if report.message.is_none() && !text.is_empty() {
        report.message = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIELDS: &[&str] = &["email", "name", "status"];

    #[test]
    fn test_plain_string_payload() {
        let report = normalize_validation(&json!("Something broke"), FIELDS);
        assert_eq!(report.message.as_deref(), Some("Something broke"));
        assert!(report.field_errors.is_empty());
    }

    #[test]
    fn test_message_key_precedence() {
        let report = normalize_validation(
            &json!({"error": "from error", "message": "from message", "title": "from title"}),
            FIELDS,
        );
        // First non-empty of message, error, title wins
        assert_eq!(report.message.as_deref(), Some("from message"));

        let report = normalize_validation(&json!({"title": "from title"}), FIELDS);
        assert_eq!(report.message.as_deref(), Some("from title"));
    }

    #[test]
    fn test_errors_array_of_strings() {
        let report =
            normalize_validation(&json!({"errors": ["first problem", "second problem"]}), FIELDS);
        assert_eq!(report.message.as_deref(), Some("first problem"));
    }

    #[test]
    fn test_errors_array_of_objects() {
        let report = normalize_validation(
            &json!({"errors": [
                {"field": "email", "message": "Email is taken"},
                {"param": "name", "msg": "Too short"},
                {"path": "internal_code", "message": "Unknown field problem"}
            ]}),
            FIELDS,
        );
        assert_eq!(report.field_errors.get("email").map(String::as_str), Some("Email is taken"));
        assert_eq!(report.field_errors.get("name").map(String::as_str), Some("Too short"));
        // Keys outside the schema fold into the general message
        assert_eq!(report.message.as_deref(), Some("Unknown field problem"));
        assert!(!report.field_errors.contains_key("internal_code"));
    }

    #[test]
    fn test_errors_map_with_message_lists() {
        let report = normalize_validation(
            &json!({"errors": {"email": ["Must be unique", "ignored"], "status": "Bad status"}}),
            FIELDS,
        );
        assert_eq!(report.field_errors.get("email").map(String::as_str), Some("Must be unique"));
        assert_eq!(report.field_errors.get("status").map(String::as_str), Some("Bad status"));
    }

    #[test]
    fn test_known_field_without_text_gets_placeholder() {
        let report =
            normalize_validation(&json!({"errors": [{"field": "email"}]}), FIELDS);
        assert_eq!(report.field_errors.get("email").map(String::as_str), Some("Invalid value."));
    }

    #[test]
    fn test_nested_details_and_data() {
        let report = normalize_validation(
            &json!({"details": {"data": {"errors": [{"field": "name", "message": "Required"}]}}}),
            FIELDS,
        );
        assert_eq!(report.field_errors.get("name").map(String::as_str), Some("Required"));
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut payload = json!({"message": "deepest"});
        for _ in 0..20 {
            payload = json!({ "details": payload });
        }
        let report = normalize_validation(&payload, FIELDS);
        assert!(report.is_empty());
    }

    #[test]
    fn test_first_message_wins_across_shapes() {
        let report = normalize_validation(
            &json!({"message": "general", "errors": ["array message"]}),
            FIELDS,
        );
        assert_eq!(report.message.as_deref(), Some("general"));
    }

    #[test]
    fn test_non_object_payloads_are_ignored() {
        assert!(normalize_validation(&json!(null), FIELDS).is_empty());
        assert!(normalize_validation(&json!(42), FIELDS).is_empty());
        assert!(normalize_validation(&json!([1, 2]), FIELDS).is_empty());
        assert!(normalize_validation(&json!(""), FIELDS).is_empty());
    }
}

//! Form state for create and edit flows.
//!
//! A form is a snapshot of one record's editable values plus the current
//! per-field errors. Values are kept in entry form (text, or a flag for
//! booleans) and only coerced when the payload is built, mirroring what
//! the operator actually typed.

use crate::engine::{json_truthy, value_text};
use crate::schema::{FieldSpec, ResourceSpec};
use merx_link::normalize::ValidationReport;
use merx_link::Record;
use serde_json::Value;
use std::collections::HashMap;

/// Whether the form creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(i64),
}

/// One field's editable value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Empty means "not provided"; flags always carry a value
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(t) if t.is_empty())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(t) => Some(t),
            FieldValue::Flag(_) => None,
        }
    }
}

/// In-flight create/edit state for one resource
#[derive(Debug, Clone)]
pub struct FormState {
    resource: &'static ResourceSpec,
    mode: FormMode,
    values: HashMap<&'static str, FieldValue>,
    errors: HashMap<&'static str, String>,
}

impl FormState {
    /// Empty form for a new record; flags start unchecked
    pub fn create(resource: &'static ResourceSpec) -> Self {
        let values = resource
            .fields
            .iter()
            .map(|field| (field.key, initial_value(field)))
            .collect();
        Self {
            resource,
            mode: FormMode::Creating,
            values,
            errors: HashMap::new(),
        }
    }

    /// Form seeded from an existing record
    ///
    /// Booleans coerce to their truthiness, everything else to the text
    /// the prompt should start from; null and missing values seed empty.
    pub fn edit(resource: &'static ResourceSpec, id: i64, row: &Record) -> Self {
        let values = resource
            .fields
            .iter()
            .map(|field| (field.key, seeded_value(field, row.get(field.key))))
            .collect();
        Self {
            resource,
            mode: FormMode::Editing(id),
            values,
            errors: HashMap::new(),
        }
    }

    pub fn resource(&self) -> &'static ResourceSpec {
        self.resource
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Update one field and revalidate just that field
    pub fn set_value(&mut self, key: &str, value: FieldValue) {
        let Some(field) = self.resource.field(key) else {
            return;
        };

        if field.required && !field.kind.is_boolean() && value.is_empty() {
            self.errors
                .insert(field.key, format!("{} is required.", field.label));
        } else {
            self.errors.remove(field.key);
        }
        self.values.insert(field.key, value);
    }

    /// Revalidate every field; true when the form can be submitted
    pub fn validate(&mut self) -> bool {
        let mut errors = HashMap::new();
        for field in self.resource.fields {
            if !field.required || field.kind.is_boolean() {
                continue;
            }
            let empty = self.values.get(field.key).map(FieldValue::is_empty).unwrap_or(true);
            if empty {
                errors.insert(field.key, format!("{} is required.", field.label));
            }
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Current errors in field display order
    pub fn errors_in_order(&self) -> Vec<(&'static FieldSpec, &str)> {
        self.resource
            .fields
            .iter()
            .filter_map(|field| self.errors.get(field.key).map(|msg| (field, msg.as_str())))
            .collect()
    }

    /// Overwrite field errors with a normalized server report
    ///
    /// The report only carries keys that exist on this resource, so the
    /// lookup cannot miss. An empty report leaves client-side errors alone.
    pub fn apply_server_report(&mut self, report: &ValidationReport) {
        if report.field_errors.is_empty() {
            return;
        }
        let mut errors = HashMap::new();
        for (key, message) in &report.field_errors {
            if let Some(field) = self.resource.field(key) {
                errors.insert(field.key, message.clone());
            }
        }
        self.errors = errors;
    }

    /// Build the API payload from the current values
    ///
    /// Empty fields are omitted so the server can apply defaults. Numbers
    /// and reference ids become JSON numbers (unparseable input degrades
    /// to null), flags become booleans, everything else stays text.
    pub fn payload(&self) -> Record {
        let mut payload = Record::new();
        for field in self.resource.fields {
            let Some(value) = self.values.get(field.key) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let json = match value {
                FieldValue::Flag(flag) => Value::Bool(*flag),
                FieldValue::Text(text) if field.kind.is_numeric() => numeric_value(text),
                FieldValue::Text(text) => Value::String(text.clone()),
            };
            payload.insert(field.key.to_string(), json);
        }
        payload
    }
}

fn initial_value(field: &FieldSpec) -> FieldValue {
    if field.kind.is_boolean() {
        FieldValue::Flag(false)
    } else {
        FieldValue::Text(String::new())
    }
}

fn seeded_value(field: &FieldSpec, value: Option<&Value>) -> FieldValue {
    if field.kind.is_boolean() {
        FieldValue::Flag(value.map(json_truthy).unwrap_or(false))
    } else {
        match value {
            None | Some(Value::Null) => FieldValue::Text(String::new()),
            Some(v) => FieldValue::Text(value_text(v)),
        }
    }
}

fn numeric_value(text: &str) -> Value {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) => Value::from(f),
        Err(_) => Value::Null,
    }
}

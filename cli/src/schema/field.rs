//! Field definitions.
//!
//! A field's kind drives everything downstream: which prompt the form
//! shows, how values are coerced into API payloads, and how table cells
//! render. The set of kinds is closed; a reference field carries its
//! target resource instead of static options, so a field can never have
//! both.

/// Kind of a resource field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form text
    Text,
    /// Email address
    Email,
    /// Secret text, prompted without echo
    Password,
    /// Numeric value, sent to the server as a JSON number
    Number,
    /// Yes/no flag
    Boolean,
    /// One value out of a fixed set
    Select {
        /// Allowed values in display order
        options: &'static [&'static str],
    },
    /// Foreign key to another resource's record
    Reference {
        /// Key of the referenced resource
        resource: &'static str,
        /// Field on the referenced record used as its display label
        label_field: Option<&'static str>,
    },
    /// Timestamp, usually server-maintained
    DateTime,
}

impl FieldKind {
    pub fn is_boolean(&self) -> bool {
        matches!(self, FieldKind::Boolean)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FieldKind::Reference { .. })
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, FieldKind::Password)
    }

    /// True for kinds edited by picking from a list of string choices
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::Select { .. } | FieldKind::Reference { .. })
    }

    /// True for kinds whose payload value is a JSON number
    ///
    /// Reference values are foreign-key ids, so they count.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::Reference { .. })
    }

    /// Static options of a select field
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self {
            FieldKind::Select { options } => Some(options),
            _ => None,
        }
    }

    /// Key of the referenced resource, for reference fields
    pub fn reference_resource(&self) -> Option<&'static str> {
        match self {
            FieldKind::Reference { resource, .. } => Some(resource),
            _ => None,
        }
    }

    /// Preferred label field on the referenced record, for reference fields
    pub fn reference_label_field(&self) -> Option<&'static str> {
        match self {
            FieldKind::Reference { label_field, .. } => *label_field,
            _ => None,
        }
    }

    /// Short name used in prompts and the resource info view
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Select { .. } => "select",
            FieldKind::Reference { .. } => "reference",
            FieldKind::DateTime => "datetime",
        }
    }
}

/// A single field in a resource schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Property name on the entity record
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
    /// Kind, drives prompts and payload coercion
    pub kind: FieldKind,
    /// Must be non-empty on submit; never set on boolean fields
    pub required: bool,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }

    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub const fn email(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Email)
    }

    pub const fn password(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Password)
    }

    pub const fn number(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    pub const fn boolean(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Boolean)
    }

    pub const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(key, label, FieldKind::Select { options })
    }

    pub const fn reference(
        key: &'static str,
        label: &'static str,
        resource: &'static str,
        label_field: &'static str,
    ) -> Self {
        Self::new(
            key,
            label,
            FieldKind::Reference {
                resource,
                label_field: Some(label_field),
            },
        )
    }

    pub const fn datetime(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::DateTime)
    }

    /// Mark the field required
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(FieldKind::Boolean.is_boolean());
        assert!(!FieldKind::Text.is_boolean());

        let reference = FieldKind::Reference {
            resource: "merchants",
            label_field: Some("name"),
        };
        assert!(reference.is_reference());
        assert!(reference.is_choice());
        assert!(reference.is_numeric());
        assert_eq!(reference.reference_resource(), Some("merchants"));
        assert_eq!(reference.reference_label_field(), Some("name"));

        assert!(FieldKind::Number.is_numeric());
        assert!(!FieldKind::Text.is_numeric());
        assert!(FieldKind::Password.is_secret());
    }

    #[test]
    fn test_select_options() {
        let select = FieldKind::Select {
            options: &["active", "inactive"],
        };
        assert!(select.is_choice());
        assert!(!select.is_numeric());
        assert_eq!(select.options(), Some(&["active", "inactive"][..]));
        assert_eq!(FieldKind::Text.options(), None);
    }

    #[test]
    fn test_required_builder() {
        let field = FieldSpec::text("name", "Name").required();
        assert!(field.required);
        assert_eq!(field.key, "name");
        assert_eq!(field.label, "Name");
        assert_eq!(field.kind, FieldKind::Text);

        let optional = FieldSpec::datetime("last_login_at", "Last Login At");
        assert!(!optional.required);
        assert_eq!(optional.kind.type_name(), "datetime");
    }
}

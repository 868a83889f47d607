//! Resource definitions and permission gating.

use super::field::FieldSpec;
use merx_link::Realm;

/// The four gated action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// Permission key per action; an absent key always allows the action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionPermissions {
    pub read: Option<&'static str>,
    pub create: Option<&'static str>,
    pub update: Option<&'static str>,
    pub delete: Option<&'static str>,
}

impl ActionPermissions {
    /// Nothing gated
    pub const NONE: Self = Self {
        read: None,
        create: None,
        update: None,
        delete: None,
    };

    /// Permission key required for an action, if any
    pub const fn key(&self, action: Action) -> Option<&'static str> {
        match action {
            Action::Read => self.read,
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }
}

/// Junction view configuration, registered on role resources
///
/// Describes how to assemble the role's permission list from two other
/// collections: the junction records linking roles to permissions, and
/// the permission entities carrying the labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinSpec {
    /// Key of the junction resource
    pub link_resource: &'static str,
    /// Foreign-key field on the junction record naming the role
    pub role_key: &'static str,
    /// Foreign-key field on the junction record naming the permission
    pub permission_key: &'static str,
    /// Key of the resource holding the permission entities
    pub permission_resource: &'static str,
    /// Field on the permission entity used as its display label
    pub permission_label: &'static str,
}

/// One entity type served by a realm's API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Unique key, also the API collection path segment
    pub key: &'static str,
    /// Display name
    pub title: &'static str,
    /// Realm whose API serves this resource
    pub realm: Realm,
    /// Action gating; [`ActionPermissions::NONE`] leaves everything open
    pub permissions: ActionPermissions,
    /// Fields in display order
    pub fields: &'static [FieldSpec],
    /// Junction view configuration, only on role resources
    pub join: Option<JoinSpec>,
}

impl ResourceSpec {
    /// Field with the given key
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// True when the caller's granted permission keys allow the action
    pub fn allows(&self, action: Action, granted: &[String]) -> bool {
        match self.permissions.key(action) {
            None => true,
            Some(key) => granted.iter().any(|g| g == key),
        }
    }

    /// Field shown as a row's identity: `name`, else `email`, else the
    /// first field
    pub fn primary_field(&self) -> Option<&'static FieldSpec> {
        self.field("name")
            .or_else(|| self.field("email"))
            .or_else(|| self.fields.first())
    }

    /// The `status` field, when present; drives the stats histogram
    pub fn status_field(&self) -> Option<&'static FieldSpec> {
        self.field("status")
    }

    /// Reference fields in display order
    pub fn reference_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.kind.is_reference())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated_resource() -> ResourceSpec {
        ResourceSpec {
            key: "things",
            title: "Things",
            realm: Realm::Platform,
            permissions: ActionPermissions {
                read: None,
                create: Some("create-x"),
                update: None,
                delete: Some("delete-x"),
            },
            fields: const {
                &[
                    FieldSpec::text("name", "Name").required(),
                    FieldSpec::select("status", "Status", &["active", "inactive"]),
                ]
            },
            join: None,
        }
    }

    #[test]
    fn test_absent_key_always_allows() {
        let resource = gated_resource();
        let granted: Vec<String> = vec![];

        assert!(resource.allows(Action::Read, &granted));
        assert!(resource.allows(Action::Update, &granted));
        assert!(!resource.allows(Action::Create, &granted));
        assert!(!resource.allows(Action::Delete, &granted));
    }

    #[test]
    fn test_granted_key_allows() {
        let resource = gated_resource();
        let granted = vec!["delete-x".to_string()];

        assert!(resource.allows(Action::Delete, &granted));
        assert!(!resource.allows(Action::Create, &granted));
    }

    #[test]
    fn test_field_lookup() {
        let resource = gated_resource();
        assert!(resource.has_field("status"));
        assert!(!resource.has_field("id_card"));
        assert_eq!(resource.field("name").map(|f| f.label), Some("Name"));
    }

    #[test]
    fn test_primary_field_fallbacks() {
        let resource = gated_resource();
        assert_eq!(resource.primary_field().map(|f| f.key), Some("name"));

        let email_first = ResourceSpec {
            key: "contacts",
            title: "Contacts",
            realm: Realm::Platform,
            permissions: ActionPermissions::NONE,
            fields: const {
                &[
                    FieldSpec::text("note", "Note"),
                    FieldSpec::email("email", "Email"),
                ]
            },
            join: None,
        };
        assert_eq!(email_first.primary_field().map(|f| f.key), Some("email"));

        let no_identity = ResourceSpec {
            key: "links",
            title: "Links",
            realm: Realm::Platform,
            permissions: ActionPermissions::NONE,
            fields: const { &[FieldSpec::number("left_id", "Left")] },
            join: None,
        };
        assert_eq!(no_identity.primary_field().map(|f| f.key), Some("left_id"));
    }
}

//! The resource catalog.
//!
//! Platform resources first, then merchant resources; within each group
//! the order is display order, and the first allowed entry is the
//! session's default resource.

use super::field::FieldSpec;
use super::resource::{Action, ActionPermissions, JoinSpec, ResourceSpec};
use merx_link::Realm;

static CATALOG: &[ResourceSpec] = &[
    ResourceSpec {
        key: "platform-admins",
        title: "Platform Admins",
        realm: Realm::Platform,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::reference("platform_role_id", "Platform Role", "platform-roles", "name"),
            FieldSpec::text("first_name", "First Name").required(),
            FieldSpec::text("last_name", "Last Name").required(),
            FieldSpec::email("email", "Email").required(),
            FieldSpec::password("password", "Password").required(),
            FieldSpec::select("status", "Status", &["active", "inactive", "suspended"]),
            FieldSpec::datetime("last_login_at", "Last Login At"),
        ],
        join: None,
    },
    ResourceSpec {
        key: "platform-roles",
        title: "Platform Roles",
        realm: Realm::Platform,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::text("name", "Name").required(),
            FieldSpec::text("description", "Description"),
            FieldSpec::boolean("is_system", "System Role"),
        ],
        join: Some(JoinSpec {
            link_resource: "platform-role-permissions",
            role_key: "platform_role_id",
            permission_key: "platform_permission_id",
            permission_resource: "platform-permissions",
            permission_label: "key_name",
        }),
    },
    ResourceSpec {
        key: "platform-permissions",
        title: "Platform Permissions",
        realm: Realm::Platform,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::text("key_name", "Key").required(),
            FieldSpec::text("description", "Description"),
            FieldSpec::text("group_name", "Group"),
        ],
        join: None,
    },
    ResourceSpec {
        key: "platform-role-permissions",
        title: "Platform Role Permissions",
        realm: Realm::Platform,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::reference("platform_role_id", "Role", "platform-roles", "name").required(),
            FieldSpec::reference(
                "platform_permission_id",
                "Permission",
                "platform-permissions",
                "key_name",
            )
            .required(),
        ],
        join: None,
    },
    ResourceSpec {
        key: "merchants",
        title: "Merchants",
        realm: Realm::Merchant,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::text("merchant_code", "Code").required(),
            FieldSpec::text("name", "Name").required(),
            FieldSpec::text("legal_name", "Legal Name"),
            FieldSpec::email("email", "Email"),
            FieldSpec::text("phone", "Phone"),
            FieldSpec::text("country", "Country"),
            FieldSpec::text("city", "City"),
            FieldSpec::text("address", "Address"),
            FieldSpec::select("status", "Status", &["pending", "active", "suspended", "closed"]),
        ],
        join: None,
    },
    ResourceSpec {
        key: "branches",
        title: "Branches",
        realm: Realm::Merchant,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::reference("merchant_id", "Merchant", "merchants", "name").required(),
            FieldSpec::reference("parent_branch_id", "Parent Branch", "branches", "name"),
            FieldSpec::text("name", "Name").required(),
            FieldSpec::text("code", "Code").required(),
            FieldSpec::select(
                "type",
                "Type",
                &["hq", "office", "warehouse", "factory", "store", "department"],
            ),
            FieldSpec::boolean("is_main", "Main"),
            FieldSpec::select("status", "Status", &["active", "inactive"]),
        ],
        join: None,
    },
    ResourceSpec {
        key: "users",
        title: "Users",
        realm: Realm::Merchant,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::reference("merchant_id", "Merchant", "merchants", "name").required(),
            FieldSpec::reference("branch_id", "Branch", "branches", "name").required(),
            FieldSpec::reference("merchant_role_id", "Merchant Role", "branch-roles", "name"),
            FieldSpec::text("first_name", "First Name").required(),
            FieldSpec::text("last_name", "Last Name").required(),
            FieldSpec::email("email", "Email").required(),
            FieldSpec::text("phone", "Phone"),
            FieldSpec::password("password", "Password").required(),
            FieldSpec::select("status", "Status", &["active", "inactive", "blocked"]),
            FieldSpec::datetime("last_login_at", "Last Login At"),
        ],
        join: None,
    },
    ResourceSpec {
        key: "permissions",
        title: "Permissions",
        realm: Realm::Merchant,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::text("key_name", "Key").required(),
            FieldSpec::text("description", "Description"),
            FieldSpec::text("group_name", "Group"),
        ],
        join: None,
    },
    ResourceSpec {
        key: "branch-roles",
        title: "Branch Roles",
        realm: Realm::Merchant,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::reference("branch_id", "Branch", "branches", "name").required(),
            FieldSpec::text("name", "Name").required(),
            FieldSpec::text("description", "Description"),
            FieldSpec::boolean("is_system", "System Role"),
        ],
        join: Some(JoinSpec {
            link_resource: "branch-role-permissions",
            role_key: "branch_role_id",
            permission_key: "permission_id",
            permission_resource: "permissions",
            permission_label: "key_name",
        }),
    },
    ResourceSpec {
        key: "branch-role-permissions",
        title: "Branch Role Permissions",
        realm: Realm::Merchant,
        permissions: ActionPermissions::NONE,
        fields: &[
            FieldSpec::reference("branch_role_id", "Role", "branch-roles", "name").required(),
            FieldSpec::reference("permission_id", "Permission", "permissions", "key_name")
                .required(),
        ],
        join: None,
    },
];

/// All resources in catalog order
pub fn all() -> &'static [ResourceSpec] {
    CATALOG
}

/// Look up a resource by key, case-insensitive
pub fn find(key: &str) -> Option<&'static ResourceSpec> {
    let key = key.trim();
    CATALOG.iter().find(|r| r.key.eq_ignore_ascii_case(key))
}

/// Resources a session may open
///
/// Merchant sessions see the merchant catalog. Platform sessions see
/// every resource whose read permission is absent or granted, which
/// includes the merchant catalog since those entries carry no keys.
pub fn allowed_for(realm: Realm, granted: &[String]) -> Vec<&'static ResourceSpec> {
    CATALOG
        .iter()
        .filter(|r| match realm {
            Realm::Merchant => r.realm == Realm::Merchant,
            Realm::Platform => r.allows(Action::Read, granted),
        })
        .collect()
}

/// First allowed resource in catalog order
pub fn default_resource(realm: Realm, granted: &[String]) -> Option<&'static ResourceSpec> {
    allowed_for(realm, granted).into_iter().next()
}

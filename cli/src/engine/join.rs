//! Role/permission join aggregation.
//!
//! Role resources derive their permission lists from two collections: the
//! junction records linking roles to permissions, and the permission
//! entities carrying labels. Both are fetched in parallel and joined
//! client-side into a role-id keyed map.

use crate::engine::truthy_text;
use crate::schema::JoinSpec;
use merx_link::{json_id, record_id, MerxClient, Record};
use std::collections::HashMap;

/// Role id to resolved permission labels, in junction record order
pub type PermissionMap = HashMap<i64, Vec<String>>;

/// Fetch both collections and build the map
///
/// Any fetch failure degrades to an empty map; every role then reports
/// zero permissions until the next reload.
pub async fn load_permission_map(client: &MerxClient, join: &JoinSpec) -> PermissionMap {
    let (links, permissions) = tokio::join!(
        client.list(join.link_resource),
        client.list(join.permission_resource)
    );

    match (links, permissions) {
        (Ok(links), Ok(permissions)) => build_permission_map(&links, &permissions, join),
        _ => PermissionMap::new(),
    }
}

/// Join junction records against the permission collection
///
/// Junction records with a missing or zero role id are skipped, as are
/// records whose permission id is unreadable. A permission id with no
/// matching entity still contributes, labeled `#<id>`. Duplicate links
/// produce duplicate labels; the server owns uniqueness.
pub fn build_permission_map(
    links: &[Record],
    permissions: &[Record],
    join: &JoinSpec,
) -> PermissionMap {
    let mut index: HashMap<i64, String> = HashMap::new();
    for item in permissions {
        let Some(id) = record_id(item) else {
            continue;
        };
        let label = item
            .get(join.permission_label)
            .and_then(truthy_text)
            .or_else(|| item.get("name").and_then(truthy_text))
            .or_else(|| item.get("key_name").and_then(truthy_text))
            .unwrap_or_else(|| format!("#{}", id));
        index.insert(id, label);
    }

    let mut map = PermissionMap::new();
    for link in links {
        let role_id = match link.get(join.role_key).and_then(json_id) {
            Some(id) if id != 0 => id,
            _ => continue,
        };
        let Some(permission_id) = link.get(join.permission_key).and_then(json_id) else {
            continue;
        };
        let label = index
            .get(&permission_id)
            .cloned()
            .unwrap_or_else(|| format!("#{}", permission_id));
        map.entry(role_id).or_default().push(label);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn join_spec() -> JoinSpec {
        JoinSpec {
            link_resource: "branch-role-permissions",
            role_key: "branch_role_id",
            permission_key: "permission_id",
            permission_resource: "permissions",
            permission_label: "key_name",
        }
    }

    #[test]
    fn test_roles_accumulate_labels_in_link_order() {
        let links = records(json!([
            {"id": 1, "branch_role_id": 1, "permission_id": 10},
            {"id": 2, "branch_role_id": 1, "permission_id": 11},
            {"id": 3, "branch_role_id": 2, "permission_id": 10}
        ]));
        let permissions = records(json!([
            {"id": 10, "key_name": "read"},
            {"id": 11, "key_name": "write"}
        ]));

        let map = build_permission_map(&links, &permissions, &join_spec());
        assert_eq!(map.get(&1), Some(&vec!["read".to_string(), "write".to_string()]));
        assert_eq!(map.get(&2), Some(&vec!["read".to_string()]));
    }

    #[test]
    fn test_missing_role_id_is_skipped() {
        let links = records(json!([
            {"id": 1, "permission_id": 10},
            {"id": 2, "branch_role_id": 0, "permission_id": 10},
            {"id": 3, "branch_role_id": 4, "permission_id": 10}
        ]));
        let permissions = records(json!([{"id": 10, "key_name": "read"}]));

        let map = build_permission_map(&links, &permissions, &join_spec());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&4), Some(&vec!["read".to_string()]));
    }

    #[test]
    fn test_unknown_permission_keeps_placeholder_label() {
        let links = records(json!([
            {"id": 1, "branch_role_id": 1, "permission_id": 99}
        ]));

        let map = build_permission_map(&links, &[], &join_spec());
        assert_eq!(map.get(&1), Some(&vec!["#99".to_string()]));
    }

    #[test]
    fn test_label_falls_back_to_name_then_id() {
        let links = records(json!([
            {"id": 1, "branch_role_id": 1, "permission_id": 10},
            {"id": 2, "branch_role_id": 1, "permission_id": 11}
        ]));
        let permissions = records(json!([
            {"id": 10, "name": "Read things"},
            {"id": 11, "key_name": ""}
        ]));

        let map = build_permission_map(&links, &permissions, &join_spec());
        assert_eq!(
            map.get(&1),
            Some(&vec!["Read things".to_string(), "#11".to_string()])
        );
    }

    #[test]
    fn test_duplicate_links_are_kept() {
        let links = records(json!([
            {"id": 1, "branch_role_id": 1, "permission_id": 10},
            {"id": 2, "branch_role_id": 1, "permission_id": 10}
        ]));
        let permissions = records(json!([{"id": 10, "key_name": "read"}]));

        let map = build_permission_map(&links, &permissions, &join_spec());
        assert_eq!(map.get(&1).map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_string_ids_resolve() {
        let links = records(json!([
            {"id": 1, "branch_role_id": "2", "permission_id": "10"}
        ]));
        let permissions = records(json!([{"id": "10", "key_name": "read"}]));

        let map = build_permission_map(&links, &permissions, &join_spec());
        assert_eq!(map.get(&2), Some(&vec!["read".to_string()]));
    }
}

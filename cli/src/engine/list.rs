//! List filtering and aggregate stats.

use crate::engine::join::PermissionMap;
use crate::engine::{json_truthy, value_text};
use crate::schema::ResourceSpec;
use merx_link::{record_id, Record};
use serde_json::Value;

/// Aggregates shown above the table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewStats {
    pub total: usize,
    /// Highest id across all rows, 0 when the set is empty
    pub max_id: i64,
    /// Status histogram in first-seen order
    pub status_counts: Vec<(String, usize)>,
}

impl ViewStats {
    /// The first buckets of the histogram, capped for display
    pub fn pills(&self) -> &[(String, usize)] {
        let end = self.status_counts.len().min(3);
        &self.status_counts[..end]
    }
}

/// Filter rows against a free-text query
///
/// The query matches case-insensitively as a substring of any displayed
/// column: the id, every schema field, and the synthetic permission count
/// on join resources. An empty query keeps every row.
pub fn filter_rows<'a>(
    rows: &'a [Record],
    resource: &ResourceSpec,
    permission_map: &PermissionMap,
    query: &str,
) -> Vec<&'a Record> {
    if query.is_empty() {
        return rows.iter().collect();
    }
    let search = query.to_lowercase();

    rows.iter()
        .filter(|row| {
            if cell_text(row.get("id")).to_lowercase().contains(&search) {
                return true;
            }
            for field in resource.fields {
                if cell_text(row.get(field.key)).to_lowercase().contains(&search) {
                    return true;
                }
            }
            if resource.join.is_some() {
                let count = permission_count(row, permission_map);
                if count.to_string().contains(&search) {
                    return true;
                }
            }
            false
        })
        .collect()
}

/// Resolved permission count for a row of a join resource
pub fn permission_count(row: &Record, permission_map: &PermissionMap) -> usize {
    record_id(row)
        .and_then(|id| permission_map.get(&id))
        .map(Vec::len)
        .unwrap_or(0)
}

/// Compute stats over the full (unfiltered) row set
pub fn compute_stats(rows: &[Record], resource: &ResourceSpec) -> ViewStats {
    let total = rows.len();
    let max_id = rows.iter().filter_map(record_id).fold(0, i64::max);

    let mut status_counts: Vec<(String, usize)> = Vec::new();
    if let Some(status_field) = resource.status_field() {
        for row in rows {
            let value = row
                .get(status_field.key)
                .filter(|v| json_truthy(v))
                .map(value_text)
                .unwrap_or_else(|| "unknown".to_string());
            match status_counts.iter_mut().find(|(status, _)| *status == value) {
                Some((_, count)) => *count += 1,
                None => status_counts.push((value, 1)),
            }
        }
    }

    ViewStats {
        total,
        max_id,
        status_counts,
    }
}

fn cell_text(value: Option<&Value>) -> String {
    value.map(value_text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::registry;

    fn rows(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_query_keeps_all_rows() {
        let merchants = registry::find("merchants").unwrap();
        let data = rows(serde_json::json!([
            {"id": 1, "name": "Acme"},
            {"id": 2, "name": "Globex"}
        ]));

        let filtered = filter_rows(&data, merchants, &PermissionMap::new(), "");
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_filter_matches_any_column_case_insensitively() {
        let merchants = registry::find("merchants").unwrap();
        let data = rows(serde_json::json!([
            {"id": 1, "name": "Acme", "city": "Amman", "status": "active"},
            {"id": 2, "name": "Globex", "city": "Irbid", "status": "pending"},
            {"id": 31, "name": "Initech", "city": "Aqaba", "status": "active"}
        ]));
        let map = PermissionMap::new();

        let by_name = filter_rows(&data, merchants, &map, "GLOB");
        assert_eq!(by_name.len(), 1);
        assert_eq!(record_id(by_name[0]), Some(2));

        let by_status = filter_rows(&data, merchants, &map, "active");
        assert_eq!(by_status.len(), 2);

        let by_id = filter_rows(&data, merchants, &map, "31");
        assert_eq!(by_id.len(), 1);

        let nothing = filter_rows(&data, merchants, &map, "zzz");
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_filter_matches_permission_count() {
        let roles = registry::find("platform-roles").unwrap();
        let data = rows(serde_json::json!([
            {"id": 1, "name": "Admin"},
            {"id": 2, "name": "Viewer"}
        ]));
        let mut map = PermissionMap::new();
        map.insert(1, vec!["a".into(), "b".into(), "c".into()]);

        let filtered = filter_rows(&data, roles, &map, "3");
        assert_eq!(filtered.len(), 1);
        assert_eq!(record_id(filtered[0]), Some(1));

        // Roles with no entry count as zero
        let zero = filter_rows(&data, roles, &map, "0");
        assert_eq!(zero.len(), 1);
        assert_eq!(record_id(zero[0]), Some(2));
    }

    #[test]
    fn test_stats_totals_and_max_id() {
        let merchants = registry::find("merchants").unwrap();
        let data = rows(serde_json::json!([
            {"id": 1, "status": "active"},
            {"id": 5, "status": "active"},
            {"id": 3, "status": "pending"}
        ]));

        let stats = compute_stats(&data, merchants);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.max_id, 5);
        assert_eq!(
            stats.status_counts,
            vec![("active".to_string(), 2), ("pending".to_string(), 1)]
        );
    }

    #[test]
    fn test_stats_bucket_missing_status_as_unknown() {
        let merchants = registry::find("merchants").unwrap();
        let data = rows(serde_json::json!([
            {"id": 1},
            {"id": 2, "status": ""},
            {"id": 3, "status": "closed"}
        ]));

        let stats = compute_stats(&data, merchants);
        assert_eq!(
            stats.status_counts,
            vec![("unknown".to_string(), 2), ("closed".to_string(), 1)]
        );
    }

    #[test]
    fn test_stats_without_status_field() {
        let permissions = registry::find("platform-permissions").unwrap();
        let data = rows(serde_json::json!([{"id": 1, "key_name": "a"}]));

        let stats = compute_stats(&data, permissions);
        assert_eq!(stats.total, 1);
        assert!(stats.status_counts.is_empty());
    }

    #[test]
    fn test_empty_rows() {
        let merchants = registry::find("merchants").unwrap();
        let stats = compute_stats(&[], merchants);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.max_id, 0);
        assert!(stats.pills().is_empty());
    }

    #[test]
    fn test_pills_cap_at_three() {
        let users = registry::find("users").unwrap();
        let data = rows(serde_json::json!([
            {"id": 1, "status": "active"},
            {"id": 2, "status": "inactive"},
            {"id": 3, "status": "blocked"},
            {"id": 4, "status": "archived"}
        ]));

        let stats = compute_stats(&data, users);
        assert_eq!(stats.status_counts.len(), 4);
        assert_eq!(stats.pills().len(), 3);
        assert_eq!(stats.pills()[0].0, "active");
    }
}

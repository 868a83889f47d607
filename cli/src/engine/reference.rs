//! Reference option resolution.
//!
//! Every reference field needs the referenced collection to offer
//! selectable options. All collections for a resource are fetched in
//! parallel; any failure degrades the whole batch to empty option lists
//! rather than surfacing an error, so forms still work with ids typed by
//! hand.

use crate::engine::truthy_text;
use crate::schema::ResourceSpec;
use merx_link::{record_id, MerxClient, MerxLinkError, Record};
use std::collections::HashMap;
use tokio::task::JoinSet;

/// One selectable option for a reference field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefOption {
    /// Referenced record id, in the text form the operator enters
    pub value: String,
    /// Display label, `<resolved> (#<id>)`
    pub label: String,
}

/// Resolved options keyed by reference field key
pub type ReferenceOptions = HashMap<&'static str, Vec<RefOption>>;

/// Fetch selectable options for every reference field of a resource
pub async fn load_reference_options(
    client: &MerxClient,
    resource: &ResourceSpec,
) -> ReferenceOptions {
    let mut tasks: JoinSet<Result<(&'static str, Vec<RefOption>), MerxLinkError>> = JoinSet::new();

    for field in resource.reference_fields() {
        let Some(target) = field.kind.reference_resource() else {
            continue;
        };
        let label_field = field.kind.reference_label_field();
        let key = field.key;
        let client = client.clone();
        tasks.spawn(async move {
            let records = client.list(target).await?;
            Ok((key, build_options(&records, label_field)))
        });
    }

    let mut options = ReferenceOptions::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok((key, list))) => {
                options.insert(key, list);
            }
            // One failed fetch empties the whole batch; dropping the set
            // aborts the fetches still in flight
            _ => return ReferenceOptions::new(),
        }
    }
    options
}

/// Build options from a referenced collection, in server order
///
/// Records without a usable id are dropped; they cannot be selected as a
/// foreign key.
fn build_options(records: &[Record], label_field: Option<&'static str>) -> Vec<RefOption> {
    records
        .iter()
        .filter_map(|item| {
            let id = record_id(item)?;
            Some(RefOption {
                value: id.to_string(),
                label: format!("{} (#{})", option_label(item, id, label_field), id),
            })
        })
        .collect()
}

/// Display label of a referenced record: the configured label field, then
/// `name`, `email`, `key_name`, then the id
fn option_label(item: &Record, id: i64, label_field: Option<&str>) -> String {
    label_field
        .and_then(|key| item.get(key))
        .and_then(truthy_text)
        .or_else(|| item.get("name").and_then(truthy_text))
        .or_else(|| item.get("email").and_then(truthy_text))
        .or_else(|| item.get("key_name").and_then(truthy_text))
        .unwrap_or_else(|| format!("#{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_build_options_labels_and_values() {
        let records = vec![
            record(json!({"id": 3, "name": "Acme"})),
            record(json!({"id": 7, "name": ""})),
            record(json!({"id": 9})),
        ];

        let options = build_options(&records, Some("name"));
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].value, "3");
        assert_eq!(options[0].label, "Acme (#3)");
        // Empty label field falls through the chain down to the id
        assert_eq!(options[1].label, "#7 (#7)");
        assert_eq!(options[2].label, "#9 (#9)");
    }

    #[test]
    fn test_label_fallback_chain() {
        let item = record(json!({"id": 1, "email": "ops@merx.dev"}));
        assert_eq!(option_label(&item, 1, Some("name")), "ops@merx.dev");

        let item = record(json!({"id": 2, "key_name": "users.read"}));
        assert_eq!(option_label(&item, 2, None), "users.read");

        let item = record(json!({"id": 4, "label": "Main"}));
        assert_eq!(option_label(&item, 4, Some("label")), "Main");
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let records = vec![
            record(json!({"name": "ghost"})),
            record(json!({"id": "11", "name": "Branch"})),
        ];

        let options = build_options(&records, Some("name"));
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "11");
        assert_eq!(options[0].label, "Branch (#11)");
    }
}

//! Synonym grouping and catalog-order expansion.
//!
//! Several catalog entries can share a display name and source while being
//! distinct physical objects (e.g. two different "Spy" cards in Uprising).
//! Such a synonym group must never be collapsed into one counted line;
//! each member gets an ordinal instead.

use std::collections::{HashMap, HashSet};

use crate::models::ResourceRecord;

use super::models::ResourceRef;

/// Group sizes per `(name, source)` over one resource type's records.
pub fn group_sizes(records: &[ResourceRecord]) -> HashMap<(&str, &str), usize> {
    let mut sizes: HashMap<(&str, &str), usize> = HashMap::new();
    for record in records {
        *sizes
            .entry((record.name.as_str(), record.source.as_str()))
            .or_insert(0) += 1;
    }
    sizes
}

/// Expand the selected records of one resource type into blend references,
/// in catalog order.
///
/// Members of a synonym group (group size ≥ 2) are emitted once each with
/// ordinals `#1..#k`, ignoring copy counts; every other selected record is
/// repeated per `copies(record)`.
pub fn expand_selected(
    records: &[ResourceRecord],
    mut selected: impl FnMut(&ResourceRecord) -> bool,
    mut copies: impl FnMut(&ResourceRecord) -> usize,
) -> Vec<ResourceRef> {
    let sizes = group_sizes(records);
    let mut emitted_groups: HashSet<(&str, &str)> = HashSet::new();
    let mut out = Vec::new();

    for record in records {
        if !selected(record) {
            continue;
        }
        let key = (record.name.as_str(), record.source.as_str());
        let size = sizes.get(&key).copied().unwrap_or(1);
        if size >= 2 {
            if emitted_groups.insert(key) {
                for ordinal in 1..=size {
                    out.push(ResourceRef::with_ordinal(
                        &record.name,
                        &record.source,
                        ordinal as u32,
                    ));
                }
            }
        } else {
            let reference = ResourceRef::new(&record.name, &record.source);
            for _ in 0..copies(record) {
                out.push(reference.clone());
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str, source: &str, count: usize) -> ResourceRecord {
        ResourceRecord {
            name: name.to_string(),
            source: source.to_string(),
            resource_type: "intrigue".to_string(),
            attributes: json!({"count": count}).as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn synonym_groups_expand_to_ordinals_once() {
        let records = vec![
            record("Spy", "Uprising", 1),
            record("Ambush", "Uprising", 2),
            record("Spy", "Uprising", 1),
        ];
        let refs = expand_selected(&records, |r| r.source == "Uprising", ResourceRecord::copy_count);
        let keys: Vec<String> = refs.iter().map(ResourceRef::rendered_key).collect();
        assert_eq!(
            keys,
            [
                "Spy #1 (Uprising)",
                "Spy #2 (Uprising)",
                "Ambush (Uprising)",
                "Ambush (Uprising)",
            ]
        );
    }

    #[test]
    fn same_name_different_source_is_not_a_group() {
        let records = vec![record("Spy", "Uprising", 1), record("Spy", "Imperium", 1)];
        let refs = expand_selected(&records, |_| true, ResourceRecord::copy_count);
        assert!(refs.iter().all(|r| !r.is_synonym()));
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn selection_filters_before_expansion() {
        let records = vec![record("Spy", "Uprising", 1), record("Scout", "Imperium", 3)];
        let refs = expand_selected(&records, |r| r.source == "Imperium", ResourceRecord::copy_count);
        assert_eq!(refs.len(), 3);
        assert!(refs.iter().all(|r| r.name == "Scout"));
    }
}

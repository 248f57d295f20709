//! Shared domain models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the resource catalog: a card, tile, token, or other physical
/// component, tagged with the expansion it ships in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Display name (e.g. `Sandworm`). Stable within a catalog snapshot.
    pub name: String,
    /// Expansion/origin tag (e.g. `Imperium`, `Uprising`, `Rise of Ix`).
    pub source: String,
    /// Catalog category the record belongs to (e.g. `imperium`, `starter`).
    pub resource_type: String,
    /// Remaining catalog columns, passed through untyped.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, Value>,
}

impl ResourceRecord {
    /// Number of physical copies declared by the catalog.
    ///
    /// Resolves `count`, falling back to `count_per_player`. The catalog is
    /// spreadsheet-derived, so values arrive as integers, floats, or numeric
    /// strings; missing, zero, or unparseable counts fall back to one copy.
    pub fn copy_count(&self) -> usize {
        self.attributes
            .get("count")
            .and_then(scalar_to_count)
            .or_else(|| {
                self.attributes
                    .get("count_per_player")
                    .and_then(scalar_to_count)
            })
            .unwrap_or(1)
    }

    /// Card-set slug for this record's source, used by frontends for color
    /// coding. Stored in the catalog when present, derived otherwise.
    pub fn card_set(&self) -> String {
        self.attributes
            .get("card_set")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| set_slug(&self.source))
    }
}

fn scalar_to_count(value: &Value) -> Option<usize> {
    let parsed = match value {
        Value::Number(num) => num.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if parsed >= 1.0 {
        Some(parsed as usize)
    } else {
        None
    }
}

/// Map a source tag to its card-set slug (`Imperium` → `base`, etc.).
/// Unknown sources fall back to the lowercased tag.
pub fn set_slug(source: &str) -> String {
    match source {
        "Imperium" | "Base" => "base".to_string(),
        "Rise of Ix" | "Ix" => "ix".to_string(),
        "Immortality" => "immortality".to_string(),
        "Uprising" => "uprising".to_string(),
        "Bloodlines" => "bloodlines".to_string(),
        "Promo" => "promo".to_string(),
        other => other.to_lowercase(),
    }
}

/// Display name used as the section heading for a resource type
/// (`imperium` → `Imperium Cards`). Unknown types title-case their key.
pub fn bucket_display_name(resource_type: &str) -> String {
    match resource_type {
        "imperium" => "Imperium Cards".to_string(),
        "intrigue" => "Intrigue Cards".to_string(),
        "tleilax" => "Tleilax Cards".to_string(),
        "reserve" => "Reserve Cards".to_string(),
        "tech" => "Tech Tiles".to_string(),
        "contracts" => "Contracts".to_string(),
        "leader" => "Leaders".to_string(),
        "sardaukar" => "Sardaukar".to_string(),
        "starter" => "Starter Cards".to_string(),
        "conflict" => "Conflict Cards".to_string(),
        other => title_case(other),
    }
}

fn title_case(input: &str) -> String {
    input
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with(attrs: Value) -> ResourceRecord {
        ResourceRecord {
            name: "Sandworm".to_string(),
            source: "Uprising".to_string(),
            resource_type: "imperium".to_string(),
            attributes: attrs.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn copy_count_tolerates_spreadsheet_scalars() {
        let cases = [
            (json!({"count": 3}), 3),
            (json!({"count": 2.0}), 2),
            (json!({"count": "4"}), 4),
            (json!({"count_per_player": 5}), 5),
            (json!({"count": 0}), 1),
            (json!({"count": "junk"}), 1),
            (json!({}), 1),
        ];
        for (attrs, expected) in cases {
            let record = record_with(attrs.clone());
            assert_eq!(record.copy_count(), expected, "attrs: {attrs}");
        }
    }

    #[test]
    fn count_wins_over_count_per_player() {
        let record = record_with(json!({"count": 2, "count_per_player": 9}));
        assert_eq!(record.copy_count(), 2);
    }

    #[test]
    fn card_set_derives_when_absent() {
        let record = record_with(json!({}));
        assert_eq!(record.card_set(), "uprising");
        let tagged = record_with(json!({"card_set": "promo"}));
        assert_eq!(tagged.card_set(), "promo");
    }

    #[test]
    fn slugs_cover_known_sources() {
        assert_eq!(set_slug("Imperium"), "base");
        assert_eq!(set_slug("Rise of Ix"), "ix");
        assert_eq!(set_slug("Uprising"), "uprising");
        assert_eq!(set_slug("Choam"), "choam");
    }

    #[test]
    fn display_names_cover_known_types() {
        assert_eq!(bucket_display_name("imperium"), "Imperium Cards");
        assert_eq!(bucket_display_name("tech"), "Tech Tiles");
        assert_eq!(bucket_display_name("spice_deck"), "Spice Deck");
    }
}

//! Blend → document serialization.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::catalog::ResourceCatalog;

use super::models::{Blend, ResourceRef};
use super::rules::starter_cards;

/// Name written into the generator footer of every blend document.
pub const GENERATOR_NAME: &str = "Dune Imperium Blend Builder";

/// Display name of the starter-card bucket the encoder auto-populates.
pub const STARTER_BUCKET: &str = "Starter Cards";

/// Render a blend as its on-disk document.
///
/// Always produces a valid document; an empty blend yields a heading, the
/// board section, a zero total, and the footer. The starter bucket is
/// derived from the catalog for the blend's main board unless the blend
/// already supplies one.
pub fn encode(blend: &Blend, catalog: &ResourceCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", blend.name);

    if let Some(overview) = blend.overview.as_ref().filter(|fields| !fields.is_empty()) {
        out.push_str("## Overview\n\n");
        for (heading, text) in [
            ("Description", &overview.description),
            ("Leader Selection", &overview.leader_selection),
            ("House Rules", &overview.house_rules),
        ] {
            if !text.is_empty() {
                let _ = writeln!(out, "### {heading}\n\n{text}\n");
            }
        }
    }

    out.push_str("## Board\n\n");
    let _ = writeln!(out, "- Main Board: {}", blend.board.main_board);
    if !blend.board.additional_boards.is_empty() {
        let _ = writeln!(
            out,
            "- Additional Boards: {}",
            blend.board.additional_boards.join(", ")
        );
    }
    out.push('\n');

    let sections = collect_sections(blend, catalog);

    let total: usize = sections.iter().map(|(_, items)| items.len()).sum();
    let _ = writeln!(out, "**Total Items:** {total}\n");

    for (bucket, items) in &sections {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "## {bucket}\n");
        for line in bucket_lines(items) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("---\n");
    let _ = writeln!(out, "*Generated by {GENERATOR_NAME}*");
    out
}

/// Bucket sections in emission order, substituting derived starter cards
/// when the blend does not bring its own.
fn collect_sections<'a>(
    blend: &'a Blend,
    catalog: &ResourceCatalog,
) -> Vec<(&'a str, Vec<ResourceRef>)> {
    let has_starters = blend
        .buckets
        .get(STARTER_BUCKET)
        .map(|items| !items.is_empty())
        .unwrap_or(false);
    let derived = if has_starters {
        Vec::new()
    } else {
        starter_cards(catalog, blend.board.main_board.starter_source())
    };

    let mut sections: Vec<(&str, Vec<ResourceRef>)> = Vec::new();
    let mut derived_placed = derived.is_empty();
    for (bucket, items) in &blend.buckets {
        if bucket == STARTER_BUCKET && items.is_empty() && !derived_placed {
            sections.push((bucket.as_str(), derived.clone()));
            derived_placed = true;
            continue;
        }
        sections.push((bucket.as_str(), items.clone()));
    }
    if !derived_placed {
        sections.push((STARTER_BUCKET, derived));
    }
    sections
}

/// Item lines of one bucket: regular references counted by rendered key and
/// sorted, followed by synonym references, never merged across ordinals.
fn bucket_lines(items: &[ResourceRef]) -> Vec<String> {
    let mut regular: BTreeMap<String, usize> = BTreeMap::new();
    let mut synonyms: BTreeMap<String, usize> = BTreeMap::new();
    for item in items {
        let counts = if item.is_synonym() {
            &mut synonyms
        } else {
            &mut regular
        };
        *counts.entry(item.rendered_key()).or_insert(0) += 1;
    }

    regular
        .iter()
        .chain(synonyms.iter())
        .map(|(key, count)| {
            if *count == 1 {
                format!("- {key}")
            } else {
                format!("- {count}× {key}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::models::{MainBoard, Overview};

    fn empty_catalog() -> ResourceCatalog {
        ResourceCatalog::default()
    }

    #[test]
    fn empty_blend_yields_minimal_document() {
        let blend = Blend::new("Fresh Pool");
        let text = encode(&blend, &empty_catalog());
        assert!(text.starts_with("# Fresh Pool\n"));
        assert!(text.contains("## Board\n\n- Main Board: imperium\n"));
        assert!(text.contains("**Total Items:** 0\n"));
        assert!(text.ends_with("---\n*Generated by Dune Imperium Blend Builder*\n"));
        assert!(!text.contains("## Starter Cards"));
    }

    #[test]
    fn items_are_counted_sorted_and_attributed() {
        let mut blend = Blend::new("Counting");
        for _ in 0..3 {
            blend.push("Reserve Cards", ResourceRef::new("The Spice Must Flow", "Imperium"));
        }
        blend.push("Reserve Cards", ResourceRef::new("Arrakis Liaison", "Imperium"));
        let text = encode(&blend, &empty_catalog());

        let section = text
            .split("## Reserve Cards\n\n")
            .nth(1)
            .expect("reserve section");
        let lines: Vec<&str> = section.lines().take_while(|line| !line.is_empty()).collect();
        assert_eq!(
            lines,
            [
                "- Arrakis Liaison (Imperium)",
                "- 3× The Spice Must Flow (Imperium)",
            ]
        );
        assert!(text.contains("**Total Items:** 4\n"));
    }

    #[test]
    fn synonyms_stay_split_per_ordinal() {
        let mut blend = Blend::new("Synonyms");
        blend.push("Intrigue Cards", ResourceRef::with_ordinal("Spy", "Uprising", 2));
        blend.push("Intrigue Cards", ResourceRef::with_ordinal("Spy", "Uprising", 1));
        blend.push("Intrigue Cards", ResourceRef::new("Ambush", "Uprising"));
        let text = encode(&blend, &empty_catalog());

        let section = text
            .split("## Intrigue Cards\n\n")
            .nth(1)
            .expect("intrigue section");
        let lines: Vec<&str> = section.lines().take_while(|line| !line.is_empty()).collect();
        assert_eq!(
            lines,
            [
                "- Ambush (Uprising)",
                "- Spy #1 (Uprising)",
                "- Spy #2 (Uprising)",
            ]
        );
        assert!(!text.contains("2× Spy"));
    }

    #[test]
    fn overview_sections_emit_in_fixed_order() {
        let mut blend = Blend::new("Documented");
        blend.overview = Some(Overview {
            description: "https://example.com/thread".to_string(),
            leader_selection: "Deal four leaders to each player.".to_string(),
            house_rules: String::new(),
        });
        let text = encode(&blend, &empty_catalog());

        let overview_at = text.find("## Overview").expect("overview");
        let description_at = text.find("### Description").expect("description");
        let leaders_at = text.find("### Leader Selection").expect("leader selection");
        assert!(overview_at < description_at && description_at < leaders_at);
        assert!(!text.contains("### House Rules"));
        assert!(overview_at < text.find("## Board").expect("board"));
    }

    #[test]
    fn additional_boards_join_with_commas() {
        let mut blend = Blend::new("Boards");
        blend.board.main_board = MainBoard::Uprising;
        blend.board.additional_boards = vec!["ix".to_string(), "immortality".to_string()];
        let text = encode(&blend, &empty_catalog());
        assert!(text.contains("- Main Board: uprising\n"));
        assert!(text.contains("- Additional Boards: ix, immortality\n"));
    }
}

//! Document → blend parsing.
//!
//! The decoder is deliberately lenient: it folds over lines carrying a
//! current-section state, extracts what it recognises, and skips everything
//! else. No input ever makes it fail.

use super::models::{BoardConfig, MainBoard, Overview, ParsedBlend};

enum Section {
    /// Before the first level-2 heading.
    Preamble,
    /// Inside `## Overview`, tracking the active level-3 subsection.
    Overview(Option<OverviewField>),
    /// Inside `## Board`.
    Board,
    /// Inside a resource-type section, keyed by its heading.
    Bucket(String),
}

#[derive(Clone, Copy)]
enum OverviewField {
    Description,
    LeaderSelection,
    HouseRules,
}

/// Parse a blend document into its sections.
///
/// Board and Overview sections become structured fields; every other
/// level-2 heading opens a bucket whose item lines are expanded per their
/// count markers. Unrecognised lines are skipped, never an error.
pub fn decode(text: &str) -> ParsedBlend {
    let mut parsed = ParsedBlend::default();
    let mut section = Section::Preamble;

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if let Some(heading) = line.strip_prefix("## ") {
            let heading = heading.trim();
            section = match heading {
                "Board" => {
                    parsed.board.get_or_insert_with(BoardConfig::default);
                    Section::Board
                }
                "Overview" => {
                    parsed.overview.get_or_insert_with(Overview::default);
                    Section::Overview(None)
                }
                other => {
                    parsed.buckets.entry(other.to_string()).or_default();
                    Section::Bucket(other.to_string())
                }
            };
            continue;
        }

        match &mut section {
            Section::Preamble => {
                if parsed.name.is_none() {
                    if let Some(name) = line.strip_prefix("# ") {
                        parsed.name = Some(name.trim().to_string());
                    }
                }
            }
            Section::Overview(field) => {
                if let Some(subheading) = line.strip_prefix("### ") {
                    *field = overview_field(subheading.trim());
                } else if !line.is_empty() && !line.starts_with('#') {
                    if let (Some(field), Some(overview)) = (*field, parsed.overview.as_mut()) {
                        append_prose(overview_slot(overview, field), line);
                    }
                }
            }
            Section::Board => {
                let Some(board) = parsed.board.as_mut() else {
                    continue;
                };
                let Some(entry) = line.strip_prefix("- ") else {
                    continue;
                };
                let entry = entry.trim();
                if let Some(value) = entry.strip_prefix("Main Board:") {
                    board.main_board = MainBoard::from(value.trim());
                } else if let Some(value) = entry.strip_prefix("Additional Boards:") {
                    board.additional_boards = value
                        .split(',')
                        .map(str::trim)
                        .filter(|board| !board.is_empty())
                        .map(str::to_string)
                        .collect();
                }
            }
            Section::Bucket(bucket) => {
                if line.is_empty() || line.starts_with("**") || line.starts_with("*Generated") {
                    continue;
                }
                let item = line.trim_start_matches(['-', ' ']);
                if item.is_empty() || item.starts_with('#') {
                    continue;
                }
                if let Some(items) = parsed.buckets.get_mut(bucket.as_str()) {
                    parse_item_line(item, items);
                }
            }
        }
    }

    parsed
}

fn overview_field(subheading: &str) -> Option<OverviewField> {
    match subheading {
        "Description" => Some(OverviewField::Description),
        "Leader Selection" => Some(OverviewField::LeaderSelection),
        "House Rules" => Some(OverviewField::HouseRules),
        _ => None,
    }
}

fn overview_slot<'a>(overview: &'a mut Overview, field: OverviewField) -> &'a mut String {
    match field {
        OverviewField::Description => &mut overview.description,
        OverviewField::LeaderSelection => &mut overview.leader_selection,
        OverviewField::HouseRules => &mut overview.house_rules,
    }
}

fn append_prose(slot: &mut String, line: &str) {
    if !slot.is_empty() {
        slot.push('\n');
    }
    slot.push_str(line);
}

/// Expand one item line into the bucket, in documented precedence order:
/// `<n>× name` repeats, `×` with a non-numeric prefix is a literal name,
/// `<n> name` is the legacy count form (a digit-led line whose first token
/// is not a pure integer is dropped), anything else is a single item.
fn parse_item_line(item: &str, items: &mut Vec<String>) {
    if let Some((prefix, rest)) = item.split_once('×') {
        let prefix = prefix.trim();
        if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(count) = prefix.parse::<usize>() {
                let name = rest.trim();
                for _ in 0..count {
                    items.push(name.to_string());
                }
                return;
            }
        }
        items.push(item.to_string());
        return;
    }

    let digit_led = item.chars().next().is_some_and(|c| c.is_ascii_digit());
    if digit_led && item.contains(' ') {
        if let Some((first, rest)) = item.split_once(' ') {
            if first.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(count) = first.parse::<usize>() {
                    let name = rest.trim();
                    for _ in 0..count {
                        items.push(name.to_string());
                    }
                }
            }
        }
        return;
    }

    items.push(item.to_string());
}

//! Blend data model and the parsed form of a blend document.

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Main board a blend is played on. `imperium` and `uprising` are the known
/// boards; anything else round-trips verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MainBoard {
    /// The original Dune: Imperium board.
    Imperium,
    /// The Dune: Imperium Uprising board.
    Uprising,
    /// Any other board identifier, kept as written.
    Other(String),
}

impl MainBoard {
    /// Identifier as written in blend files.
    pub fn as_str(&self) -> &str {
        match self {
            MainBoard::Imperium => "imperium",
            MainBoard::Uprising => "uprising",
            MainBoard::Other(value) => value,
        }
    }

    /// Source whose starter cards belong with this board. Everything that is
    /// not the original board plays with Uprising starters.
    pub fn starter_source(&self) -> &'static str {
        match self {
            MainBoard::Imperium => "Imperium",
            _ => "Uprising",
        }
    }
}

impl Default for MainBoard {
    fn default() -> Self {
        MainBoard::Imperium
    }
}

impl fmt::Display for MainBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MainBoard {
    fn from(value: &str) -> Self {
        match value.trim() {
            "imperium" => MainBoard::Imperium,
            "uprising" => MainBoard::Uprising,
            other => MainBoard::Other(other.to_string()),
        }
    }
}

impl From<String> for MainBoard {
    fn from(value: String) -> Self {
        MainBoard::from(value.as_str())
    }
}

impl From<MainBoard> for String {
    fn from(value: MainBoard) -> Self {
        value.as_str().to_string()
    }
}

/// Board selection for a blend: the main board plus optional add-on boards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Main board identifier.
    pub main_board: MainBoard,
    /// Add-on boards (e.g. `ix`, `immortality`), in listed order.
    #[serde(default)]
    pub additional_boards: Vec<String>,
}

/// Prose fields of a blend's Overview section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// Free-form description, often a link to the blend's discussion thread.
    #[serde(default)]
    pub description: String,
    /// How players pick leaders for this blend.
    #[serde(default)]
    pub leader_selection: String,
    /// Any house rules in effect.
    #[serde(default)]
    pub house_rules: String,
}

impl Overview {
    /// True when no field carries text.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.leader_selection.is_empty()
            && self.house_rules.is_empty()
    }
}

static RENDERED_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+?)(?:\s+#(?P<ordinal>\d+))?\s+\((?P<source>[^()]+)\)$")
        .expect("failed to compile rendered key regex")
});

/// Reference to one resource inside a blend bucket.
///
/// Most references are a plain name+source pair. Members of a synonym group
/// (several catalog entries sharing name and source) additionally carry the
/// ordinal that keeps them apart on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource display name.
    pub name: String,
    /// Expansion/origin tag.
    pub source: String,
    /// Synonym ordinal (`#1`, `#2`, …), absent for ordinary references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
}

impl ResourceRef {
    /// Plain reference without an ordinal.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ordinal: None,
        }
    }

    /// Synonym-group member with its disambiguating ordinal.
    pub fn with_ordinal(name: impl Into<String>, source: impl Into<String>, ordinal: u32) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            ordinal: Some(ordinal),
        }
    }

    /// True for synonym-group members.
    pub fn is_synonym(&self) -> bool {
        self.ordinal.is_some()
    }

    /// Key as rendered in blend files: `name (source)` or
    /// `name #k (source)`.
    pub fn rendered_key(&self) -> String {
        match self.ordinal {
            Some(ordinal) => format!("{} #{} ({})", self.name, ordinal, self.source),
            None => format!("{} ({})", self.name, self.source),
        }
    }

    /// Parse a rendered key back into its parts. Returns `None` when the
    /// text does not end in a `(source)` suffix.
    pub fn parse(key: &str) -> Option<Self> {
        let caps = RENDERED_KEY_RE.captures(key.trim())?;
        let ordinal = caps
            .name("ordinal")
            .and_then(|m| m.as_str().parse::<u32>().ok());
        Some(Self {
            name: caps.name("name")?.as_str().to_string(),
            source: caps.name("source")?.as_str().to_string(),
            ordinal,
        })
    }
}

/// A named card-pool selection: board configuration, optional overview
/// prose, and per-resource-type buckets of references.
///
/// Buckets are keyed by display name (`Imperium Cards`, `Leaders`, …) and
/// keep insertion order. Board configuration lives outside the buckets, so
/// bucket totals never count it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blend {
    /// Blend display name.
    pub name: String,
    /// Board selection.
    #[serde(default)]
    pub board: BoardConfig,
    /// Overview prose, omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    /// Resource buckets in section order.
    #[serde(default)]
    pub buckets: IndexMap<String, Vec<ResourceRef>>,
}

impl Blend {
    /// Empty blend with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Mutable access to a bucket, creating it when missing.
    pub fn bucket_mut(&mut self, bucket: impl Into<String>) -> &mut Vec<ResourceRef> {
        self.buckets.entry(bucket.into()).or_default()
    }

    /// Append one reference to a bucket.
    pub fn push(&mut self, bucket: impl Into<String>, item: ResourceRef) {
        self.bucket_mut(bucket).push(item);
    }

    /// Total number of items across all buckets.
    pub fn total_items(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Decoded form of a blend document.
///
/// Bucket items are the raw name strings from the file; resolving them back
/// into catalog records (via [`ResourceRef::parse`]) is the caller's
/// concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedBlend {
    /// Blend name from the level-1 heading, when present.
    pub name: Option<String>,
    /// Overview prose, present when the document had an Overview section.
    pub overview: Option<Overview>,
    /// Board configuration, present when the document had a Board section.
    pub board: Option<BoardConfig>,
    /// Bucket name → item names, expanded per their count markers, in
    /// section order.
    pub buckets: IndexMap<String, Vec<String>>,
}

impl ParsedBlend {
    /// Items of one bucket, empty for unknown buckets.
    pub fn bucket(&self, name: &str) -> &[String] {
        self.buckets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of items across all buckets.
    pub fn total_items(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

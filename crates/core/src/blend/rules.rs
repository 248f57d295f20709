//! Declarative, catalog-driven blend construction.
//!
//! Canned blends ("all Uprising conflicts plus these named leaders") are
//! data, not code: a rule set lists which records each bucket takes and how
//! copies multiply, and one evaluation routine folds it over the catalog.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::ResourceCatalog,
    models::{bucket_display_name, ResourceRecord},
};

use super::models::{Blend, BoardConfig, MainBoard, Overview, ResourceRef};
use super::synonym::expand_selected;

/// Which records of a resource type a rule selects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Every record whose source matches.
    BySource {
        /// Source tag to match exactly.
        source: String,
    },
    /// Records whose name is in an explicit list.
    ByName {
        /// Names to include, matched exactly.
        names: Vec<String>,
    },
}

impl Selector {
    fn matches(&self, record: &ResourceRecord) -> bool {
        match self {
            Selector::BySource { source } => record.source == *source,
            Selector::ByName { names } => names.iter().any(|name| *name == record.name),
        }
    }
}

/// How many copies a selected record contributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyMode {
    /// Repeat per the record's catalog-declared copy count.
    #[default]
    CatalogCount,
    /// One copy regardless of the catalog count (e.g. leader picks).
    Single,
}

/// One bucket-filling rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendRule {
    /// Catalog resource type the rule draws from.
    pub resource_type: String,
    /// Record selection.
    pub selector: Selector,
    /// Copy multiplication.
    #[serde(default)]
    pub copy_mode: CopyMode,
}

/// A named, buildable blend description: board, optional overview prose,
/// and the rules that fill its buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Blend name the rules produce.
    pub name: String,
    /// Board configuration of the produced blend.
    #[serde(default)]
    pub board: BoardConfig,
    /// Overview prose of the produced blend.
    #[serde(default)]
    pub overview: Option<Overview>,
    /// Bucket-filling rules, applied in order.
    pub rules: Vec<BlendRule>,
}

impl RuleSet {
    /// Rule set reproducing a base-game pool: every record of the board's
    /// matching source across the card-selection types. Physical components
    /// that ship with the game regardless (`sardaukar`, `tech`,
    /// `contracts`) are left out.
    pub fn base_game(board: MainBoard) -> Self {
        let source = board.starter_source().to_string();
        let description = match board {
            MainBoard::Imperium => "Dune: Imperium base game".to_string(),
            _ => "Dune: Imperium - Uprising base game".to_string(),
        };
        let rules = [
            "imperium", "intrigue", "tleilax", "reserve", "leader", "starter", "conflict",
        ]
        .into_iter()
        .map(|resource_type| BlendRule {
            resource_type: resource_type.to_string(),
            selector: Selector::BySource {
                source: source.clone(),
            },
            copy_mode: CopyMode::CatalogCount,
        })
        .collect();

        Self {
            name: format!("Base {source}"),
            board: BoardConfig {
                main_board: board,
                additional_boards: Vec::new(),
            },
            overview: Some(Overview {
                description,
                ..Overview::default()
            }),
            rules,
        }
    }

    /// Evaluate the rules against a catalog, producing the blend.
    ///
    /// Rules apply in catalog order with synonym expansion: group members
    /// come out once each with ordinals, everything else repeats per the
    /// rule's copy mode. Rules that select nothing leave no bucket behind.
    pub fn build(&self, catalog: &ResourceCatalog) -> Blend {
        let mut blend = Blend::new(&self.name);
        blend.board = self.board.clone();
        blend.overview = self.overview.clone();

        for rule in &self.rules {
            let records = catalog.records(&rule.resource_type);
            let items = expand_selected(
                records,
                |record| rule.selector.matches(record),
                |record| match rule.copy_mode {
                    CopyMode::CatalogCount => record.copy_count(),
                    CopyMode::Single => 1,
                },
            );
            if items.is_empty() {
                continue;
            }
            blend
                .bucket_mut(bucket_display_name(&rule.resource_type))
                .extend(items);
        }

        blend
    }
}

/// Starter cards for one source, expanded per catalog copy counts. Used by
/// the encoder to auto-populate the starter bucket for a blend's board.
pub fn starter_cards(catalog: &ResourceCatalog, source: &str) -> Vec<ResourceRef> {
    expand_selected(
        catalog.records("starter"),
        |record| record.source == source,
        ResourceRecord::copy_count,
    )
}

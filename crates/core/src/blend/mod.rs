//! Blend model, codec, and rule-driven construction.

/// Text → collection parsing.
pub mod decoder;
/// Collection → text serialization.
pub mod encoder;
/// Blend and parsed-document models.
pub mod models;
/// Declarative catalog-driven blend construction.
pub mod rules;
/// Synonym grouping and expansion.
pub mod synonym;

pub use decoder::decode;
pub use encoder::{encode, GENERATOR_NAME, STARTER_BUCKET};
pub use models::{Blend, BoardConfig, MainBoard, Overview, ParsedBlend, ResourceRef};
pub use rules::{starter_cards, BlendRule, CopyMode, RuleSet, Selector};

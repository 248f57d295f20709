#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Dune Imperium blend builder.
//!
//! This crate hosts the resource catalog, the blend file codec,
//! rule-driven blend construction, and the persistence layer
//! used by the web frontend and any future tooling.

pub mod blend;
pub mod catalog;
pub mod config;
pub mod links;
pub mod models;
pub mod store;

pub use blend::{
    decode, encode, Blend, BoardConfig, MainBoard, Overview, ParsedBlend, ResourceRef, RuleSet,
};
pub use catalog::{CatalogLoader, ResourceCatalog};
pub use config::AppConfig;
pub use models::ResourceRecord;
pub use store::{BlendEntry, BlendStore, StoreError};

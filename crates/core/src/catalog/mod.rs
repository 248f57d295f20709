//! Resource catalog loading and querying.

/// Catalog deserialization, normalization, and the cached loader.
pub mod loader;

pub use loader::{CatalogLoader, ResourceCatalog};

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::{set_slug, ResourceRecord};

/// Read-only snapshot of the resource catalog: every resource type with its
/// records, in document order.
///
/// The catalog is produced by the spreadsheet ingestion step as a JSON
/// document mapping type names to record arrays. Loading applies the light
/// normalization the rest of the system relies on: `Base` collapses into
/// `Imperium`, redundant `(Source)` suffixes are stripped from names, and
/// every record carries a card-set slug.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceCatalog {
    types: IndexMap<String, Vec<ResourceRecord>>,
}

impl ResourceCatalog {
    /// Load and normalize the catalog document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let raw: IndexMap<String, Vec<RawRecord>> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse catalog {}", path.display()))?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: IndexMap<String, Vec<RawRecord>>) -> Self {
        let mut types = IndexMap::new();
        for (type_name, records) in raw {
            let mut normalized = Vec::with_capacity(records.len());
            for record in records {
                match normalize_record(&type_name, record) {
                    Some(record) => normalized.push(record),
                    None => warn!("Skipping unnamed record in {type_name}"),
                }
            }
            types.insert(type_name, normalized);
        }
        Self { types }
    }

    /// Assemble a catalog from already-normalized records, grouped by their
    /// resource type in encounter order.
    pub fn from_records(records: impl IntoIterator<Item = ResourceRecord>) -> Self {
        let mut types: IndexMap<String, Vec<ResourceRecord>> = IndexMap::new();
        for record in records {
            types
                .entry(record.resource_type.clone())
                .or_default()
                .push(record);
        }
        Self { types }
    }

    /// Resource type names in document order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Records of one resource type, empty for unknown types.
    pub fn records(&self, resource_type: &str) -> &[ResourceRecord] {
        self.types
            .get(resource_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate `(type name, records)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ResourceRecord])> {
        self.types
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    /// Total record count across all types.
    pub fn total_records(&self) -> usize {
        self.types.values().map(Vec::len).sum()
    }

    /// True when no type holds any record.
    pub fn is_empty(&self) -> bool {
        self.types.values().all(Vec::is_empty)
    }
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    resource_type: Option<String>,
    #[serde(flatten)]
    attributes: serde_json::Map<String, Value>,
}

fn normalize_record(type_name: &str, raw: RawRecord) -> Option<ResourceRecord> {
    let name = raw.name?.trim().to_string();
    if name.is_empty() || name.eq_ignore_ascii_case("none") {
        return None;
    }
    let mut name = name.replace("(Base)", "(Imperium)");

    let mut source = raw
        .source
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "Imperium".to_string());
    if source == "Base" {
        source = "Imperium".to_string();
    }

    // Some sheets repeat the source in the name column; keep one copy.
    let suffix = format!("({source})");
    if let Some(stripped) = name.strip_suffix(&suffix) {
        name = stripped.trim_end().to_string();
    }

    let mut attributes = raw.attributes;
    if !attributes.contains_key("card_set") {
        attributes.insert("card_set".to_string(), Value::String(set_slug(&source)));
    }

    Some(ResourceRecord {
        name,
        source,
        resource_type: raw
            .resource_type
            .unwrap_or_else(|| type_name.to_string()),
        attributes,
    })
}

/// Thread-safe, lazily-populated cache around the catalog document.
///
/// The catalog is loaded once per process and treated as immutable;
/// `refresh` repoints the loader (e.g. after the ingestion step regenerates
/// the document) and drops the cached snapshot.
pub struct CatalogLoader {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    path: PathBuf,
    cache: Option<ResourceCatalog>,
}

impl CatalogLoader {
    /// Build a loader over the catalog document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                path: path.into(),
                cache: None,
            })),
        }
    }

    /// Path of the catalog document.
    pub fn path(&self) -> PathBuf {
        self.inner.read().path.clone()
    }

    /// Point the loader at a new document and drop the cached snapshot.
    pub fn refresh(&self, path: impl Into<PathBuf>) {
        let mut inner = self.inner.write();
        inner.path = path.into();
        inner.cache = None;
    }

    /// Return the catalog, loading it on first use.
    pub fn catalog(&self) -> Result<ResourceCatalog> {
        let mut inner = self.inner.write();
        if let Some(catalog) = inner.cache.as_ref() {
            return Ok(catalog.clone());
        }
        let catalog = ResourceCatalog::load(&inner.path)?;
        inner.cache = Some(catalog.clone());
        Ok(catalog)
    }

    /// Filter records using a case-insensitive substring search over name,
    /// source, and resource type.
    pub fn records_matching(&self, query: &str) -> Result<Vec<ResourceRecord>> {
        let needle = query.trim().to_lowercase();
        let catalog = self.catalog()?;
        let records = catalog
            .iter()
            .flat_map(|(_, records)| records.iter().cloned());
        if needle.is_empty() {
            return Ok(records.collect());
        }
        Ok(records
            .filter(|record| {
                record.name.to_lowercase().contains(&needle)
                    || record.source.to_lowercase().contains(&needle)
                    || record.resource_type.to_lowercase().contains(&needle)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn write_catalog(dir: &Path, body: Value) -> PathBuf {
        let path = dir.join("resources.json");
        fs::write(&path, serde_json::to_vec_pretty(&body).unwrap()).unwrap();
        path
    }

    #[test]
    fn loads_and_normalizes_records() -> Result<()> {
        let temp = tempdir()?;
        let path = write_catalog(
            temp.path(),
            json!({
                "imperium": [
                    {"resource_type": "imperium", "name": "Duncan Idaho", "source": "Base", "count": 2},
                    {"resource_type": "imperium", "name": "Liet Kynes (Imperium)", "source": "Imperium"},
                    {"resource_type": "imperium", "name": "Scout (Base)", "source": "Base"},
                    {"resource_type": "imperium", "name": "NONE"},
                    {"resource_type": "imperium", "name": ""}
                ],
                "leader": [
                    {"resource_type": "leader", "name": "Gurney Halleck", "source": "Uprising", "card_set": "uprising"}
                ]
            }),
        );

        let catalog = ResourceCatalog::load(&path)?;
        assert_eq!(catalog.type_names().collect::<Vec<_>>(), ["imperium", "leader"]);

        let imperium = catalog.records("imperium");
        assert_eq!(imperium.len(), 3);
        assert_eq!(imperium[0].name, "Duncan Idaho");
        assert_eq!(imperium[0].source, "Imperium");
        assert_eq!(imperium[0].card_set(), "base");
        assert_eq!(imperium[0].copy_count(), 2);
        // Redundant source suffix stripped, (Base) rewritten first.
        assert_eq!(imperium[1].name, "Liet Kynes");
        assert_eq!(imperium[2].name, "Scout");

        assert_eq!(catalog.records("unknown").len(), 0);
        assert_eq!(catalog.total_records(), 4);
        assert!(!catalog.is_empty());
        Ok(())
    }

    #[test]
    fn missing_document_is_an_error() {
        let temp = tempdir().unwrap();
        let result = ResourceCatalog::load(temp.path().join("absent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn loader_caches_and_searches() -> Result<()> {
        let temp = tempdir()?;
        let path = write_catalog(
            temp.path(),
            json!({
                "imperium": [
                    {"resource_type": "imperium", "name": "Sardaukar Legion", "source": "Imperium"},
                    {"resource_type": "imperium", "name": "Spice Hunter", "source": "Uprising"}
                ]
            }),
        );

        let loader = CatalogLoader::new(&path);
        assert_eq!(loader.records_matching("")?.len(), 2);
        assert_eq!(loader.records_matching("spice")?.len(), 1);
        assert_eq!(loader.records_matching("uprising")?.len(), 1);
        assert_eq!(loader.records_matching("nothing")?.len(), 0);

        // Cache survives the document being rewritten until refresh.
        fs::write(&path, b"{}")?;
        assert_eq!(loader.catalog()?.total_records(), 2);
        loader.refresh(&path);
        assert_eq!(loader.catalog()?.total_records(), 0);
        Ok(())
    }
}

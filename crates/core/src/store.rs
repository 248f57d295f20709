//! Blend file persistence.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::{
    blend::{decode, encode, Blend, ParsedBlend},
    catalog::ResourceCatalog,
};

/// Root directory under the user's data dir used for blend files.
pub const DEFAULT_BLENDS_DIR: &str = "blendbuilder/blends";

/// Canned base blends that refuse deletion.
pub const PROTECTED_BLENDS: &[&str] = &["Base_Imperium.md", "Base_Uprising.md"];

/// Listing document regenerated after every mutation, for static hosting.
pub const INDEX_FILE: &str = "index.json";

/// Failures of the blend store. Nothing here is fatal to the process; the
/// caller decides presentation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested blend file does not exist.
    #[error("blend not found: {0}")]
    NotFound(String),
    /// The target name would escape the blends directory or is empty.
    #[error("invalid blend name: {0:?}")]
    InvalidName(String),
    /// The blend is a protected base blend and cannot be deleted.
    #[error("cannot delete base blend: {0}")]
    Protected(String),
    /// Underlying filesystem failure.
    #[error("failed to access {path}")]
    Io {
        /// Path the operation touched.
        path: PathBuf,
        /// Originating I/O error.
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Metadata describing one persisted blend file.
#[derive(Debug, Clone, Serialize)]
pub struct BlendEntry {
    /// File name inside the blends directory.
    pub filename: String,
    /// Absolute path on disk.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last-modified timestamp.
    pub modified: DateTime<Utc>,
}

/// Manager responsible for listing, reading, and writing blend files.
///
/// Saving always fully regenerates the file from the in-memory blend; files
/// are never edited in place.
pub struct BlendStore {
    root: PathBuf,
}

impl BlendStore {
    /// Create a new store rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the user's data directory.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_BLENDS_DIR)
    }

    /// Directory the store reads and writes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All blend files sorted by filename.
    pub fn entries(&self) -> Result<Vec<BlendEntry>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let listing =
            fs::read_dir(&self.root).map_err(|err| StoreError::io(&self.root, err))?;
        for entry in listing {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Failed to read blends directory entry: {err}");
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            match self.entry_for(&path) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {}
                Err(err) => warn!("Failed to stat blend {:?}: {err}", path),
            }
        }

        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(entries)
    }

    /// Read the raw text of one blend file.
    pub fn read(&self, filename: &str) -> Result<String, StoreError> {
        validate_component(filename)?;
        let path = self.root.join(filename);
        fs::read_to_string(&path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(filename.to_string())
            } else {
                StoreError::io(path, err)
            }
        })
    }

    /// Read and decode one blend file.
    pub fn load(&self, filename: &str) -> Result<ParsedBlend, StoreError> {
        Ok(decode(&self.read(filename)?))
    }

    /// Encode a blend and persist it under its sanitized name, regenerating
    /// the file and the listing index.
    pub fn save(&self, blend: &Blend, catalog: &ResourceCatalog) -> Result<BlendEntry, StoreError> {
        let filename = sanitize_file_name(&blend.name)?;
        self.save_document(&filename, &encode(blend, catalog))
    }

    /// Persist pre-rendered blend text under the given filename. The name
    /// is validated but otherwise written as provided.
    pub fn save_document(&self, filename: &str, content: &str) -> Result<BlendEntry, StoreError> {
        validate_component(filename)?;
        fs::create_dir_all(&self.root).map_err(|err| StoreError::io(&self.root, err))?;

        let path = self.root.join(filename);
        fs::write(&path, content).map_err(|err| StoreError::io(&path, err))?;
        self.write_index()?;

        self.entry_for(&path)?
            .ok_or_else(|| StoreError::NotFound(filename.to_string()))
    }

    /// Delete a blend file. The canned base blends are protected.
    pub fn delete(&self, filename: &str) -> Result<(), StoreError> {
        validate_component(filename)?;
        if PROTECTED_BLENDS.contains(&filename) {
            return Err(StoreError::Protected(filename.to_string()));
        }

        let path = self.root.join(filename);
        fs::remove_file(&path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(filename.to_string())
            } else {
                StoreError::io(path.clone(), err)
            }
        })?;
        self.write_index()
    }

    /// Regenerate `index.json`, the filename listing used when the blends
    /// directory is served statically.
    pub fn write_index(&self) -> Result<(), StoreError> {
        #[derive(Serialize)]
        struct IndexEntry {
            filename: String,
        }

        let listing: Vec<IndexEntry> = self
            .entries()?
            .into_iter()
            .map(|entry| IndexEntry {
                filename: entry.filename,
            })
            .collect();
        let path = self.root.join(INDEX_FILE);
        let serialized = serde_json::to_vec_pretty(&listing)
            .map_err(|err| StoreError::io(&path, io::Error::other(err)))?;
        fs::write(&path, serialized).map_err(|err| StoreError::io(&path, err))
    }

    fn entry_for(&self, path: &Path) -> Result<Option<BlendEntry>, StoreError> {
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            return Ok(None);
        };
        let metadata = fs::metadata(path).map_err(|err| StoreError::io(path, err))?;
        if !metadata.is_file() {
            return Ok(None);
        }
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        Ok(Some(BlendEntry {
            filename: filename.to_string(),
            path: path.to_path_buf(),
            size: metadata.len(),
            modified,
        }))
    }
}

/// Turn a blend name into its on-disk filename: spaces and path separators
/// become underscores, the `.md` suffix is appended when missing. Names that
/// still smell of traversal, or sanitize to nothing, are rejected.
pub fn sanitize_file_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }

    let mut filename: String = trimmed
        .chars()
        .map(|ch| match ch {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    if !filename.ends_with(".md") {
        filename.push_str(".md");
    }

    if filename.contains("..") || filename == ".md" {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(filename)
}

/// Reject filenames that could escape the blends directory.
fn validate_component(filename: &str) -> Result<(), StoreError> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(StoreError::InvalidName(filename.to_string()));
    }
    Ok(())
}

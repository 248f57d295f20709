//! Application configuration handling.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Directory name used under the user's config and data directories.
pub const APP_DIR: &str = "blendbuilder";

/// Runtime configuration for the blend builder.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory where blend files are stored.
    pub blends_dir: PathBuf,
    /// Path of the resource catalog document.
    pub catalog_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from the default file, layered with
    /// `BLENDBUILDER_*` environment overrides on top of built-in defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(config_file_path())
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = Config::builder()
            .set_default(
                "blends_dir",
                default_blends_dir().to_string_lossy().to_string(),
            )?
            .set_default(
                "catalog_path",
                default_catalog_path().to_string_lossy().to_string(),
            )?
            .add_source(File::from(path.clone()).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("BLENDBUILDER"))
            .build()
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

fn default_blends_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("blends")
}

fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("resources.json")
}

/// Write a commented default configuration file when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let path = config_file_path();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let contents = format!(
        "# Blend builder configuration.\n\
         #\n\
         # blends_dir = \"{}\"\n\
         # catalog_path = \"{}\"\n",
        default_blends_dir().display(),
        default_catalog_path().display()
    );
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_when_file_is_absent() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("missing.toml"))?;
        assert!(config.blends_dir.ends_with("blends"));
        assert!(config.catalog_path.ends_with("resources.json"));
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "blends_dir = \"/srv/blends\"\ncatalog_path = \"/srv/resources.json\"\n",
        )?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.blends_dir, PathBuf::from("/srv/blends"));
        assert_eq!(config.catalog_path, PathBuf::from("/srv/resources.json"));
        Ok(())
    }
}

// src/infrastructure/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::SortKey;

/// TOML configuration for the local cache and listing defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StorageConfig {
    /// Directory holding the two cache blobs. Empty means "use the platform
    /// data directory".
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ViewConfig {
    /// Default listing order: "updated", "created" or "title".
    #[serde(default = "default_sort")]
    pub sort: String,
}

// Default value functions
fn default_data_dir() -> String {
    String::new()
}
fn default_sort() -> String {
    "updated".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            sort: default_sort(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Create default configuration file at path
    pub fn create_default(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// The configured cache directory, or `None` when unset.
    pub fn data_dir(&self) -> Option<PathBuf> {
        if self.storage.data_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.storage.data_dir))
        }
    }

    /// The configured listing order, falling back to `updated` for an
    /// unrecognized value.
    pub fn sort_key(&self) -> SortKey {
        match self.view.sort.as_str() {
            "created" => SortKey::Created,
            "title" => SortKey::Title,
            _ => SortKey::Updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_no_file_when_creating_default_then_creates_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("phrasesnap.toml");

        let config = Config::create_default(&config_path).unwrap();

        assert_eq!(config.view.sort, "updated");
        assert!(config.storage.data_dir.is_empty());
        assert!(config_path.exists());
    }

    #[test]
    fn given_saved_config_when_loading_then_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("phrasesnap.toml");

        let mut config = Config::default();
        config.view.sort = "title".to_string();
        config.save(&config_path).unwrap();
        let loaded = Config::load(&config_path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.sort_key(), SortKey::Title);
    }

    #[test]
    fn given_empty_data_dir_when_resolving_then_none_is_returned() {
        let config = Config::default();

        assert_eq!(config.data_dir(), None);
    }

    #[test]
    fn given_configured_data_dir_when_resolving_then_path_is_returned() {
        let mut config = Config::default();
        config.storage.data_dir = "/var/lib/phrasesnap".to_string();

        assert_eq!(config.data_dir(), Some(PathBuf::from("/var/lib/phrasesnap")));
    }

    #[test]
    fn given_unknown_sort_value_when_resolving_then_falls_back_to_updated() {
        let mut config = Config::default();
        config.view.sort = "frobnicate".to_string();

        assert_eq!(config.sort_key(), SortKey::Updated);
    }
}

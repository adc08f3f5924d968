use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::TelecastError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Index pages fetched when browsing without an explicit page list.
    pub index_pages: Vec<u32>,
}

impl AppConfig {
    /// Load config: user file (if it exists) over built-in defaults.
    pub fn load() -> Result<Self, TelecastError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_path(&user_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit file path.
    pub fn load_path(path: &Path) -> Result<Self, TelecastError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TelecastError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), TelecastError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TelecastError::Config(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Path to the user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "telecast")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://api.tvmaze.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.catalog.index_pages, vec![0, 1, 2]);
    }

    #[test]
    fn test_load_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.api.base_url = "http://localhost:9000".into();
        config.catalog.index_pages = vec![0];
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = AppConfig::load_path(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://localhost:9000");
        assert_eq!(loaded.catalog.index_pages, vec![0]);
    }

    #[test]
    fn test_load_path_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        assert!(AppConfig::load_path(&path).is_err());
    }
}

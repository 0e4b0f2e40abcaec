//! Catalog configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ContentError, Result};
use crate::search::SearchMode;
use crate::validation::ValidationConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory of authored `*.json` content. Falls back to
    /// [`default_content_dir`] when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_dir: Option<PathBuf>,

    /// Include the collections compiled into the crate
    #[serde(default = "default_true")]
    pub include_builtin: bool,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Matching strategy for free-text queries
    #[serde(default)]
    pub mode: SearchMode,
}

fn default_true() -> bool { true }

/// `<data_local_dir>/soma/content`, if the platform has one.
pub fn default_content_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("soma").join("content"))
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            include_builtin: true,
            search: SearchConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Read a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| ContentError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded catalog config");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ContentError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ContentError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Configured content directory, or the platform default.
    pub fn resolved_content_dir(&self) -> Option<PathBuf> {
        self.content_dir.clone().or_else(default_content_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CatalogConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatalogConfig::default());
        assert!(config.include_builtin);
        assert_eq!(config.validation.required_levels, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_partial_sections() {
        let config = CatalogConfig::from_toml_str(
            r#"
            content_dir = "/srv/soma"
            include_builtin = false

            [search]
            mode = "all-terms"

            [validation]
            fail_on_warnings = true
            "#,
        )
        .unwrap();

        assert_eq!(config.content_dir, Some(PathBuf::from("/srv/soma")));
        assert!(!config.include_builtin);
        assert_eq!(config.search.mode, SearchMode::AllTerms);
        assert!(config.validation.fail_on_warnings);
        assert_eq!(config.validation.required_levels.len(), 5);
        assert_eq!(config.resolved_content_dir(), Some(PathBuf::from("/srv/soma")));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = CatalogConfig::from_toml_str("[search]\nmode = \"fuzzy\"").unwrap_err();
        assert!(matches!(err, ContentError::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("catalog.toml");

        let config = CatalogConfig {
            content_dir: Some(tmp.path().join("content")),
            validation: ValidationConfig {
                required_levels: vec![1, 3],
                fail_on_warnings: false,
            },
            ..Default::default()
        };
        config.save(&path).unwrap();

        assert_eq!(CatalogConfig::load(&path).unwrap(), config);
    }
}

//! Configuration
//!
//! `CompositionConfig` is built once at startup and injected into
//! `CompositionService::new`; nothing reads container names from global state.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::DEFAULT_COLUMN_COUNT;
use crate::http_server::HttpServerConfig;
use crate::observability::Severity;

/// Default cap on retained versions per entity
pub const DEFAULT_MAX_VERSIONS: usize = 5;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// The three containers backing one entity kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityContainers {
    pub entities: String,
    pub states: String,
    pub versions: String,
}

/// Object store container names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerNames {
    #[serde(default = "default_content_items")]
    pub content_items: String,

    #[serde(default = "default_content_item_states")]
    pub content_item_states: String,

    #[serde(default = "default_content_item_versions")]
    pub content_item_versions: String,

    #[serde(default = "default_pages")]
    pub pages: String,

    #[serde(default = "default_page_states")]
    pub page_states: String,

    #[serde(default = "default_page_versions")]
    pub page_versions: String,

    /// Sub-entities owned by page cells
    #[serde(default = "default_page_components")]
    pub page_components: String,
}

fn default_content_items() -> String {
    "content-items".to_string()
}
fn default_content_item_states() -> String {
    "content-item-states".to_string()
}
fn default_content_item_versions() -> String {
    "content-item-versions".to_string()
}
fn default_pages() -> String {
    "pages".to_string()
}
fn default_page_states() -> String {
    "page-states".to_string()
}
fn default_page_versions() -> String {
    "page-versions".to_string()
}
fn default_page_components() -> String {
    "page-components".to_string()
}

impl Default for ContainerNames {
    fn default() -> Self {
        Self {
            content_items: default_content_items(),
            content_item_states: default_content_item_states(),
            content_item_versions: default_content_item_versions(),
            pages: default_pages(),
            page_states: default_page_states(),
            page_versions: default_page_versions(),
            page_components: default_page_components(),
        }
    }
}

impl ContainerNames {
    pub fn pages(&self) -> EntityContainers {
        EntityContainers {
            entities: self.pages.clone(),
            states: self.page_states.clone(),
            versions: self.page_versions.clone(),
        }
    }

    pub fn content_items(&self) -> EntityContainers {
        EntityContainers {
            entities: self.content_items.clone(),
            states: self.content_item_states.clone(),
            versions: self.content_item_versions.clone(),
        }
    }

    fn all(&self) -> [&str; 7] {
        [
            &self.content_items,
            &self.content_item_states,
            &self.content_item_versions,
            &self.pages,
            &self.page_states,
            &self.page_versions,
            &self.page_components,
        ]
    }
}

/// Composition engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionConfig {
    /// Cells in a freshly created row
    #[serde(default = "default_column_count")]
    pub column_count: u32,

    /// Versions retained per entity
    #[serde(default = "default_max_versions")]
    pub max_versions: usize,

    /// Fail with `Conflict` instead of replacing an occupied cell's component
    #[serde(default)]
    pub reject_occupied_cells: bool,

    #[serde(default)]
    pub containers: ContainerNames,
}

fn default_column_count() -> u32 {
    DEFAULT_COLUMN_COUNT
}

fn default_max_versions() -> usize {
    DEFAULT_MAX_VERSIONS
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            column_count: default_column_count(),
            max_versions: default_max_versions(),
            reject_occupied_cells: false,
            containers: ContainerNames::default(),
        }
    }
}

impl CompositionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.column_count == 0 {
            return Err(ConfigError::Invalid("columnCount must be > 0".into()));
        }
        if self.max_versions == 0 {
            return Err(ConfigError::Invalid("maxVersions must be > 0".into()));
        }

        let names = self.containers.all();
        if let Some(empty) = names.iter().find(|n| n.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "container name must not be empty: {:?}",
                empty
            )));
        }
        let distinct: HashSet<_> = names.iter().collect();
        if distinct.len() != names.len() {
            return Err(ConfigError::Invalid(
                "container names must be distinct".into(),
            ));
        }
        Ok(())
    }
}

/// Whole-process configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub composition: CompositionConfig,

    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_log_level() -> Severity {
    Severity::Info
}

impl AppConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.composition.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompositionConfig::default();
        assert_eq!(config.column_count, 12);
        assert_eq!(config.max_versions, 5);
        assert!(!config.reject_occupied_cells);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.composition, CompositionConfig::default());
        assert_eq!(config.log_level, Severity::Info);
    }

    #[test]
    fn test_default_app_config_round_trips() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, Severity::Info);

        let reloaded = AppConfig::from_json(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(reloaded.composition, config.composition);
        assert_eq!(reloaded.server, config.server);
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_json(
            r#"{"composition": {"maxVersions": 3, "containers": {"pages": "site-pages"}}}"#,
        )
        .unwrap();
        assert_eq!(config.composition.max_versions, 3);
        assert_eq!(config.composition.containers.pages, "site-pages");
        assert_eq!(config.composition.containers.page_states, "page-states");
    }

    #[test]
    fn test_zero_column_count_rejected() {
        let err = AppConfig::from_json(r#"{"composition": {"columnCount": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_duplicate_container_names_rejected() {
        let mut config = CompositionConfig::default();
        config.containers.page_states = config.containers.pages.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_entity_containers() {
        let names = ContainerNames::default();
        let pages = names.pages();
        assert_eq!(pages.entities, "pages");
        assert_eq!(pages.states, "page-states");
        assert_eq!(pages.versions, "page-versions");
        assert_eq!(names.content_items().entities, "content-items");
    }
}

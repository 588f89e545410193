//! Config module - Applier settings loaded from YAML or JSON.

use crate::apply::{ApplyOptions, ServerSideApplyConfig, UpdateStrategy, DEFAULT_FIELD_MANAGER};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// ConfigError is returned when a config file cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("fieldManager must not be empty")]
    EmptyFieldManager,
}

/// ApplierConfig holds process-wide applier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplierConfig {
    /// Identity recorded by the store as owner of applied fields.
    pub field_manager: String,
    /// Default force flag for server-side apply.
    pub force_conflicts: bool,
}

impl Default for ApplierConfig {
    fn default() -> Self {
        ApplierConfig {
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            force_conflicts: false,
        }
    }
}

impl ApplierConfig {
    /// Parses a config document. JSON is accepted as well, being valid YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ApplierConfig = serde_yaml::from_str(yaml)?;
        if config.field_manager.trim().is_empty() {
            return Err(ConfigError::EmptyFieldManager);
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Server-side apply options using this config's force flag.
    pub fn default_apply_options(&self) -> ApplyOptions {
        ApplyOptions::new(UpdateStrategy::ServerSideApply(ServerSideApplyConfig {
            force: self.force_conflicts,
            field_manager: None,
        }))
    }
}

//! Indexing configuration
//!
//! Behaviour switches for the pandas compatibility rules that callers may want
//! to turn off, and tuning for the host engine. Configurations can be built in
//! code or loaded from TOML, YAML or JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the host engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Row count above which per-column work runs on the rayon pool
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 64 * 1024,
        }
    }
}

/// Configuration for `.loc` / `.iloc` resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Treat an integer `.loc` key on a non-numeric index as a position
    pub integer_position_fallback: bool,
    /// Resolve label slices on a non-monotonic datetime index with a mask
    pub temporal_mask_fallback: bool,
    /// Let `.loc` assignment with a missing scalar label append a row
    pub allow_row_append: bool,
    /// Let `.loc` assignment with a missing column label insert a column
    pub allow_column_insert: bool,
    /// Host engine tuning
    pub engine: EngineConfig,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            integer_position_fallback: true,
            temporal_mask_fallback: true,
            allow_row_append: true,
            allow_column_insert: true,
            engine: EngineConfig::default(),
        }
    }
}

impl IndexingConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a configuration file, choosing the format from its extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let config = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            other => {
                return Err(Error::Config(format!(
                    "unsupported configuration format: {:?}",
                    other
                )))
            }
        };
        log::debug!("loaded indexing configuration from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }
}

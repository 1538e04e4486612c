//! Configuration Management
//!
//! Loads client settings from a JSON or YAML file. A single file holds both
//! the transport settings and the API's client profile.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::{ClientProfile, TransportConfig};
use crate::error::{Error, Result};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(flatten)]
    pub transport: TransportConfig,
    #[serde(flatten)]
    pub profile: ClientProfile,
}

impl Config {
    pub fn new(uri: &str) -> Self {
        Self {
            transport: TransportConfig::new(uri),
            profile: ClientProfile::default(),
        }
    }

    /// Default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("restobj").join("config.json"))
    }

    /// Load configuration from disk. `.yaml`/`.yml` files are read as YAML,
    /// anything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| {
                Error::config(format!("Invalid YAML in {}: {}", path.display(), e))
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| {
                Error::config(format!("Invalid JSON in {}: {}", path.display(), e))
            })?
        };

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::config(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::config(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(())
    }
}

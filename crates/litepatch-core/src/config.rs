//! Configuration schema (litepatch.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name looked up in the workspace root when no `--config` is given
pub const CONFIG_FILE_NAME: &str = "litepatch.toml";

/// Manifest dependency swap settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSettings {
    /// Manifest location relative to the workspace root
    pub path: String,

    /// Keys dropped from `dependencies`
    pub remove: Vec<String>,

    /// Entries forced into `dependencies`
    pub dependencies: BTreeMap<String, String>,

    /// Entries forced into `devDependencies`
    pub dev_dependencies: BTreeMap<String, String>,
}

impl Default for ManifestSettings {
    fn default() -> Self {
        Self {
            path: "packages/db/package.json".to_string(),
            remove: vec!["postgres".to_string()],
            dependencies: BTreeMap::from([
                ("better-sqlite3".to_string(), "^11.0.0".to_string()),
            ]),
            dev_dependencies: BTreeMap::from([
                ("@types/better-sqlite3".to_string(), "^7.6.0".to_string()),
            ]),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Exit non-zero when any step fails
    #[serde(default = "default_true")]
    pub fail_on_error: bool,

    /// Write each artifact to a temporary sibling and rename it into place
    #[serde(default = "default_true")]
    pub atomic_writes: bool,

    /// Manifest patch settings
    #[serde(default)]
    pub manifest: ManifestSettings,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fail_on_error: true,
            atomic_writes: true,
            manifest: ManifestSettings::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Resolve the effective config for a workspace
    ///
    /// An explicit path must exist. Otherwise `litepatch.toml` in the
    /// workspace root is used when present, and defaults when not.
    pub fn discover(workspace_root: &Path, explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::from_file(path)?, Some(path.to_path_buf())));
        }

        let candidate = workspace_root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Ok((Self::from_file(&candidate)?, Some(candidate)));
        }

        Ok((Self::default(), None))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(String, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

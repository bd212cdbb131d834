//! Configuration loading and management
//!
//! Handles parsing of `taskdeck.toml` configuration files. Every field has a
//! default, so a missing file or an empty file is a fully valid setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::registry::DEFAULT_MAX_TASKS;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "taskdeck.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Audit log configuration
    #[serde(default)]
    pub logs: LogConfig,

    /// Registry configuration
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON snapshot file
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("tasks.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
        }
    }
}

/// Audit log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory holding the three audit log files
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Ceiling on live records
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,
}

fn default_max_tasks() -> usize {
    DEFAULT_MAX_TASKS
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_tasks: default_max_tasks(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|err| Error::InvalidConfig(format!("{}: {}", path.display(), err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.registry.max_tasks == 0 {
            return Err(Error::InvalidConfig(
                "registry.max_tasks must be at least 1".to_string(),
            ));
        }

        if self.storage.snapshot.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.snapshot cannot be empty".to_string(),
            ));
        }

        if self.logs.dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("logs.dir cannot be empty".to_string()));
        }

        Ok(())
    }
}

//! Configuration types and parsing for iotflow.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pipeline configuration from iotflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory the query results file is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// File the run log is appended to
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// Whether this configuration points at a transient in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_DB_PATH
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            output_dir: default_output_dir(),
            log_file: default_log_file(),
        }
    }
}

/// Special database path selecting an in-memory database.
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

const CONFIG_FILE_NAMES: &[&str] = &["iotflow.yml", "iotflow.yaml"];

fn default_db_path() -> String {
    IN_MEMORY_DB_PATH.to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_log_file() -> String {
    "logs/etl_pipeline.log".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory if it holds iotflow.yml or
    /// iotflow.yaml, falling back to defaults otherwise.
    pub fn load_from_dir_or_default(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
        {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }

        if self.output_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "output_dir cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Path of the exported results file for a format extension.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        Path::new(&self.output_dir).join(format!("results.{extension}"))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Runtime configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{LogFormat, RuntimeError};

/// Configuration for a ballot ledger runtime.
///
/// Can be loaded from a TOML file via [`RuntimeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum size of the LMDB memory map in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    #[serde(default = "default_max_dbs")]
    pub max_dbs: u32,

    /// How many times an invocation is executed before a run of commit
    /// conflicts is reported as an error.
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ballot_data")
}

fn default_map_size() -> usize {
    256 * 1024 * 1024
}

fn default_max_dbs() -> u32 {
    4
}

fn default_max_commit_attempts() -> u32 {
    3
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RuntimeConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, RuntimeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuntimeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, RuntimeError> {
        let config: Self = toml::from_str(s).map_err(|e| RuntimeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, RuntimeError> {
        toml::to_string_pretty(self).map_err(|e| RuntimeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.max_commit_attempts == 0 {
            return Err(RuntimeError::Config(
                "max_commit_attempts must be at least 1".into(),
            ));
        }
        self.log_format()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, RuntimeError> {
        self.log_format.parse()
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            max_dbs: default_max_dbs(),
            max_commit_attempts: default_max_commit_attempts(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

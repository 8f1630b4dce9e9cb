//! Configuration handling for the transformation engine

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::TugError;
use crate::logging::LogLevel;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Engine settings
    #[serde(default, alias = "tug")]
    pub engine: EngineConfig,
}

/// Core engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Process independent files on the rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Upper bound on deferred visits run for one file by one recipe
    #[serde(default = "default_max_deferred_visits")]
    pub max_deferred_visits: usize,

    /// Check node-id uniqueness on every changed tree
    #[serde(default = "default_validate_identity")]
    pub validate_identity: bool,

    /// Stop the whole run at the first failing file
    #[serde(default)]
    pub fail_fast: bool,

    /// Log level used when `RUST_LOG` is unset
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_parallel() -> bool {
    true
}

fn default_max_deferred_visits() -> usize {
    64
}

fn default_validate_identity() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            max_deferred_visits: default_max_deferred_visits(),
            validate_identity: default_validate_identity(),
            fail_fast: false,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, TugError> {
        let content = fs::read_to_string(path)
            .map_err(|e| TugError::Config(format!("failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, TugError> {
        toml::from_str(content)
            .map_err(|e| TugError::Config(format!("failed to parse config file: {}", e)))
    }
}

impl EngineConfig {
    /// Sequential configuration, used by tests that need deterministic ordering
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = Config::from_toml_str("[engine]\nfail_fast = true\n").unwrap();
        assert!(config.engine.fail_fast);
        assert!(config.engine.parallel);
        assert_eq!(config.engine.max_deferred_visits, 64);
        assert!(config.engine.validate_identity);
    }

    #[test]
    fn empty_document_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn tug_alias_is_accepted() {
        let config = Config::from_toml_str("[tug]\nparallel = false\nlog_level = \"debug\"\n").unwrap();
        assert!(!config.engine.parallel);
        assert_eq!(config.engine.log_level, LogLevel::Debug);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nmax_deferred_visits = 3").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.engine.max_deferred_visits, 3);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = Config::from_toml_str("[engine\n").unwrap_err();
        assert!(matches!(err, TugError::Config(_)));
    }
}

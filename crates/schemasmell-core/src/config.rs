//! Configuration schema (schemasmell.toml)

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::status::Status;

/// Status overrides for specific checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityOverrides {
    /// Map of check name to the status it should be reported with
    #[serde(default)]
    pub overrides: HashMap<String, Status>,
}

impl SeverityOverrides {
    /// Status for a check, or the one it produced
    pub fn get_status(&self, check: &str, produced: Status) -> Status {
        self.overrides.get(check).copied().unwrap_or(produced)
    }

    pub fn set_override(&mut self, check: impl Into<String>, status: Status) {
        self.overrides.insert(check.into(), status);
    }
}

fn default_min_severity() -> Status {
    Status::Info
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Session variables assumed for static scripts (`version`, `sql_mode`, ...)
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Checks that must not run, by name
    #[serde(default)]
    pub disabled_checks: Vec<String>,

    /// Lowest status shown in output
    #[serde(default = "default_min_severity")]
    pub min_severity: Status,

    /// Status overrides
    #[serde(default)]
    pub severity: SeverityOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variables: BTreeMap::new(),
            disabled_checks: Vec::new(),
            min_severity: default_min_severity(),
            severity: SeverityOverrides::default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    pub fn is_check_disabled(&self, check: &str) -> bool {
        self.disabled_checks.iter().any(|name| name == check)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.min_severity, Status::Info);
        assert!(config.variables.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml(
            r#"
            disabled_checks = ["uuid_storage"]
            min_severity = "concern"

            [variables]
            version = "8.0.36"
            sql_mode = "STRICT_TRANS_TABLES"

            [severity.overrides]
            empty_table = "info"
            "#,
        )
        .unwrap();

        assert!(config.is_check_disabled("uuid_storage"));
        assert!(!config.is_check_disabled("primary_key"));
        assert_eq!(config.min_severity, Status::Concern);
        assert_eq!(config.variables.get("version").map(String::as_str), Some("8.0.36"));
        assert_eq!(
            config.severity.get_status("empty_table", Status::Warning),
            Status::Info
        );
        assert_eq!(
            config.severity.get_status("primary_key", Status::Critical),
            Status::Critical
        );
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::from_toml("min_severity = \"loud\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemasmell.toml");

        let mut config = Config::default();
        config.disabled_checks.push("empty_table".to_string());
        config.severity.set_override("uuid_storage", Status::Warning);
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.disabled_checks, config.disabled_checks);
        assert_eq!(loaded.severity, config.severity);
        assert_eq!(loaded, config);
    }
}

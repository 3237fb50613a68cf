//! Application configuration.
//!
//! Read from an optional JSON file; every field has a default, so `{}` is a
//! valid config. Environment variables override the file:
//!
//! - `TABCHECK_BIND`: listen address for `serve`
//! - `TABCHECK_UNKNOWN_TASKS`: `reject` or `skip`

use crate::pipeline::UnknownTaskPolicy;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const BIND_ENV: &str = "TABCHECK_BIND";
pub const UNKNOWN_TASKS_ENV: &str = "TABCHECK_UNKNOWN_TASKS";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listen address for the HTTP service
    pub bind_address: String,
    /// Policy for task names with no registered check
    pub unknown_tasks: UnknownTaskPolicy,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    /// Write rolling log files in addition to stderr
    pub file_logging: bool,
    /// Log file directory; platform data dir when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_owned(),
            unknown_tasks: UnknownTaskPolicy::default(),
            max_upload_bytes: 16 * 1024 * 1024,
            log_filter: "info".to_owned(),
            file_logging: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load `path` (or defaults when `None`) and apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply overrides looked up through `lookup` (the process environment in `load`).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind_address = bind;
        }
        if let Some(policy) = lookup(UNKNOWN_TASKS_ENV) {
            self.unknown_tasks = policy
                .parse::<UnknownTaskPolicy>()
                .map_err(|e| anyhow::anyhow!(e))
                .with_context(|| format!("Invalid {UNKNOWN_TASKS_ENV}"))?;
        }
        Ok(())
    }

    /// Directory for log files, if file logging is enabled.
    pub fn resolved_log_dir(&self) -> Option<PathBuf> {
        if !self.file_logging {
            return None;
        }
        self.log_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("tabcheck").join("logs")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{}")?;

        assert_eq!(AppConfig::from_file(&path)?, AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_file_values_are_read() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"bind_address": "0.0.0.0:8080", "unknown_tasks": "skip", "file_logging": true, "log_dir": "/var/log/tabcheck"}"#,
        )?;

        let config = AppConfig::from_file(&path)?;
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.unknown_tasks, UnknownTaskPolicy::Skip);
        assert_eq!(
            config.resolved_log_dir(),
            Some(PathBuf::from("/var/log/tabcheck"))
        );
        Ok(())
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{bind_address").expect("write");

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_overrides_replace_file_values() -> Result<()> {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            BIND_ENV => Some("0.0.0.0:9000".to_owned()),
            UNKNOWN_TASKS_ENV => Some("skip".to_owned()),
            _ => None,
        })?;

        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.unknown_tasks, UnknownTaskPolicy::Skip);
        Ok(())
    }

    #[test]
    fn test_bad_policy_override_is_an_error() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == UNKNOWN_TASKS_ENV).then(|| "maybe".to_owned()));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_logging_off_has_no_log_dir() {
        let config = AppConfig {
            log_dir: Some(PathBuf::from("/tmp/logs")),
            ..AppConfig::default()
        };
        assert_eq!(config.resolved_log_dir(), None);
    }
}

//! Simulator configuration.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`CAMPAIGNSIM_*`)
//! 2. TOML config file, when one is given
//! 3. Compiled defaults
//!
//! ```toml
//! [runtime]
//! workers = 2
//! queue_capacity = 32
//! latency_ms = 2500
//!
//! [logging]
//! level = "debug"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::runtime::RuntimeConfig;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CAMPAIGNSIM_";

/// Configuration errors.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    ReadFailed {
        path: String,
        message: String,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError {
        path: String,
        message: String,
    },

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv {
        var: String,
        value: String,
    },

    #[error("Invalid config value for {field}: {message}")]
    ValidationFailed {
        field: String,
        message: String,
    },
}

/// Worker-pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSection {
    /// Worker threads; must be positive.
    pub workers: usize,
    /// Bounded queue length; must be positive.
    pub queue_capacity: usize,
    /// Cosmetic delay before each run, in milliseconds.
    pub latency_ms: u64,
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            workers: 1,
            queue_capacity: 16,
            latency_ms: 0,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// `[runtime]` table.
    pub runtime: RuntimeSection,
    /// `[logging]` table.
    pub logging: LoggingSection,
}

impl SimulatorConfig {
    /// Loads defaults, then `path` (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(std::env::vars())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Applies `CAMPAIGNSIM_*` overrides from `vars`; unrelated variables are ignored.
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "WORKERS" => self.runtime.workers = parse_env(&key, &value)?,
                "QUEUE_CAPACITY" => self.runtime.queue_capacity = parse_env(&key, &value)?,
                "LATENCY_MS" => self.runtime.latency_ms = parse_env(&key, &value)?,
                "LOG_LEVEL" => self.logging.level = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runtime.workers == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "runtime.workers".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.runtime.queue_capacity == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "runtime.queue_capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "logging.level".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Runtime settings for [`crate::SimulationRuntime`].
    #[must_use]
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            workers: self.runtime.workers,
            queue_capacity: self.runtime.queue_capacity,
            latency: Duration::from_millis(self.runtime.latency_ms),
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        let config = SimulatorConfig::default();
        assert!(config.validate().is_ok());
        let rt = config.runtime_config();
        assert_eq!(rt.workers, 1);
        assert_eq!(rt.queue_capacity, 16);
        assert_eq!(rt.latency, Duration::ZERO);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = SimulatorConfig::from_toml("[runtime]\nlatency_ms = 2500\n").unwrap();
        assert_eq!(config.runtime.latency_ms, 2500);
        assert_eq!(config.runtime.workers, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = SimulatorConfig::from_toml("[runtime\nworkers = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = SimulatorConfig::from_toml("[runtime]\nworkers = 2\n").unwrap();
        config
            .apply_env_overrides(vars(&[
                ("CAMPAIGNSIM_WORKERS", "4"),
                ("CAMPAIGNSIM_LOG_LEVEL", "debug"),
                ("PATH", "/usr/bin"),
            ]))
            .unwrap();
        assert_eq!(config.runtime.workers, 4);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn bad_env_value_is_rejected() {
        let mut config = SimulatorConfig::default();
        let err = config
            .apply_env_overrides(vars(&[("CAMPAIGNSIM_LATENCY_MS", "soon")]))
            .unwrap_err();
        let ConfigError::InvalidEnv { var, .. } = err else {
            panic!("expected InvalidEnv, got {err:?}");
        };
        assert_eq!(var, "CAMPAIGNSIM_LATENCY_MS");
    }

    #[test]
    fn zero_workers_fails_validation() {
        let config = SimulatorConfig::from_toml("[runtime]\nworkers = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("runtime.workers"));
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[runtime]\nqueue_capacity = 4\n\n[logging]\nlevel = \"warn\"").unwrap();

        let config = SimulatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.runtime.queue_capacity, 4);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SimulatorConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}

//! Directory configuration.
//!
//! Configuration is layered:
//! - Default values (embedded in binary)
//! - Configuration file (TOML format)
//! - Environment variable overrides (prefix: `ADDRSPACE__`)
//!
//! # Environment Variables
//!
//! - `ADDRSPACE__REGISTRY__INITIAL_CAPACITY=32`
//! - `ADDRSPACE__REGISTRY__FANOUT_WARN_THRESHOLD=128`
//! - `ADDRSPACE__LOGGING__LEVEL=debug`
//! - `ADDRSPACE__LOGGING__JSON=true`
//!
//! # Example
//!
//! ```ignore
//! use addrspace_directory::config::DirectoryConfig;
//!
//! let config = DirectoryConfig::load(Some("addrspace.toml")).unwrap();
//! println!("Fan-out threshold: {}", config.registry.fanout_warn_threshold);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration for a directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Partition registry configuration
    pub registry: RegistryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl DirectoryConfig {
    /// Loads configuration from an optional file path with environment variable overrides.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (ADDRSPACE__*)
    /// 2. Configuration file (if provided and present)
    /// 3. Built-in defaults
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(file_path) = path {
            if Path::new(file_path).exists() {
                let contents = std::fs::read_to_string(file_path)?;
                config = toml::from_str(&contents)?;
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Applies overrides looked up by environment variable name.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) =
            lookup("ADDRSPACE__REGISTRY__INITIAL_CAPACITY").and_then(|v| v.parse().ok())
        {
            self.registry.initial_capacity = v;
        }
        if let Some(v) =
            lookup("ADDRSPACE__REGISTRY__FANOUT_WARN_THRESHOLD").and_then(|v| v.parse().ok())
        {
            self.registry.fanout_warn_threshold = v;
        }

        if let Some(val) = lookup("ADDRSPACE__LOGGING__LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("ADDRSPACE__LOGGING__JSON") {
            self.logging.json = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Serializes the configuration to TOML format.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Partition registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Partitions to reserve room for up front
    pub initial_capacity: usize,
    /// Edge queries fanning out to more partitions than this are logged
    pub fanout_warn_threshold: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 8,
            fanout_warn_threshold: 64,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Use JSON format for log output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

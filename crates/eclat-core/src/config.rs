//! Configuration for mining runs.
//!
//! Provides configuration file support via `eclat.toml`, environment variables,
//! and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (CLI flags)
//! 2. Environment variables (`ECLAT_*`, sections split on `__`,
//!    e.g. `ECLAT_MINING__MIN_SUPPORT=0.05`)
//! 3. Configuration file (`eclat.toml`)
//! 4. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::bitset::BackendKind;
use crate::guardrails::MiningLimits;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "eclat.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

/// Mining parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Minimum support as a fraction of the transactions.
    pub min_support: f64,
    /// Fraction of the input transactions to read, from the start.
    pub fraction: f64,
    /// Bitset backend.
    pub backend: BackendKind,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 0.1,
            fraction: 1.0,
            backend: BackendKind::Roaring,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EclatConfig {
    /// Mining parameters.
    pub mining: MiningConfig,
    /// Guard rails.
    pub limits: MiningLimits,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl EclatConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < `eclat.toml` < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(DEFAULT_CONFIG_FILE)
    }

    /// Loads configuration from a specific file path. A missing file is
    /// treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("ECLAT_").split("__"));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str));

        figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mining.min_support.is_finite() || self.mining.min_support <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "mining.min_support".to_string(),
                message: format!("value {} must be > 0", self.mining.min_support),
            });
        }

        if !self.mining.fraction.is_finite() || self.mining.fraction <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "mining.fraction".to_string(),
                message: format!("value {} must be > 0", self.mining.fraction),
            });
        }

        if self.limits.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "limits.max_depth".to_string(),
                message: "value 0 must be >= 1".to_string(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Fabricwork is configured from a single TOML file supplied by the
//! embedding orchestration layer. A missing file yields defaults, so a
//! deployment that never writes configuration gets the stock retry policy.
//!
//! # Example
//!
//! ```toml
//! [lock]
//! max_attempts = 10
//! retry_interval_ms = 500
//! ```
//!
//! # Validation
//!
//! Config values are validated after parsing. A retry policy with zero
//! attempts or a zero interval is rejected rather than silently clamped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Retry policy for lock acquisition.
///
/// The defaults reproduce the device coordination policy this crate was
/// built around: ten attempts total, half a second between attempts, no
/// jitter and no exponential growth. Changing these changes how long a
/// fully contended caller waits before reporting failure.
///
/// # Example
///
/// ```
/// use fabricwork::core::config::LockPolicy;
///
/// let policy = LockPolicy::default();
/// assert_eq!(policy.max_attempts, 10);
/// assert_eq!(policy.retry_interval_ms, 500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LockPolicy {
    /// Total number of insert attempts (initial attempt plus retries).
    pub max_attempts: u32,

    /// Wait between attempts, in milliseconds.
    pub retry_interval_ms: u64,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_interval_ms: 500,
        }
    }
}

impl LockPolicy {
    /// The wait between attempts as a [`Duration`].
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Validate the policy values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if either value is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "lock.max_attempts must be at least 1".into(),
            ));
        }
        if self.retry_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "lock.retry_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionConfig {
    /// Lock acquisition policy.
    pub lock: LockPolicy,
}

impl ProvisionConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file is not an error: defaults are returned so callers
    /// without a config file get the stock policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lock.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("fabricwork.toml");
        fs::write(&path, content).expect("write config");
        path
    }

    mod lock_policy {
        use super::*;

        #[test]
        fn defaults_match_stock_policy() {
            let policy = LockPolicy::default();
            assert_eq!(policy.max_attempts, 10);
            assert_eq!(policy.retry_interval_ms, 500);
            assert_eq!(policy.retry_interval(), Duration::from_millis(500));
        }

        #[test]
        fn rejects_zero_attempts() {
            let policy = LockPolicy {
                max_attempts: 0,
                retry_interval_ms: 500,
            };
            assert!(policy.validate().is_err());
        }

        #[test]
        fn rejects_zero_interval() {
            let policy = LockPolicy {
                max_attempts: 10,
                retry_interval_ms: 0,
            };
            assert!(policy.validate().is_err());
        }
    }

    mod provision_config {
        use super::*;

        #[test]
        fn missing_file_yields_defaults() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("does-not-exist.toml");
            let config = ProvisionConfig::load(&path).expect("load");
            assert_eq!(config, ProvisionConfig::default());
        }

        #[test]
        fn loads_lock_table() {
            let dir = TempDir::new().unwrap();
            let path = write_config(
                &dir,
                "[lock]\nmax_attempts = 3\nretry_interval_ms = 100\n",
            );
            let config = ProvisionConfig::load(&path).expect("load");
            assert_eq!(config.lock.max_attempts, 3);
            assert_eq!(config.lock.retry_interval_ms, 100);
        }

        #[test]
        fn partial_table_fills_defaults() {
            let dir = TempDir::new().unwrap();
            let path = write_config(&dir, "[lock]\nmax_attempts = 5\n");
            let config = ProvisionConfig::load(&path).expect("load");
            assert_eq!(config.lock.max_attempts, 5);
            assert_eq!(config.lock.retry_interval_ms, 500);
        }

        #[test]
        fn unknown_field_is_a_parse_error() {
            let dir = TempDir::new().unwrap();
            let path = write_config(&dir, "[lock]\nmax_retries = 5\n");
            let result = ProvisionConfig::load(&path);
            assert!(matches!(result, Err(ConfigError::ParseError { .. })));
        }

        #[test]
        fn invalid_value_fails_validation() {
            let dir = TempDir::new().unwrap();
            let path = write_config(&dir, "[lock]\nmax_attempts = 0\n");
            let result = ProvisionConfig::load(&path);
            assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
        }
    }
}

#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for sigcheck
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/sigcheck/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

use serde::{Deserialize, Serialize};
use sigcheck_errors::{ConfigError, Error};
use sigcheck_hash::{DigestAlgorithm, DEFAULT_CHUNK_SIZE};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Verification configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Manifest file name under the root directory; defaults to
    /// `<algorithm>sum.txt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_filename: Option<String>,
    #[serde(default)]
    pub concurrency: usize, // 0 = auto-detect
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
    #[serde(default)]
    pub timeout_secs: u64, // 0 = no deadline
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            manifest_filename: None,
            concurrency: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            algorithm: DigestAlgorithm::Sha1,
            timeout_secs: 0,
        }
    }
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl VerifyConfig {
    /// Manifest file name, falling back to the algorithm's conventional name
    #[must_use]
    pub fn manifest_filename(&self) -> String {
        self.manifest_filename
            .clone()
            .unwrap_or_else(|| self.algorithm.default_manifest_name())
    }

    /// Worker count with auto-detection resolved
    #[must_use]
    pub fn concurrency(&self) -> usize {
        calculate_concurrency(self.concurrency)
    }

    /// Deadline length, `None` when unbounded
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("sigcheck").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::Unreadable {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let config: Self = toml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value that cannot be parsed.
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        use constants::{ENV_ALGORITHM, ENV_CHUNK_SIZE, ENV_CONCURRENCY, ENV_MANIFEST, ENV_TIMEOUT};

        if let Some(manifest) = lookup(ENV_MANIFEST) {
            self.verify.manifest_filename = Some(manifest);
        }
        if let Some(value) = lookup(ENV_CONCURRENCY) {
            self.verify.concurrency = parse_env(ENV_CONCURRENCY, &value)?;
        }
        if let Some(value) = lookup(ENV_CHUNK_SIZE) {
            self.verify.chunk_size = parse_env(ENV_CHUNK_SIZE, &value)?;
        }
        if let Some(value) = lookup(ENV_ALGORITHM) {
            self.verify.algorithm = DigestAlgorithm::from_str(&value).map_err(|_| {
                ConfigError::InvalidValue {
                    field: ENV_ALGORITHM.to_string(),
                    value,
                }
            })?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT) {
            self.verify.timeout_secs = parse_env(ENV_TIMEOUT, &value)?;
        }

        self.validate()
    }

    /// Validate values that parse but make no sense
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero chunk size or a
    /// manifest file name that does not name a file directly under the root.
    pub fn validate(&self) -> Result<(), Error> {
        if self.verify.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if let Some(name) = &self.verify.manifest_filename {
            validate_manifest_filename(name)?;
        }
        Ok(())
    }
}

/// Check that `name` is a plain file name: not blank, no path separators,
/// not `.` or `..`
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` naming the `manifest_filename` field.
pub fn validate_manifest_filename(name: &str) -> Result<(), Error> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." || name.contains(['/', '\\']) {
        return Err(ConfigError::InvalidValue {
            field: "manifest_filename".to_string(),
            value: name.to_string(),
        }
        .into());
    }
    Ok(())
}

fn parse_env<T: FromStr>(field: &str, value: &str) -> Result<T, Error> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

/// Resolve a configured worker count, 0 meaning host parallelism
#[must_use]
pub fn calculate_concurrency(config_value: usize) -> usize {
    if config_value > 0 {
        config_value // User override
    } else {
        num_cpus::get().max(1)
    }
}

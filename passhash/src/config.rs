//! Configuration loader. A JSON file can pin the algorithm, the salt length
//! and an export path so repeated runs do not need the same flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::crypto::{Algorithm, SALT_LENGTH};

/// Environment variable naming a config file to use when `--config` is absent.
pub const CONFIG_ENV: &str = "RABBIT_PASSHASH_CONFIG";

const MAX_SALT_LENGTH: usize = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("salt length must be between 1 and 64 bytes, got {0}")]
    InvalidSaltLength(usize),
}

fn default_salt_length() -> usize {
    SALT_LENGTH
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HasherConfig {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default = "default_salt_length")]
    pub salt_length: usize,
    /// Where to write results instead of stdout.
    #[serde(default)]
    pub export: Option<PathBuf>,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            salt_length: SALT_LENGTH,
            export: None,
        }
    }
}

impl HasherConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_salt_length(self.salt_length)
    }
}

pub fn validate_salt_length(salt_length: usize) -> Result<(), ConfigError> {
    if salt_length == 0 || salt_length > MAX_SALT_LENGTH {
        return Err(ConfigError::InvalidSaltLength(salt_length));
    }
    Ok(())
}

/// Reads and validates a JSON config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<HasherConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let config: HasherConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    config.validate()?;
    log::debug!(
        "loaded config from {}: algorithm={}, salt_length={}",
        path.as_ref().display(),
        config.algorithm,
        config.salt_length
    );
    Ok(config)
}

/// Loads `explicit` if given, else the file named by [`CONFIG_ENV`], else defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<HasherConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => load_config(PathBuf::from(path)),
        _ => Ok(HasherConfig::default()),
    }
}

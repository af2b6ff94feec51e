//! Config file loading.
//!
//! # Responsibilities
//! - Read and deserialize the TOML config file
//! - Fall back to built-in defaults when no file is given

use std::path::Path;

use thiserror::Error;

use super::schema::ServiceConfig;

/// Failures while loading configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Load config from `path`, or defaults when `path` is `None`.
pub fn load(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ServiceConfig::default());
    };

    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

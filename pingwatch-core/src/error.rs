//! Error types for `pingwatch`

use std::path::PathBuf;

use thiserror::Error;

use crate::probe::ProbeError;
use crate::tracing::TracingError;

/// Top-level error type
#[derive(Debug, Error)]
pub enum PingwatchError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Probe launch error
    #[error(transparent)]
    Probe(#[from] ProbeError),
    /// Logging setup error
    #[error(transparent)]
    Tracing(#[from] TracingError),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for the settings schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration parsed but violates a constraint
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for general operations
pub type PingwatchResult<T> = Result<T, PingwatchError>;

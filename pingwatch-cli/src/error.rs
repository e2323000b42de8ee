//! CLI error types and exit codes.

use pingwatch_core::error::{ConfigError, PingwatchError};
use pingwatch_core::probe::ProbeError;

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, IO
    pub const GENERAL_ERROR: i32 = 1;
    /// Monitoring failure - no probe could be started
    pub const MONITORING_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every probe failed to launch
    #[error("No probe could be started ({failed} failed): {first_error}")]
    AllProbesFailed {
        /// Number of hosts that failed
        failed: usize,
        /// Launch error of the first host
        first_error: String,
    },

    /// Async runtime could not be created
    #[error("Failed to create async runtime: {0}")]
    Runtime(String),

    /// Log setup or other core error
    #[error("{0}")]
    Core(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PingwatchError> for CliError {
    fn from(err: PingwatchError) -> Self {
        match err {
            PingwatchError::Config(e) => e.into(),
            PingwatchError::Probe(ProbeError::NoneStarted {
                failed,
                first_error,
            }) => Self::AllProbesFailed {
                failed,
                first_error,
            },
            PingwatchError::Io(e) => Self::Io(e),
            other => Self::Core(other.to_string()),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, IO)
    /// - 2: Monitoring failure (no probe started)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::AllProbesFailed { .. } => exit_codes::MONITORING_FAILURE,
            Self::Config(_) | Self::Runtime(_) | Self::Core(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}

//! Probe processes and their output streams
//!
//! A probe is one long-running `ping` process per host. This module starts
//! it and exposes its stdout as raw byte chunks; parsing happens in
//! [`crate::monitoring`].

mod command;
mod stream;

pub use command::{ProbeSettings, build_probe_command};
pub use stream::{ChunkStream, ProbeChunk, ProbeStream, ReadOutcome};

use thiserror::Error;

/// Errors that can occur while starting a probe
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe process could not be spawned
    #[error("Failed to launch probe for '{host}': {reason}")]
    Launch {
        /// Target host
        host: String,
        /// Underlying spawn error
        reason: String,
    },
    /// The process started but its stdout was not captured
    #[error("Probe for '{host}' has no readable output")]
    MissingStdout {
        /// Target host
        host: String,
    },
    /// No host's probe could be started
    #[error("No probe could be started ({failed} failed): {first_error}")]
    NoneStarted {
        /// Number of hosts that failed
        failed: usize,
        /// Launch error of the first host
        first_error: String,
    },
}

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

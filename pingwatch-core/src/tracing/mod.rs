//! Structured logging setup
//!
//! Stdout belongs to the dashboard, so log records go to stderr or a file.
//! The CLI maps `-v`/`-q` to a [`TracingLevel`]; `RUST_LOG` style filters
//! can be passed through [`TracingConfig::with_filter`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Set once a subscriber has been installed
static TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Errors that can occur while installing the subscriber
#[derive(Debug, Error)]
pub enum TracingError {
    /// The filter directive or subscriber was rejected
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// A subscriber is already installed
    #[error("Logging has already been initialized")]
    AlreadyInitialized,

    /// The log file could not be created
    #[error("Failed to create log file {path}: {reason}")]
    FileCreationFailed {
        /// Requested log file
        path: PathBuf,
        /// Underlying IO error
        reason: String,
    },
}

/// Result type for logging setup
pub type TracingResult<T> = Result<T, TracingError>;

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings (default: keeps the dashboard clean)
    #[default]
    Warn,
    /// Probe lifecycle events
    Info,
    /// Per-tick and config details
    Debug,
    /// Every chunk and unrecognised line
    Trace,
}

impl TracingLevel {
    /// Converts to the `tracing` crate's level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Maps repeated `-v` flags and `-q` to a level
    #[must_use]
    pub const fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Error;
        }
        match verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl std::str::FromStr for TracingLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Where log records are written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard error
    #[default]
    Stderr,
    /// A file, truncated on start
    File {
        /// Path to the log file
        path: PathBuf,
    },
}

/// Subscriber configuration
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Log level for this application's crates
    pub level: TracingLevel,
    /// Output destination
    pub output: TracingOutput,
    /// Custom filter directive (overrides `level` if set)
    pub filter: Option<String>,
    /// Disable ANSI colours on stderr
    pub no_color: bool,
}

impl TracingConfig {
    /// Creates a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the output destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Sets a custom filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Disables ANSI colours
    #[must_use]
    pub const fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Filter directive used when no custom filter is set
    #[must_use]
    pub fn default_directive(&self) -> String {
        format!("pingwatch={0},pingwatch_core={0}", self.level)
    }

    fn env_filter(&self) -> TracingResult<EnvFilter> {
        let directive = self
            .filter
            .clone()
            .unwrap_or_else(|| self.default_directive());
        EnvFilter::try_new(&directive)
            .map_err(|e| TracingError::InitializationFailed(format!("{directive}: {e}")))
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed, the filter is
/// invalid, or the log file cannot be created.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if TRACING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }

    let filter = config.env_filter()?;

    match &config.output {
        TracingOutput::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(!config.no_color)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| TracingError::InitializationFailed(e.to_string()))?;
        }
        TracingOutput::File { path } => {
            let file =
                std::fs::File::create(path).map_err(|e| TracingError::FileCreationFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_ansi(false)
                        .with_writer(std::sync::Mutex::new(file)),
                )
                .try_init()
                .map_err(|e| TracingError::InitializationFailed(e.to_string()))?;
        }
    }

    tracing::debug!(level = %config.level, "Logging initialized");
    Ok(())
}

/// Checks if a subscriber has been installed
#[must_use]
pub fn is_tracing_initialized() -> bool {
    TRACING_INITIALIZED.load(Ordering::SeqCst)
}

/// Span names used across the crate
pub mod span_names {
    /// Loading the config file
    pub const CONFIG_LOAD: &str = "config.load";
    /// One aggregation tick
    pub const SCHEDULER_TICK: &str = "scheduler.tick";
    /// Replaying a captured log
    pub const REPLAY: &str = "replay";
}

//! `pingwatch` core library
//!
//! Runs one long-lived `ping` process per host, multiplexes their output on
//! a single task, and keeps rolling-window latency statistics (min, median,
//! p95, max, miss rate) per host.
//!
//! # Crate Structure
//!
//! - [`probe`] - Probe process launch and output streams
//! - [`monitoring`] - Line parsing, sample series, window statistics, scheduler
//! - [`dashboard`] - Snapshot model and the rendering seam
//! - [`config`] - Config file loading
//! - [`tracing`] - Logging setup

#![warn(missing_docs)]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod monitoring;
pub mod probe;
pub mod tracing;

pub use config::{default_config_path, load_or_default, load_settings};
pub use dashboard::{Dashboard, HostSnapshot, RecordingDashboard, Snapshot, format_window_cell};
pub use error::{ConfigError, ConfigResult, PingwatchError, PingwatchResult};
pub use monitoring::{
    HostMonitor, HostSeries, MonitorConfig, MonitorSettings, Sample, SampleKind, SampleParser,
    Scheduler, WindowMetrics, WindowReport, WindowSpec, unix_now, watch,
};
pub use probe::{ProbeError, ProbeResult, ProbeSettings, ProbeStream, ReadOutcome};
pub use tracing::{TracingConfig, TracingError, TracingLevel, TracingOutput, init_tracing};

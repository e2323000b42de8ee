//! Shared helpers for command modules.

use std::path::Path;

use pingwatch_core::config::load_or_default;
use pingwatch_core::monitoring::{MonitorSettings, WindowSpec};
use pingwatch_core::tracing::{TracingConfig, TracingLevel, TracingOutput, init_tracing};

use crate::cli::Cli;
use crate::error::CliError;

/// Environment variable holding a custom log filter directive
pub const LOG_FILTER_ENV: &str = "PINGWATCH_LOG";

/// Parses a window length for clap (`30`, `30s`, `5m`, `1h`)
pub fn parse_window(s: &str) -> Result<WindowSpec, String> {
    s.parse::<WindowSpec>().map_err(|e| e.to_string())
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct SettingsOverrides<'a> {
    /// Extra hosts appended after the configured ones
    pub hosts: &'a [String],
    /// Replaces the configured windows when non-empty
    pub windows: &'a [WindowSpec],
    /// Refresh interval in milliseconds
    pub refresh_ms: Option<u64>,
    /// Readiness wait timeout in milliseconds
    pub wait_timeout_ms: Option<u64>,
    /// Seconds between echo requests
    pub interval_secs: Option<f64>,
}

impl SettingsOverrides<'_> {
    /// Applies the overrides on top of `settings`
    pub fn apply(&self, settings: &mut MonitorSettings) {
        for host in self.hosts {
            if !settings.hosts.contains(host) {
                settings.hosts.push(host.clone());
            }
        }
        if !self.windows.is_empty() {
            settings.windows = self.windows.to_vec();
        }
        if let Some(ms) = self.refresh_ms {
            settings.refresh_ms = ms;
        }
        if let Some(ms) = self.wait_timeout_ms {
            settings.wait_timeout_ms = ms;
        }
        if let Some(secs) = self.interval_secs {
            settings.probe.interval_secs = secs;
        }
    }
}

/// Loads the config file (or defaults) and applies command-line overrides
pub fn load_settings(
    config_path: Option<&Path>,
    overrides: &SettingsOverrides<'_>,
) -> Result<MonitorSettings, CliError> {
    let mut settings = load_or_default(config_path)?;
    overrides.apply(&mut settings);
    Ok(settings)
}

/// Installs the log subscriber according to the global flags.
///
/// Failure is reported on stderr and does not stop the command.
pub fn init_logging(cli: &Cli) {
    let mut config = TracingConfig::new()
        .with_level(TracingLevel::from_verbosity(cli.verbose, cli.quiet))
        .with_no_color(cli.no_color);
    if let Some(path) = &cli.log_file {
        config = config.with_output(TracingOutput::File { path: path.clone() });
    }
    if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
        config = config.with_filter(filter);
    }
    if let Err(e) = init_tracing(&config) {
        eprintln!("Warning: {e}");
    }
}

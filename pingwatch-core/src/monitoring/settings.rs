//! Monitoring settings
//!
//! [`MonitorSettings`] is the raw, serde-facing form (config file and CLI
//! overrides). [`MonitorConfig`] is the validated, immutable value the
//! scheduler is built from.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::probe::ProbeSettings;

use super::metrics::WindowSpec;

/// Raw monitoring settings (stored in `config.toml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Hosts to probe
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
    /// Window lengths in seconds, in display order (default: 10, 60, 600)
    #[serde(default = "WindowSpec::defaults")]
    pub windows: Vec<WindowSpec>,
    /// Dashboard refresh interval in milliseconds (100–60000, default: 1000)
    #[serde(default = "default_refresh_ms")]
    pub refresh_ms: u64,
    /// Upper bound for one readiness wait in milliseconds (10–60000, default: 1000)
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
    /// Maximum bytes pulled per read (256–1048576, default: 4096)
    #[serde(default = "default_read_chunk_bytes")]
    pub read_chunk_bytes: usize,
    /// Probe process settings
    #[serde(default)]
    pub probe: ProbeSettings,
}

const fn default_refresh_ms() -> u64 {
    1000
}

const fn default_wait_timeout_ms() -> u64 {
    1000
}

const fn default_read_chunk_bytes() -> usize {
    4096
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            windows: WindowSpec::defaults(),
            refresh_ms: default_refresh_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
            read_chunk_bytes: default_read_chunk_bytes(),
            probe: ProbeSettings::default(),
        }
    }
}

impl MonitorSettings {
    /// Parses settings from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid for the schema.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Returns the refresh interval clamped to 100 ms–60 s
    #[must_use]
    pub fn effective_refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.clamp(100, 60_000))
    }

    /// Returns the readiness wait timeout clamped to 10 ms–60 s
    #[must_use]
    pub fn effective_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms.clamp(10, 60_000))
    }

    /// Returns the read size clamped to 256 B–1 MiB
    #[must_use]
    pub fn effective_read_chunk_bytes(&self) -> usize {
        self.read_chunk_bytes.clamp(256, 1024 * 1024)
    }

    /// Checks the window list: non-empty, positive finite lengths, no duplicates
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate_windows(&self) -> ConfigResult<()> {
        if self.windows.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one window is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for window in &self.windows {
            let secs = window.secs();
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "window length must be a positive number of seconds, got {secs}"
                )));
            }
            if !seen.insert(secs.to_bits()) {
                return Err(ConfigError::Invalid(format!("duplicate window {window}")));
            }
        }
        Ok(())
    }

    /// Checks the host list: non-empty, no blank or repeated hosts
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first violation.
    pub fn validate_hosts(&self) -> ConfigResult<()> {
        if self.hosts.is_empty() {
            return Err(ConfigError::Invalid("no hosts to monitor".into()));
        }
        let mut seen = HashSet::new();
        for host in &self.hosts {
            if host.trim().is_empty() {
                return Err(ConfigError::Invalid("host name must not be empty".into()));
            }
            if !seen.insert(host.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate host '{host}'")));
            }
        }
        Ok(())
    }
}

/// Validated, immutable configuration handed to the scheduler
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Hosts in display order
    pub hosts: Vec<String>,
    /// Windows in display order
    pub windows: Vec<WindowSpec>,
    /// Minimum time between two aggregation ticks
    pub refresh_interval: Duration,
    /// Upper bound for one readiness wait
    pub wait_timeout: Duration,
    /// Maximum bytes pulled per read
    pub read_chunk_bytes: usize,
    /// Probe process settings
    pub probe: ProbeSettings,
}

impl TryFrom<MonitorSettings> for MonitorConfig {
    type Error = ConfigError;

    fn try_from(settings: MonitorSettings) -> ConfigResult<Self> {
        settings.validate_hosts()?;
        settings.validate_windows()?;
        Ok(Self {
            refresh_interval: settings.effective_refresh(),
            wait_timeout: settings.effective_wait_timeout(),
            read_chunk_bytes: settings.effective_read_chunk_bytes(),
            hosts: settings.hosts,
            windows: settings.windows,
            probe: settings.probe,
        })
    }
}

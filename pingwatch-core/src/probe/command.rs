//! Probe command construction
//!
//! Builds the `ping` invocation for a host. Output must carry unix
//! timestamps (`-D`) and report unanswered requests (`-O`) so the parser
//! sees both hits and misses.

use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

/// How probe processes are started (stored under `[probe]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Probe executable (default: `ping`)
    #[serde(default = "default_program")]
    pub program: String,
    /// Seconds between echo requests (0.2–60, default: 1)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,
    /// Extra arguments inserted before the host
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

fn default_program() -> String {
    "ping".to_string()
}

const fn default_interval_secs() -> f64 {
    1.0
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            interval_secs: default_interval_secs(),
            extra_args: Vec::new(),
        }
    }
}

impl ProbeSettings {
    /// Returns the interval clamped to what unprivileged `ping` accepts
    #[must_use]
    pub fn effective_interval_secs(&self) -> f64 {
        if self.interval_secs.is_finite() {
            self.interval_secs.clamp(0.2, 60.0)
        } else {
            default_interval_secs()
        }
    }

    /// Full argument list for probing `host`
    #[must_use]
    pub fn args_for(&self, host: &str) -> Vec<String> {
        let mut args = vec![
            "-D".to_string(),
            "-O".to_string(),
            "-n".to_string(),
            "-i".to_string(),
            self.effective_interval_secs().to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args.push(host.to_string());
        args
    }
}

/// Builds the probe command for `host`.
///
/// Stdout is piped for parsing, stderr is discarded and the process is
/// killed when the handle is dropped.
#[must_use]
pub fn build_probe_command(settings: &ProbeSettings, host: &str) -> Command {
    let mut cmd = Command::new(&settings.program);
    cmd.args(settings.args_for(host))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    cmd
}

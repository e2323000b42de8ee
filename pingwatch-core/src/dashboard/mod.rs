//! Dashboard boundary
//!
//! The scheduler hands a complete [`Snapshot`] to a [`Dashboard`] after
//! every aggregation tick. Rendering (terminal table, JSON lines, ...) lives
//! with the consumer; this module only defines the data and the seam.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::monitoring::{WindowMetrics, WindowReport, WindowSpec, format_latency};

/// Per-host view for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    /// Target host name or address
    pub host: String,
    /// Probe stream closed or never started
    pub dead: bool,
    /// Launch failure message, if the probe never started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Short label of the most recent sample (`12.3ms`, `miss`)
    pub last_label: Option<String>,
    /// Retained samples after eviction
    pub samples: usize,
    /// Statistics per configured window, in configured order
    pub windows: Vec<WindowReport>,
}

impl HostSnapshot {
    /// Statistics for `window`, `None` if not configured or no data yet
    #[must_use]
    pub fn metrics_for(&self, window: WindowSpec) -> Option<&WindowMetrics> {
        self.windows
            .iter()
            .find(|r| r.window == window)
            .and_then(|r| r.metrics.as_ref())
    }

    /// Status text for the dashboard's state column
    #[must_use]
    pub fn status_display(&self) -> &str {
        if self.error.is_some() {
            "failed"
        } else if self.dead {
            "closed"
        } else {
            self.last_label.as_deref().unwrap_or("-")
        }
    }
}

/// A complete, consistent recomputation of every host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The `now` used for windowing (fractional unix seconds)
    pub taken_at: f64,
    /// Hosts in configured order
    pub hosts: Vec<HostSnapshot>,
}

impl Snapshot {
    /// `taken_at` as a UTC timestamp
    #[must_use]
    pub fn taken_at_utc(&self) -> Option<DateTime<Utc>> {
        let micros = (self.taken_at * 1_000_000.0).round() as i64;
        DateTime::from_timestamp_micros(micros)
    }

    /// Number of hosts still being probed
    #[must_use]
    pub fn live_hosts(&self) -> usize {
        self.hosts.iter().filter(|h| !h.dead).count()
    }

    /// Looks up a host by name
    #[must_use]
    pub fn host(&self, host: &str) -> Option<&HostSnapshot> {
        self.hosts.iter().find(|h| h.host == host)
    }
}

/// Consumer of per-tick snapshots
pub trait Dashboard {
    /// Renders one snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render(&mut self, snapshot: &Snapshot) -> std::io::Result<()>;
}

/// Dashboard that keeps every snapshot in memory
#[derive(Debug, Default)]
pub struct RecordingDashboard {
    /// Snapshots in render order
    pub snapshots: Vec<Snapshot>,
}

impl Dashboard for RecordingDashboard {
    fn render(&mut self, snapshot: &Snapshot) -> std::io::Result<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}

/// Formats one window cell as `min/p50/p95/max loss%`, or `-` without data
#[must_use]
pub fn format_window_cell(metrics: Option<&WindowMetrics>) -> String {
    match metrics {
        Some(m) => format!(
            "{}/{}/{}/{} {:.1}%",
            format_latency(m.min_ms),
            format_latency(m.p50_ms),
            format_latency(m.p95_ms),
            format_latency(m.max_ms),
            m.miss_percent
        ),
        None => "-".to_string(),
    }
}

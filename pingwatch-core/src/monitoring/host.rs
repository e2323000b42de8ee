//! Runtime state of one monitored host
//!
//! Bundles the streaming parser, the sample series and the status flags the
//! dashboard shows. Owned and mutated only by the scheduler loop.

use crate::dashboard::HostSnapshot;

use super::metrics::{WindowReport, WindowSpec};
use super::parser::SampleParser;
use super::series::{HostSeries, RecordOutcome};

/// Parser, series and status of a single host
#[derive(Debug)]
pub struct HostMonitor {
    host: String,
    parser: SampleParser,
    series: HostSeries,
    dead: bool,
    error: Option<String>,
    last_label: Option<String>,
    reports: Vec<WindowReport>,
}

impl HostMonitor {
    /// Creates the state for a host whose probe is running
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            parser: SampleParser::new(),
            series: HostSeries::new(),
            dead: false,
            error: None,
            last_label: None,
            reports: Vec::new(),
        }
    }

    /// Creates the state for a host whose probe could not be started
    #[must_use]
    pub fn failed(host: impl Into<String>, error: impl Into<String>) -> Self {
        let mut monitor = Self::new(host);
        monitor.dead = true;
        monitor.error = Some(error.into());
        monitor
    }

    /// Feeds raw probe output and records every completed sample.
    ///
    /// Returns the number of samples recorded. The last-sample label is
    /// updated per sample, independent of the aggregation tick.
    pub fn ingest(&mut self, bytes: &[u8]) -> usize {
        let mut recorded = 0;
        for sample in self.parser.feed(bytes) {
            if self.series.record(sample) == RecordOutcome::Replaced {
                tracing::debug!(
                    host = %self.host,
                    timestamp = sample.timestamp,
                    "Duplicate sample timestamp, keeping the latest"
                );
            }
            self.last_label = Some(sample.label());
            recorded += 1;
        }
        recorded
    }

    /// Recomputes window statistics at `now` and caches the result
    pub fn recompute(&mut self, now: f64, windows: &[WindowSpec]) -> &[WindowReport] {
        self.reports = self.series.recompute(now, windows);
        &self.reports
    }

    /// Marks the probe stream as closed and releases the sample history.
    ///
    /// The last-sample label is kept so the dashboard can still show what
    /// the host did last.
    pub fn mark_dead(&mut self) {
        if !self.dead {
            tracing::info!(
                host = %self.host,
                retained = self.series.len(),
                pending_bytes = self.parser.pending(),
                "Probe stream closed"
            );
        }
        self.dead = true;
        self.parser.reset();
        self.series = HostSeries::new();
        self.reports.clear();
    }

    /// Builds the dashboard view from the latest recomputation
    #[must_use]
    pub fn snapshot(&self) -> HostSnapshot {
        HostSnapshot {
            host: self.host.clone(),
            dead: self.dead,
            error: self.error.clone(),
            last_label: self.last_label.clone(),
            samples: self.series.len(),
            windows: self.reports.clone(),
        }
    }

    /// Target host name or address
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true once the probe stream has closed or failed to launch
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }

    /// Launch error, if the probe never started
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Label of the most recent sample, if any
    #[must_use]
    pub fn last_label(&self) -> Option<&str> {
        self.last_label.as_deref()
    }

    /// The host's sample history
    #[must_use]
    pub const fn series(&self) -> &HostSeries {
        &self.series
    }
}

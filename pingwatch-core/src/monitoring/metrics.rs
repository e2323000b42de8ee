//! Data models for probe samples and windowed latency statistics
//!
//! All types are renderer-free and serializable so a dashboard can consume
//! them directly (terminal table, JSON lines, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Label shown for the most recent sample when it was a miss
pub const MISS_LABEL: &str = "miss";

/// Outcome of a single probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleKind {
    /// The host replied; latency in milliseconds
    Hit {
        /// Round-trip time in milliseconds
        latency_ms: f64,
    },
    /// No reply arrived in time
    Miss,
}

/// A single timestamped probe result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Fractional unix time reported by the probe (seconds)
    pub timestamp: f64,
    /// Hit or miss
    #[serde(flatten)]
    pub kind: SampleKind,
}

impl Sample {
    /// Creates a hit sample
    #[must_use]
    pub const fn hit(timestamp: f64, latency_ms: f64) -> Self {
        Self {
            timestamp,
            kind: SampleKind::Hit { latency_ms },
        }
    }

    /// Creates a miss sample
    #[must_use]
    pub const fn miss(timestamp: f64) -> Self {
        Self {
            timestamp,
            kind: SampleKind::Miss,
        }
    }

    /// Returns the latency for hits, `None` for misses
    #[must_use]
    pub const fn latency_ms(&self) -> Option<f64> {
        match self.kind {
            SampleKind::Hit { latency_ms } => Some(latency_ms),
            SampleKind::Miss => None,
        }
    }

    /// Returns true if this sample is a miss
    #[must_use]
    pub const fn is_miss(&self) -> bool {
        matches!(self.kind, SampleKind::Miss)
    }

    /// Returns true if `other` is the same kind of sample (hit vs miss)
    #[must_use]
    pub const fn same_kind(&self, other: &Self) -> bool {
        self.is_miss() == other.is_miss()
    }

    /// Short status label for the "current" dashboard column
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            SampleKind::Hit { latency_ms } => format_latency(latency_ms),
            SampleKind::Miss => MISS_LABEL.to_string(),
        }
    }
}

/// A trailing time window `[now - duration, now]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowSpec {
    secs: f64,
}

impl WindowSpec {
    /// Creates a window of the given length in seconds
    #[must_use]
    pub const fn from_secs(secs: f64) -> Self {
        Self { secs }
    }

    /// Window length in seconds
    #[must_use]
    pub const fn secs(self) -> f64 {
        self.secs
    }

    /// Oldest timestamp still inside the window at `now`
    #[must_use]
    pub fn cutoff(self, now: f64) -> f64 {
        now - self.secs
    }

    /// Returns true if a sample taken at `timestamp` falls inside the window
    #[must_use]
    pub fn contains(self, timestamp: f64, now: f64) -> bool {
        timestamp >= self.cutoff(now)
    }

    /// Default windows: 10 seconds, 1 minute, 10 minutes
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::from_secs(10.0), Self::from_secs(60.0), Self::from_secs(600.0)]
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.secs;
        if secs.fract() != 0.0 {
            write!(f, "{secs}s")
        } else if secs >= 3600.0 && secs % 3600.0 == 0.0 {
            write!(f, "{}h", secs / 3600.0)
        } else if secs >= 60.0 && secs % 60.0 == 0.0 {
            write!(f, "{}m", secs / 60.0)
        } else {
            write!(f, "{secs}s")
        }
    }
}

impl FromStr for WindowSpec {
    type Err = ConfigError;

    /// Parses `30`, `30s`, `2.5s`, `5m` or `1h`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, scale) = match s.char_indices().last() {
            Some((i, 's')) => (&s[..i], 1.0),
            Some((i, 'm')) => (&s[..i], 60.0),
            Some((i, 'h')) => (&s[..i], 3600.0),
            _ => (s, 1.0),
        };
        let value: f64 = number
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid window length '{s}'")))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "window length must be positive, got '{s}'"
            )));
        }
        Ok(Self::from_secs(value * scale))
    }
}

/// Latency and loss statistics for one window
///
/// Only produced when the window holds at least one hit; a window with
/// misses but no hits has no meaningful latency figures yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    /// Fastest reply (ms)
    pub min_ms: f64,
    /// Slowest reply (ms)
    pub max_ms: f64,
    /// Nearest-rank median (ms)
    pub p50_ms: f64,
    /// Nearest-rank 95th percentile (ms)
    pub p95_ms: f64,
    /// Number of hits in the window
    pub hit_count: usize,
    /// Number of misses in the window
    pub miss_count: usize,
    /// `miss_count / (hit_count + miss_count) * 100`
    pub miss_percent: f64,
}

impl WindowMetrics {
    /// Computes statistics from the window's latencies and miss count.
    ///
    /// Returns `None` when `latencies` is empty. The slice is sorted in
    /// place.
    #[must_use]
    pub fn from_latencies(latencies: &mut [f64], miss_count: usize) -> Option<Self> {
        if latencies.is_empty() {
            return None;
        }
        latencies.sort_by(f64::total_cmp);

        let hit_count = latencies.len();
        let total = hit_count + miss_count;

        Some(Self {
            min_ms: latencies[0],
            max_ms: latencies[hit_count - 1],
            p50_ms: nearest_rank(latencies, 50.0)?,
            p95_ms: nearest_rank(latencies, 95.0)?,
            hit_count,
            miss_count,
            miss_percent: miss_count as f64 / total as f64 * 100.0,
        })
    }
}

/// Statistics for one configured window, absent while there is no hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    /// The window these figures describe
    pub window: WindowSpec,
    /// `None` means insufficient data
    pub metrics: Option<WindowMetrics>,
}

/// Nearest-rank percentile over an ascending slice.
///
/// Index is `floor(percentile / 100 * len)` clamped to the last element;
/// no interpolation between ranks.
#[must_use]
pub fn nearest_rank(sorted: &[f64], percentile: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = (percentile / 100.0 * sorted.len() as f64).floor();
    let index = if rank <= 0.0 {
        0
    } else {
        (rank as usize).min(last)
    };
    Some(sorted[index])
}

/// Formats a latency for display, e.g. `12.3ms`
#[must_use]
pub fn format_latency(latency_ms: f64) -> String {
    if latency_ms >= 100.0 {
        format!("{latency_ms:.0}ms")
    } else {
        format!("{latency_ms:.1}ms")
    }
}

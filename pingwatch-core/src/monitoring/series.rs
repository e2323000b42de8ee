//! Per-host sample history with sliding-window aggregation
//!
//! Samples are kept in arrival order in a single vector. An eviction cursor
//! marks the first live entry; everything before it has aged out of the
//! largest configured window. The dead prefix is compacted away once it
//! dominates the vector.

use super::metrics::{Sample, WindowMetrics, WindowReport, WindowSpec};

/// Minimum dead prefix length before compaction is considered
const COMPACT_THRESHOLD: usize = 256;

/// What [`HostSeries::record`] did with a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Appended as a new entry
    Appended,
    /// Overwrote an earlier sample of the same kind and timestamp
    Replaced,
}

/// Insertion-ordered hit/miss history of one host
#[derive(Debug, Clone, Default)]
pub struct HostSeries {
    entries: Vec<Sample>,
    head: usize,
}

impl HostSeries {
    /// Creates an empty series
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            head: 0,
        }
    }

    /// Records a sample.
    ///
    /// A sample with the same timestamp and kind as a retained entry
    /// replaces it (last write wins). Only the tail with timestamps at or
    /// after the new one is searched, which is where duplicates land when
    /// arrival order is non-decreasing.
    // Timestamps come from identical probe text, exact match is intended
    #[allow(clippy::float_cmp)]
    pub fn record(&mut self, sample: Sample) -> RecordOutcome {
        for entry in self.entries[self.head..].iter_mut().rev() {
            if entry.timestamp < sample.timestamp {
                break;
            }
            if entry.timestamp == sample.timestamp && entry.same_kind(&sample) {
                *entry = sample;
                return RecordOutcome::Replaced;
            }
        }
        self.entries.push(sample);
        RecordOutcome::Appended
    }

    /// Drops the oldest entries that fall outside every window.
    ///
    /// Walks forward from the cursor and stops at the first entry still
    /// inside `largest`, so the retained entries are always a contiguous
    /// suffix of arrival order. Returns the number of evicted entries.
    pub fn evict(&mut self, now: f64, largest: WindowSpec) -> usize {
        let cutoff = largest.cutoff(now);
        let live = &self.entries[self.head..];
        let stale = live
            .iter()
            .position(|s| s.timestamp >= cutoff)
            .unwrap_or(live.len());
        self.head += stale;
        self.compact();
        stale
    }

    /// Evicts stale samples and computes statistics for every window.
    ///
    /// Reports are returned in the order of `windows`. A window without any
    /// hit reports `None` even if it contains misses.
    pub fn recompute(&mut self, now: f64, windows: &[WindowSpec]) -> Vec<WindowReport> {
        let Some(largest) = windows.iter().copied().reduce(|a, b| {
            if b.secs() > a.secs() { b } else { a }
        }) else {
            return Vec::new();
        };

        let evicted = self.evict(now, largest);
        if evicted > 0 {
            tracing::trace!(evicted, retained = self.len(), "Evicted stale samples");
        }

        let live = self.live();
        windows
            .iter()
            .map(|&window| {
                let mut latencies = Vec::new();
                let mut misses = 0;
                for sample in live.iter().filter(|s| window.contains(s.timestamp, now)) {
                    match sample.latency_ms() {
                        Some(latency) => latencies.push(latency),
                        None => misses += 1,
                    }
                }
                WindowReport {
                    window,
                    metrics: WindowMetrics::from_latencies(&mut latencies, misses),
                }
            })
            .collect()
    }

    /// Retained samples in arrival order
    #[must_use]
    pub fn live(&self) -> &[Sample] {
        &self.entries[self.head..]
    }

    /// Number of retained samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len() - self.head
    }

    /// Returns true if no samples are retained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of retained hits
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.live().iter().filter(|s| !s.is_miss()).count()
    }

    /// Number of retained misses
    #[must_use]
    pub fn miss_count(&self) -> usize {
        self.live().iter().filter(|s| s.is_miss()).count()
    }

    /// Most recently recorded sample
    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.live().last()
    }

    fn compact(&mut self) {
        if self.head >= COMPACT_THRESHOLD && self.head * 2 >= self.entries.len() {
            self.entries.drain(..self.head);
            self.head = 0;
        }
    }
}

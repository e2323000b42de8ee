//! Latency monitoring
//!
//! Turns raw probe output into per-host sample series and rolling-window
//! statistics:
//!
//! - [`SampleParser`] splits byte chunks into lines and recognises reply
//!   and timeout lines
//! - [`HostSeries`] keeps samples in arrival order and evicts the oldest
//!   prefix once it falls outside the largest window
//! - [`Scheduler`] multiplexes all probe streams on one task and ticks the
//!   dashboard
//! - [`replay`] runs a captured log through the same parser offline

mod host;
mod metrics;
mod parser;
mod replay;
mod scheduler;
mod series;
mod settings;

pub use host::HostMonitor;
pub use metrics::{
    MISS_LABEL, Sample, SampleKind, WindowMetrics, WindowReport, WindowSpec, format_latency,
    nearest_rank,
};
pub use parser::{MAX_PENDING_BYTES, SampleParser, Samples};
pub use replay::replay;
pub use scheduler::{MAX_DRAIN_PER_WAKE, Scheduler, unix_now, watch};
pub use series::{HostSeries, RecordOutcome};
pub use settings::{MonitorConfig, MonitorSettings};

//! Single-threaded multiplexing loop
//!
//! One [`Scheduler`] owns every host. Each iteration waits (bounded by the
//! wait timeout) until at least one probe stream is readable, drains every
//! stream that is ready, and at most once per refresh interval recomputes
//! all live hosts and hands a [`Snapshot`] to the dashboard.
//!
//! Nothing here spawns tasks; the probes are read as a
//! [`SelectAll`] of per-host chunk streams polled from the current task.

use std::future::Future;
use std::time::Instant;

use futures::stream::SelectAll;
use futures::{FutureExt, StreamExt};

use crate::dashboard::{Dashboard, Snapshot};
use crate::error::PingwatchResult;
use crate::probe::{ChunkStream, ProbeChunk, ProbeError, ProbeStream, ReadOutcome};

use super::host::HostMonitor;
use super::settings::MonitorConfig;

/// Upper bound on chunks handled after one wake-up before the loop gets a
/// chance to tick again
pub const MAX_DRAIN_PER_WAKE: usize = 256;

/// Current wall-clock time as fractional unix seconds
#[must_use]
pub fn unix_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Launches probes for every configured host and runs until `shutdown`.
///
/// # Errors
///
/// Returns [`ProbeError::NoneStarted`] if not a single probe could be
/// started, or the dashboard's IO error.
pub async fn watch<D, F>(
    config: MonitorConfig,
    dashboard: &mut D,
    shutdown: F,
) -> PingwatchResult<()>
where
    D: Dashboard + ?Sized,
    F: Future<Output = ()>,
{
    let mut scheduler = Scheduler::launch(config);
    if scheduler.live_hosts() == 0 {
        let first_error = scheduler
            .hosts()
            .iter()
            .find_map(HostMonitor::error)
            .unwrap_or("no hosts configured")
            .to_string();
        return Err(ProbeError::NoneStarted {
            failed: scheduler.hosts().len(),
            first_error,
        }
        .into());
    }
    scheduler.run(dashboard, shutdown).await?;
    Ok(())
}

/// Owns all host state and drives the wait/drain/aggregate cycle
pub struct Scheduler {
    config: MonitorConfig,
    hosts: Vec<HostMonitor>,
    streams: SelectAll<ChunkStream>,
    last_tick: Option<Instant>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("hosts", &self.hosts)
            .field("open_streams", &self.streams.len())
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Creates a scheduler with no hosts attached
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            hosts: Vec::new(),
            streams: SelectAll::new(),
            last_tick: None,
        }
    }

    /// Starts one probe per configured host.
    ///
    /// Hosts whose probe cannot be started are kept as dead entries carrying
    /// the launch error, so the dashboard can show them.
    #[must_use]
    pub fn launch(config: MonitorConfig) -> Self {
        let hosts = config.hosts.clone();
        let mut scheduler = Self::new(config);
        for host in hosts {
            match ProbeStream::open(&host, &scheduler.config.probe) {
                Ok(stream) => {
                    scheduler.attach(stream);
                }
                Err(e) => scheduler.attach_failed(&host, &e),
            }
        }
        scheduler
    }

    /// Registers a running probe stream and returns its host index
    pub fn attach(&mut self, stream: ProbeStream) -> usize {
        let id = self.hosts.len();
        self.hosts.push(HostMonitor::new(stream.host()));
        self.streams
            .push(stream.into_chunks(id, self.config.read_chunk_bytes));
        id
    }

    /// Registers a host whose probe could not be started
    pub fn attach_failed(&mut self, host: &str, error: &ProbeError) {
        tracing::warn!(host = %host, error = %error, "Probe failed to start");
        self.hosts.push(HostMonitor::failed(host, error.to_string()));
    }

    /// Waits for readable streams and consumes everything that is ready.
    ///
    /// Returns the number of chunks handled; zero means the wait timed out
    /// (or there was nothing left to wait on, in which case the call sleeps
    /// for the wait timeout instead of spinning).
    pub async fn poll_ready(&mut self) -> usize {
        if self.streams.is_empty() {
            tokio::time::sleep(self.config.wait_timeout).await;
            return 0;
        }

        let first = match tokio::time::timeout(self.config.wait_timeout, self.streams.next()).await
        {
            Ok(Some(chunk)) => chunk,
            Ok(None) | Err(_) => return 0,
        };
        self.handle_chunk(first);

        let mut handled = 1;
        while handled < MAX_DRAIN_PER_WAKE {
            match self.streams.next().now_or_never() {
                Some(Some(chunk)) => {
                    self.handle_chunk(chunk);
                    handled += 1;
                }
                Some(None) | None => break,
            }
        }
        handled
    }

    fn handle_chunk(&mut self, chunk: ProbeChunk) {
        let Some(host) = self.hosts.get_mut(chunk.id) else {
            tracing::warn!(id = chunk.id, "Chunk for unknown host");
            return;
        };
        match chunk.outcome {
            ReadOutcome::Data(bytes) => {
                let recorded = host.ingest(&bytes);
                tracing::trace!(
                    host = %host.host(),
                    bytes = bytes.len(),
                    samples = recorded,
                    "Probe output consumed"
                );
            }
            ReadOutcome::Closed => host.mark_dead(),
        }
    }

    /// Recomputes every live host at `now` and returns the full snapshot
    pub fn tick_at(&mut self, now: f64) -> Snapshot {
        let _span = tracing::debug_span!(
            crate::tracing::span_names::SCHEDULER_TICK,
            hosts = self.hosts.len()
        )
        .entered();
        let windows = &self.config.windows;
        for host in self.hosts.iter_mut().filter(|h| !h.is_dead()) {
            host.recompute(now, windows);
        }
        Snapshot {
            taken_at: now,
            hosts: self.hosts.iter().map(HostMonitor::snapshot).collect(),
        }
    }

    /// Returns true if a refresh interval has passed since the last tick
    #[must_use]
    pub fn tick_due(&self, at: Instant) -> bool {
        self.last_tick
            .is_none_or(|last| at.duration_since(last) >= self.config.refresh_interval)
    }

    /// Runs until `shutdown` resolves or rendering fails.
    ///
    /// # Errors
    ///
    /// Returns the dashboard's IO error, e.g. when stdout is closed.
    pub async fn run<D, F>(&mut self, dashboard: &mut D, shutdown: F) -> std::io::Result<()>
    where
        D: Dashboard + ?Sized,
        F: Future<Output = ()>,
    {
        tracing::info!(
            hosts = self.hosts.len(),
            streams = self.streams.len(),
            refresh_ms = self.config.refresh_interval.as_millis() as u64,
            "Monitoring started"
        );
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    break;
                }
                handled = self.poll_ready() => {
                    if handled > 0 {
                        tracing::trace!(chunks = handled, "Drained ready streams");
                    }
                }
            }

            let at = Instant::now();
            if self.tick_due(at) {
                self.last_tick = Some(at);
                let snapshot = self.tick_at(unix_now());
                dashboard.render(&snapshot)?;
            }
        }
        Ok(())
    }

    /// Host state in configuration order
    #[must_use]
    pub fn hosts(&self) -> &[HostMonitor] {
        &self.hosts
    }

    /// Number of streams still in the readiness set
    #[must_use]
    pub fn open_streams(&self) -> usize {
        self.streams.len()
    }

    /// Number of hosts whose probe is still running
    #[must_use]
    pub fn live_hosts(&self) -> usize {
        self.hosts.iter().filter(|h| !h.is_dead()).count()
    }

    /// Configuration the scheduler was built from
    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

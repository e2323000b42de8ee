//! Offline analysis of captured probe output

use tokio::io::AsyncRead;
use tracing::Instrument;

use crate::dashboard::Snapshot;
use crate::probe::{ProbeStream, ReadOutcome};

use super::host::HostMonitor;
use super::metrics::WindowSpec;

/// Chunks read between two eviction passes
const EVICT_EVERY_CHUNKS: usize = 64;

/// Reads a captured probe log to the end and computes window statistics as
/// of the newest sample timestamp.
///
/// A final line without a trailing newline is still parsed. A log with no
/// recognised samples yields a snapshot taken at `0.0` with no statistics.
pub async fn replay<R>(
    host: &str,
    reader: R,
    windows: &[WindowSpec],
    read_chunk_bytes: usize,
) -> Snapshot
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let span = tracing::debug_span!(crate::tracing::span_names::REPLAY, host = %host);
    async {
        let mut stream = ProbeStream::from_reader(host, reader);
        let mut monitor = HostMonitor::new(host);
        let recorded = ingest_log(&mut stream, &mut monitor, windows, read_chunk_bytes).await;

        let now = newest_timestamp(&monitor).unwrap_or(0.0);
        monitor.recompute(now, windows);
        tracing::debug!(samples = recorded, now, "Replay finished");

        Snapshot {
            taken_at: now,
            hosts: vec![monitor.snapshot()],
        }
    }
    .instrument(span)
    .await
}

/// Feeds the whole log into `monitor`, evicting against the newest
/// timestamp seen so far every few chunks so retention stays bounded by
/// the largest window rather than by the file length.
async fn ingest_log(
    stream: &mut ProbeStream,
    monitor: &mut HostMonitor,
    windows: &[WindowSpec],
    read_chunk_bytes: usize,
) -> usize {
    let mut ends_with_newline = true;
    let mut recorded = 0;
    let mut chunks: usize = 0;

    while let ReadOutcome::Data(bytes) = stream.read_chunk(read_chunk_bytes).await {
        if let Some(&last) = bytes.last() {
            ends_with_newline = last == b'\n';
        }
        recorded += monitor.ingest(&bytes);
        chunks += 1;
        if chunks.is_multiple_of(EVICT_EVERY_CHUNKS)
            && let Some(now) = newest_timestamp(monitor)
        {
            monitor.recompute(now, windows);
        }
    }
    if !ends_with_newline {
        recorded += monitor.ingest(b"\n");
    }
    recorded
}

/// Newest retained sample timestamp; eviction never drops it
fn newest_timestamp(monitor: &HostMonitor) -> Option<f64> {
    monitor
        .series()
        .live()
        .iter()
        .map(|s| s.timestamp)
        .reduce(f64::max)
}

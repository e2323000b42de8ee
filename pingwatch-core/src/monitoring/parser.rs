//! Streaming parser for probe output
//!
//! Probe output arrives in arbitrary chunks. [`SampleParser`] buffers bytes,
//! splits complete lines and turns the two known line shapes into
//! [`Sample`]s:
//!
//! ```text
//! [1700000000.123456] 64 bytes from 1.1.1.1: icmp_seq=7 ttl=57 time=12.3 ms
//! [1700000001.123789] no answer yet for icmp_seq=8
//! ```
//!
//! Anything else (headers, summaries, diagnostics) is ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::metrics::Sample;

/// Longest partial line kept while waiting for its terminator
pub const MAX_PENDING_BYTES: usize = 64 * 1024;

/// Reply line: `[ts] N bytes from addr: icmp_seq=N ttl=N time=F ms`
static HIT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\[(\d+(?:\.\d+)?)\]\s+\d+\s+bytes from\s+.+?:\s+icmp_seq=\d+\s+ttl=\d+\s+time=(\d+(?:\.\d+)?)\s*ms",
    )
    .expect("HIT_LINE is a valid regex pattern")
});

/// Timeout line: `[ts] no answer yet for icmp_seq=N`
static MISS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d+(?:\.\d+)?)\]\s+no answer yet for icmp_seq=\d+")
        .expect("MISS_LINE is a valid regex pattern")
});

/// Incremental line parser holding the unparsed tail between reads
#[derive(Debug, Default)]
pub struct SampleParser {
    buffer: Vec<u8>,
    discarded_bytes: usize,
}

impl SampleParser {
    /// Creates a parser with an empty buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarded_bytes: 0,
        }
    }

    /// Appends `bytes` and returns the samples of every line completed so far.
    ///
    /// The iterator is lazy: lines are matched as it is advanced. When it is
    /// dropped the consumed lines are removed from the buffer and anything
    /// after them (a partial line, or lines not pulled yet) stays buffered
    /// for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Samples<'_> {
        self.buffer.extend_from_slice(bytes);
        self.enforce_pending_limit();
        Samples {
            parser: self,
            consumed: 0,
        }
    }

    /// Number of buffered bytes not yet parsed
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Total bytes dropped because a line exceeded [`MAX_PENDING_BYTES`]
    #[must_use]
    pub const fn discarded_bytes(&self) -> usize {
        self.discarded_bytes
    }

    /// Clears the buffered tail
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Parses a single line (without terminator) into a sample.
    ///
    /// Reply lines are tried before timeout lines. Returns `None` for lines
    /// of any other shape.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Sample> {
        let line = line.trim_end_matches('\r');

        if let Some(caps) = HIT_LINE.captures(line) {
            let timestamp = caps[1].parse().ok()?;
            let latency_ms = caps[2].parse().ok()?;
            return Some(Sample::hit(timestamp, latency_ms));
        }

        if let Some(caps) = MISS_LINE.captures(line) {
            let timestamp = caps[1].parse().ok()?;
            return Some(Sample::miss(timestamp));
        }

        None
    }

    /// Drops a runaway partial line so the buffer stays bounded
    fn enforce_pending_limit(&mut self) {
        if self.buffer.len() <= MAX_PENDING_BYTES {
            return;
        }
        // Complete lines are still parseable; only a terminator-less buffer
        // is dropped.
        if self.buffer.contains(&b'\n') {
            return;
        }
        tracing::warn!(
            bytes = self.buffer.len(),
            "Discarding oversized probe output line"
        );
        self.discarded_bytes += self.buffer.len();
        self.buffer.clear();
    }
}

/// Lazy iterator over the samples of complete buffered lines
///
/// Returned by [`SampleParser::feed`].
#[derive(Debug)]
pub struct Samples<'a> {
    parser: &'a mut SampleParser,
    consumed: usize,
}

impl Iterator for Samples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        loop {
            let rest = &self.parser.buffer[self.consumed..];
            let newline = rest.iter().position(|&b| b == b'\n')?;
            let line = String::from_utf8_lossy(&rest[..newline]);
            let sample = SampleParser::parse_line(&line);
            self.consumed += newline + 1;

            match sample {
                Some(sample) => return Some(sample),
                None => tracing::trace!(line = %line, "Ignoring unrecognised probe line"),
            }
        }
    }
}

impl Drop for Samples<'_> {
    fn drop(&mut self) {
        self.parser.buffer.drain(..self.consumed);
    }
}

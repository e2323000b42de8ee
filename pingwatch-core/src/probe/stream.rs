//! Readable byte channel over a probe's stdout

use std::fmt;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;

use super::command::{ProbeSettings, build_probe_command};
use super::{ProbeError, ProbeResult};

/// Result of a single read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes available now (may be empty after an interrupted read)
    Data(Vec<u8>),
    /// End of stream; the probe is dead and will not be read again
    Closed,
}

/// A read outcome tagged with the index of the host it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeChunk {
    /// Index of the host in the scheduler
    pub id: usize,
    /// What the read produced
    pub outcome: ReadOutcome,
}

/// Readiness-driven stream of chunks; ends right after [`ReadOutcome::Closed`]
pub type ChunkStream = BoxStream<'static, ProbeChunk>;

/// Output channel of one probe process
///
/// Holds no parsing state. Once the underlying reader reports end of file
/// (or fails) the stream is dead and further reads return
/// [`ReadOutcome::Closed`] without touching the handle.
pub struct ProbeStream {
    host: String,
    reader: Option<Box<dyn AsyncRead + Send + Unpin>>,
    child: Option<Child>,
}

impl fmt::Debug for ProbeStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeStream")
            .field("host", &self.host)
            .field("dead", &self.is_dead())
            .field("pid", &self.child.as_ref().and_then(Child::id))
            .finish()
    }
}

impl ProbeStream {
    /// Starts the probe process for `host`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Launch`] if the process cannot be spawned and
    /// [`ProbeError::MissingStdout`] if its output was not captured.
    pub fn open(host: &str, settings: &ProbeSettings) -> ProbeResult<Self> {
        let mut child = build_probe_command(settings, host)
            .spawn()
            .map_err(|e| ProbeError::Launch {
                host: host.to_string(),
                reason: e.to_string(),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| ProbeError::MissingStdout {
            host: host.to_string(),
        })?;

        tracing::info!(
            host = %host,
            program = %settings.program,
            pid = child.id(),
            "Probe started"
        );

        Ok(Self {
            host: host.to_string(),
            reader: Some(Box::new(stdout)),
            child: Some(child),
        })
    }

    /// Wraps an arbitrary byte source (captured logs, in-memory pipes)
    #[must_use]
    pub fn from_reader<R>(host: impl Into<String>, reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            host: host.into(),
            reader: Some(Box::new(reader)),
            child: None,
        }
    }

    /// Reads up to `max_bytes` once the handle is readable.
    ///
    /// Returns [`ReadOutcome::Closed`] on end of file or a read error, after
    /// which the stream is dead.
    pub async fn read_chunk(&mut self, max_bytes: usize) -> ReadOutcome {
        let Some(reader) = self.reader.as_mut() else {
            return ReadOutcome::Closed;
        };

        let mut buf = vec![0_u8; max_bytes.max(1)];
        match reader.read(&mut buf).await {
            Ok(0) => {
                self.close();
                ReadOutcome::Closed
            }
            Ok(n) => {
                buf.truncate(n);
                ReadOutcome::Data(buf)
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => ReadOutcome::Data(Vec::new()),
            Err(e) => {
                tracing::warn!(host = %self.host, error = %e, "Probe read failed");
                self.close();
                ReadOutcome::Closed
            }
        }
    }

    /// Turns the stream into a [`ChunkStream`] tagged with `id`
    #[must_use]
    pub fn into_chunks(self, id: usize, max_bytes: usize) -> ChunkStream {
        futures::stream::unfold(Some(self), move |state| async move {
            let mut stream = state?;
            let outcome = stream.read_chunk(max_bytes).await;
            let next = match outcome {
                ReadOutcome::Data(_) => Some(stream),
                ReadOutcome::Closed => None,
            };
            Some((ProbeChunk { id, outcome }, next))
        })
        .boxed()
    }

    /// Target host
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true once the stream has reached end of file
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.reader.is_none()
    }

    fn close(&mut self) {
        self.reader = None;
        if let Some(child) = self.child.as_mut() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    tracing::debug!(host = %self.host, %status, "Probe exited");
                }
                Ok(None) => {
                    // Output closed but the process lingers
                    if let Err(e) = child.start_kill() {
                        tracing::debug!(host = %self.host, error = %e, "Probe kill failed");
                    }
                }
                Err(e) => {
                    tracing::debug!(host = %self.host, error = %e, "Probe status unavailable");
                }
            }
        }
    }
}

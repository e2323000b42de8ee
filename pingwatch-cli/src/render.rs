//! Terminal and JSON dashboards.

use std::fmt::Write as _;
use std::io::{self, Write};

use pingwatch_core::dashboard::{Dashboard, HostSnapshot, Snapshot, format_window_cell};
use pingwatch_core::monitoring::{MISS_LABEL, WindowSpec};

use crate::cli::OutputFormat;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Creates the dashboard for `format` writing to stdout
pub fn stdout_dashboard(
    format: OutputFormat,
    windows: &[WindowSpec],
    color: bool,
    clear_screen: bool,
) -> Box<dyn Dashboard> {
    match format {
        OutputFormat::Table => Box::new(
            TableDashboard::new(io::stdout(), windows.to_vec(), color)
                .with_clear_screen(clear_screen),
        ),
        OutputFormat::Json => Box::new(JsonDashboard::new(io::stdout())),
    }
}

/// Redraws a fixed-width table on every snapshot
pub struct TableDashboard<W: Write> {
    out: W,
    windows: Vec<WindowSpec>,
    color: bool,
    clear_screen: bool,
}

impl<W: Write> TableDashboard<W> {
    /// Table with one column per window, in the given order
    pub const fn new(out: W, windows: Vec<WindowSpec>, color: bool) -> Self {
        Self {
            out,
            windows,
            color,
            clear_screen: true,
        }
    }

    /// Controls whether the screen is cleared before each frame
    #[must_use]
    pub const fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    /// Returns the underlying writer
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn status_color(host: &HostSnapshot) -> &'static str {
        if host.dead {
            RED
        } else if host.last_label.as_deref() == Some(MISS_LABEL) {
            YELLOW
        } else {
            GREEN
        }
    }

    fn frame(&self, snapshot: &Snapshot) -> String {
        let cells: Vec<Vec<String>> = snapshot
            .hosts
            .iter()
            .map(|host| {
                self.windows
                    .iter()
                    .map(|&w| format_window_cell(host.metrics_for(w)))
                    .collect()
            })
            .collect();

        let host_width = snapshot
            .hosts
            .iter()
            .map(|h| h.host.len())
            .chain(std::iter::once("HOST".len()))
            .max()
            .unwrap_or(4);
        let status_width = snapshot
            .hosts
            .iter()
            .map(|h| h.status_display().len())
            .chain(std::iter::once("LAST".len()))
            .max()
            .unwrap_or(4);
        let window_widths: Vec<usize> = self
            .windows
            .iter()
            .enumerate()
            .map(|(i, w)| {
                cells
                    .iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(w.to_string().len()))
                    .max()
                    .unwrap_or(1)
            })
            .collect();

        let mut out = String::new();
        if self.clear_screen {
            out.push_str(CLEAR_SCREEN);
        }

        let time = snapshot.taken_at_utc().map_or_else(
            || "-".to_string(),
            |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        let _ = writeln!(
            out,
            "{}  {time}  {}/{} hosts up",
            self.paint("pingwatch", BOLD),
            snapshot.live_hosts(),
            snapshot.hosts.len()
        );
        out.push('\n');

        let mut header = format!("{:<host_width$}  {:<status_width$}", "HOST", "LAST");
        for (window, width) in self.windows.iter().zip(&window_widths) {
            let _ = write!(header, "  {:<width$}", window.to_string());
        }
        let _ = writeln!(out, "{}", self.paint(header.trim_end(), BOLD));

        for (host, row) in snapshot.hosts.iter().zip(&cells) {
            let status = format!("{:<status_width$}", host.status_display());
            let mut line = format!(
                "{:<host_width$}  {}",
                host.host,
                self.paint(&status, Self::status_color(host))
            );
            for (cell, width) in row.iter().zip(&window_widths) {
                let _ = write!(line, "  {cell:<width$}");
            }
            let _ = writeln!(out, "{}", line.trim_end());
        }

        let failures: Vec<&HostSnapshot> =
            snapshot.hosts.iter().filter(|h| h.error.is_some()).collect();
        if !failures.is_empty() {
            out.push('\n');
            for host in failures {
                let _ = writeln!(
                    out,
                    "{} {}",
                    self.paint(&format!("{}:", host.host), RED),
                    host.error.as_deref().unwrap_or_default()
                );
            }
        }
        out
    }
}

impl<W: Write> Dashboard for TableDashboard<W> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let frame = self.frame(snapshot);
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }
}

/// Writes each snapshot as one JSON object per line
pub struct JsonDashboard<W: Write> {
    out: W,
}

impl<W: Write> JsonDashboard<W> {
    /// JSON-lines dashboard over `out`
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Dashboard for JsonDashboard<W> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot).map_err(io::Error::from)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

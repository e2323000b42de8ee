//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use pingwatch_core::monitoring::WindowSpec;

use crate::util::parse_window;

/// Live latency dashboard over long-running `ping` probes
#[derive(Parser)]
#[command(name = "pingwatch")]
#[command(author, version, about = "Live latency dashboard over long-running ping probes")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "PINGWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Probe hosts and show live rolling-window statistics
    #[command(about = "Probe hosts and show a live latency dashboard")]
    Watch {
        /// Hosts to probe (added to those in the config file)
        hosts: Vec<String>,

        /// Window length, e.g. 10s, 1m, 10m (repeatable, replaces the configured windows)
        #[arg(short = 'w', long = "window", value_name = "DURATION", value_parser = parse_window)]
        windows: Vec<WindowSpec>,

        /// Dashboard refresh interval in milliseconds
        #[arg(long, value_name = "MS")]
        refresh: Option<u64>,

        /// Upper bound for one readiness wait in milliseconds
        #[arg(long, value_name = "MS")]
        wait_timeout: Option<u64>,

        /// Seconds between echo requests
        #[arg(short, long, value_name = "SECS")]
        interval: Option<f64>,

        /// Dashboard output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Compute statistics from a captured probe log
    #[command(about = "Compute window statistics from a captured ping -D -O log")]
    Replay {
        /// Captured probe output
        file: PathBuf,

        /// Host label to show (default: file name)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Window length, e.g. 10s, 1m, 10m (repeatable, replaces the configured windows)
        #[arg(short = 'w', long = "window", value_name = "DURATION", value_parser = parse_window)]
        windows: Vec<WindowSpec>,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate a man page
    #[command(about = "Generate a man page in roff format")]
    Manpage,
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Redrawn terminal table
    Table,
    /// One JSON snapshot per line
    Json,
}

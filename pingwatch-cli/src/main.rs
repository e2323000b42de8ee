//! `pingwatch` CLI - live latency dashboard over long-running `ping` probes
//!
//! Provides the live `watch` dashboard, offline `replay` of captured probe
//! logs, and shell completion / man page generation.

mod cli;
mod commands;
mod error;
mod render;
mod util;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    util::init_logging(&cli);

    let result = commands::dispatch(cli.config.as_deref(), cli.no_color, cli.command);

    if let Err(e) = result {
        tracing::debug!(error = %e, exit_code = e.exit_code(), "Command failed");
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}

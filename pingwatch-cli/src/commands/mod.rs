//! Command handler modules for the CLI.

mod completions;
mod manpage;
mod replay;
mod watch;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(
    config_path: Option<&Path>,
    no_color: bool,
    command: Commands,
) -> Result<(), CliError> {
    match command {
        Commands::Watch {
            hosts,
            windows,
            refresh,
            wait_timeout,
            interval,
            format,
        } => watch::cmd_watch(
            config_path,
            watch::WatchParams {
                hosts: &hosts,
                windows: &windows,
                refresh_ms: refresh,
                wait_timeout_ms: wait_timeout,
                interval_secs: interval,
                format,
                color: !no_color,
            },
        ),
        Commands::Replay {
            file,
            host,
            windows,
            format,
        } => replay::cmd_replay(
            config_path,
            &file,
            host.as_deref(),
            &windows,
            format,
            !no_color,
        ),
        Commands::Completions { shell } => completions::cmd_completions(shell),
        Commands::Manpage => manpage::cmd_manpage(),
    }
}

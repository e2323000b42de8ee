//! Live monitoring command.

use std::path::Path;

use pingwatch_core::monitoring::{MonitorConfig, WindowSpec};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::render::stdout_dashboard;
use crate::util::{SettingsOverrides, load_settings};

/// Parameters for the watch command
pub struct WatchParams<'a> {
    pub hosts: &'a [String],
    pub windows: &'a [WindowSpec],
    pub refresh_ms: Option<u64>,
    pub wait_timeout_ms: Option<u64>,
    pub interval_secs: Option<f64>,
    pub format: OutputFormat,
    pub color: bool,
}

/// Watch command handler
///
/// Runs on a current-thread runtime until Ctrl-C.
pub fn cmd_watch(config_path: Option<&Path>, params: WatchParams<'_>) -> Result<(), CliError> {
    let settings = load_settings(
        config_path,
        &SettingsOverrides {
            hosts: params.hosts,
            windows: params.windows,
            refresh_ms: params.refresh_ms,
            wait_timeout_ms: params.wait_timeout_ms,
            interval_secs: params.interval_secs,
        },
    )?;
    let config = MonitorConfig::try_from(settings)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let mut dashboard = stdout_dashboard(params.format, &config.windows, params.color, true);
    runtime.block_on(pingwatch_core::monitoring::watch(
        config,
        dashboard.as_mut(),
        shutdown_signal(),
    ))?;
    Ok(())
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

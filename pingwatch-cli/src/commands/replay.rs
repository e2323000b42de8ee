//! Offline replay of a captured probe log.

use std::path::Path;

use pingwatch_core::monitoring::{WindowSpec, replay};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::render::stdout_dashboard;
use crate::util::{SettingsOverrides, load_settings};

/// Replay command handler
pub fn cmd_replay(
    config_path: Option<&Path>,
    file: &Path,
    host: Option<&str>,
    windows: &[WindowSpec],
    format: OutputFormat,
    color: bool,
) -> Result<(), CliError> {
    let settings = load_settings(
        config_path,
        &SettingsOverrides {
            windows,
            ..Default::default()
        },
    )?;
    settings.validate_windows()?;

    let label = match host {
        Some(host) => host.to_string(),
        None => file
            .file_name()
            .map_or_else(|| file.display().to_string(), |n| n.to_string_lossy().into_owned()),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let snapshot = runtime.block_on(async {
        let reader = tokio::fs::File::open(file).await?;
        Ok::<_, CliError>(
            replay(
                &label,
                reader,
                &settings.windows,
                settings.effective_read_chunk_bytes(),
            )
            .await,
        )
    })?;

    if snapshot.hosts.iter().all(|h| h.last_label.is_none()) {
        tracing::warn!(file = %file.display(), "No probe samples found");
    }

    let mut dashboard = stdout_dashboard(format, &settings.windows, color, false);
    dashboard.render(&snapshot)?;
    Ok(())
}

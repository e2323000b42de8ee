//! Configuration file loading
//!
//! Settings live in a TOML file, by default
//! `$XDG_CONFIG_HOME/pingwatch/config.toml`. A missing default file is not
//! an error; an explicitly requested one is.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::monitoring::MonitorSettings;

/// Application directory name under the user config directory
pub const APP_DIR_NAME: &str = "pingwatch";

/// Config file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default location of the config file, if a config directory exists
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads settings from `path`
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not valid.
pub fn load_settings(path: &Path) -> ConfigResult<MonitorSettings> {
    let _span = tracing::debug_span!(
        crate::tracing::span_names::CONFIG_LOAD,
        path = %path.display()
    )
    .entered();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = MonitorSettings::from_toml_str(&text)?;
    tracing::debug!(
        hosts = settings.hosts.len(),
        windows = settings.windows.len(),
        "Configuration loaded"
    );
    Ok(settings)
}

/// Loads settings from `explicit`, or from the default location if present.
///
/// Falls back to built-in defaults when no explicit path is given and the
/// default file does not exist.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read or parsed.
pub fn load_or_default(explicit: Option<&Path>) -> ConfigResult<MonitorSettings> {
    if let Some(path) = explicit {
        return load_settings(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_settings(&path),
        _ => Ok(MonitorSettings::default()),
    }
}

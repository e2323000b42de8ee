//! Config file loading tests

use std::io::Write;
use std::time::Duration;

use pingwatch_core::config::{load_or_default, load_settings};
use pingwatch_core::error::ConfigError;
use pingwatch_core::monitoring::{MonitorConfig, WindowSpec};

#[test]
fn test_full_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
hosts = ["192.0.2.1", "example.net"]
windows = [5, 30, 300]
refresh_ms = 250
wait_timeout_ms = 5
read_chunk_bytes = 8192

[probe]
program = "/usr/bin/ping"
interval_secs = 0.5
extra_args = ["-W", "2"]
"#
    )
    .unwrap();

    let settings = load_settings(file.path()).unwrap();
    let config = MonitorConfig::try_from(settings).unwrap();

    assert_eq!(config.hosts, ["192.0.2.1", "example.net"]);
    assert_eq!(
        config.windows,
        [5.0, 30.0, 300.0].map(WindowSpec::from_secs)
    );
    assert_eq!(config.refresh_interval, Duration::from_millis(250));
    // Clamped to the 10 ms floor
    assert_eq!(config.wait_timeout, Duration::from_millis(10));
    assert_eq!(config.read_chunk_bytes, 8192);
    assert_eq!(config.probe.program, "/usr/bin/ping");
    assert_eq!(config.probe.extra_args, ["-W", "2"]);
}

#[test]
fn test_duplicate_windows_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "hosts = [\"h\"]\nwindows = [60, 60]").unwrap();

    let settings = load_settings(file.path()).unwrap();
    let err = MonitorConfig::try_from(settings).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_explicit_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_or_default(Some(&dir.path().join("missing.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

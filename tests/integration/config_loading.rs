//! Integration tests for configuration loading
//!
//! Covers file-based loading, environment overrides and validation. Tests
//! touching `VANTAGE_*` environment variables are serialized through a global
//! mutex to avoid cross-test races.

use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;
use vantage::config::VantageConfig;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_load_from_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vantage.toml");
    fs::write(
        &path,
        r#"
[poll]
data_interval_secs = 45
status_interval_secs = 10

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = VantageConfig::load(Some(&path)).unwrap();
    assert_eq!(config.poll.data_interval_secs, 45);
    assert_eq!(config.poll.status_interval_secs, 10);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_env_overrides_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vantage.toml");
    fs::write(
        &path,
        r#"
[poll]
data_interval_secs = 45
"#,
    )
    .unwrap();

    std::env::set_var("VANTAGE_POLL__DATA_INTERVAL_SECS", "90");
    let result = VantageConfig::load(Some(&path));
    std::env::remove_var("VANTAGE_POLL__DATA_INTERVAL_SECS");

    let config = result.unwrap();
    assert_eq!(config.poll.data_interval_secs, 90);
}

#[test]
fn test_missing_file_is_an_error() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(VantageConfig::load(Some(&path)).is_err());
}

#[test]
fn test_defaults_without_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let config = VantageConfig::load(None).unwrap();
    assert_eq!(config.poll.data_interval_secs, 30);
    assert_eq!(config.poll.status_interval_secs, 5);
}

#[test]
fn test_zero_interval_in_file_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vantage.toml");
    fs::write(
        &path,
        r#"
[poll]
status_interval_secs = 0
"#,
    )
    .unwrap();
    assert!(VantageConfig::load(Some(&path)).is_err());
}

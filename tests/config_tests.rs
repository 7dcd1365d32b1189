//! Loading `DashboardConfig` from files on disk.

use dashboard::config::{DashboardConfig, StorageBackend};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(yaml.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_from_yaml_file() {
    let file = write_config(
        r#"
server:
  bind: 0.0.0.0:8080
storage:
  backend: in_memory
  seed: false
logging:
  filter: debug
"#,
    );

    let config = DashboardConfig::from_yaml_file(file.path()).unwrap();

    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.storage.backend, StorageBackend::InMemory);
    assert!(!config.storage.seed);
    assert_eq!(config.logging.filter, "debug");
}

#[test]
fn test_parse_error_names_the_file() {
    let file = write_config("storage: [not, a, map]\n");

    let err = DashboardConfig::from_yaml_file(file.path()).unwrap_err();

    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = DashboardConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();

    assert!(err.to_string().contains("IO error"));
}

#[test]
fn test_load_rejects_postgres_without_url() {
    // DATABASE_URL would satisfy validation, so only run when it is unset.
    if std::env::var("DATABASE_URL").is_ok() {
        return;
    }
    let file = write_config("storage:\n  backend: postgres\n");

    let err = DashboardConfig::load(file.path()).unwrap_err();

    assert!(err.to_string().contains("database_url"));
}

#[test]
fn test_load_without_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = DashboardConfig::load(dir.path().join("dashboard.yaml")).unwrap();

    assert_eq!(config.storage.backend, StorageBackend::InMemory);
    assert!(config.storage.seed);
}

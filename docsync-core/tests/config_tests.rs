//! Config load/save integration tests: error messages, atomic writes, and
//! partial-file defaults.

use assert_fs::prelude::*;
use docsync_core::{config, ConfigError, DocumentationLevel, SyncConfig, WatchBackend};
use predicates::prelude::predicate;
use std::fs;

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let dir = home.path().join(".docsync");
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("config.yaml"), b": : corrupt : yaml : !!!\n  - broken: [unclosed")
        .expect("write");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"), "must contain file path, got: {err}");
}

#[test]
fn load_unknown_level_is_parse_error() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".docsync/config.yaml")
        .write_str("documentation_level: verbose\n")
        .expect("write");

    let err = config::load_at(home.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

#[test]
fn load_empty_file_yields_defaults() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".docsync/config.yaml").write_str("").expect("write");

    let loaded = config::load_at(home.path()).expect("load");
    assert_eq!(loaded, SyncConfig::default());
}

// ---------------------------------------------------------------------------
// 2. Save
// ---------------------------------------------------------------------------

#[test]
fn save_creates_docsync_dir_and_file() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = config::save_at(home.path(), &SyncConfig::default()).expect("save");

    home.child(".docsync").assert(predicate::path::is_dir());
    home.child(".docsync/config.yaml").assert(predicate::path::is_file());
    assert_eq!(path, config::config_path_at(home.path()));
}

#[test]
fn saved_yaml_uses_lowercase_enum_values() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let cfg = SyncConfig {
        documentation_level: DocumentationLevel::Minimal,
        watch_backend: WatchBackend::Notify,
        ..SyncConfig::default()
    };
    config::save_at(home.path(), &cfg).expect("save");

    home.child(".docsync/config.yaml")
        .assert(predicate::str::contains("documentation_level: minimal"))
        .assert(predicate::str::contains("watch_backend: notify"));
}

#[cfg(unix)]
#[test]
fn saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let home = assert_fs::TempDir::new().expect("tempdir");
    let path = config::save_at(home.path(), &SyncConfig::default()).expect("save");
    let mode = fs::metadata(&path).expect("stat").permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn save_overwrites_previous_config() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    config::save_at(home.path(), &SyncConfig::default()).expect("first save");
    let updated = SyncConfig { max_log_entries: 10, ..SyncConfig::default() };
    config::save_at(home.path(), &updated).expect("second save");

    assert_eq!(config::load_at(home.path()).expect("load").max_log_entries, 10);
}

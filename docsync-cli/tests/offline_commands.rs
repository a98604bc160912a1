use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn docsync_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docsync"));
    cmd.env("HOME", home).env("USERPROFILE", home);
    cmd
}

#[test]
fn status_reports_not_running() {
    let home = TempDir::new().expect("home");
    docsync_cmd(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("docsync is not running"));

    let output = docsync_cmd(home.path())
        .args(["status", "--json"])
        .output()
        .expect("run status --json");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("status JSON");
    assert_eq!(value["running"], serde_json::Value::Bool(false));
    assert!(value["socket"]
        .as_str()
        .is_some_and(|s| s.ends_with("docsync.sock")));
}

#[test]
fn stop_without_daemon_is_not_an_error() {
    let home = TempDir::new().expect("home");
    docsync_cmd(home.path())
        .arg("stop")
        .assert()
        .success()
        .stdout(contains("docsync is not running"));
}

#[test]
fn queries_without_daemon_fail_with_hint() {
    let home = TempDir::new().expect("home");
    for args in [
        vec!["history"],
        vec!["activity"],
        vec!["export"],
        vec!["rollback", "src/lib.rs", "parse"],
    ] {
        docsync_cmd(home.path())
            .args(&args)
            .assert()
            .failure()
            .stderr(contains("docsync watch"));
    }
}

#[test]
fn config_init_show_and_path() {
    let home = TempDir::new().expect("home");

    docsync_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(contains(".docsync").and(contains("config.yaml")));

    docsync_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("documentation_level: standard"));

    docsync_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(contains("wrote"));
    assert!(home.path().join(".docsync/config.yaml").exists());

    docsync_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(contains("--force"));
    docsync_cmd(home.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn config_show_reflects_file_contents() {
    let home = TempDir::new().expect("home");
    std::fs::create_dir_all(home.path().join(".docsync")).expect("mkdir");
    std::fs::write(
        home.path().join(".docsync/config.yaml"),
        "documentation_level: comprehensive\nmax_log_entries: 50\n",
    )
    .expect("write config");

    docsync_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("documentation_level: comprehensive").and(contains("max_log_entries: 50")));
}

#[test]
fn watch_rejects_bad_arguments() {
    let home = TempDir::new().expect("home");
    docsync_cmd(home.path()).arg("watch").assert().failure();
    docsync_cmd(home.path())
        .args(["watch", ".", "--level", "verbose"])
        .assert()
        .failure()
        .stderr(contains("unknown documentation level"));
    docsync_cmd(home.path())
        .args(["watch", ".", "--backend", "inotify"])
        .assert()
        .failure()
        .stderr(contains("unknown watch backend"));
}

#[test]
fn watch_fails_for_missing_path() {
    let home = TempDir::new().expect("home");
    let missing = home.path().join("does-not-exist");
    docsync_cmd(home.path())
        .args(["watch", "--backend", "poll"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(contains("does-not-exist"));
}

//! # DruDock CLI App Integration Tests
//!
//! File: cli/tests/app.rs
//!
//! ## Overview
//!
//! Integration tests for `drudock app` commands that work without a Docker daemon
//! (`about`, `config show`). Commands that drive containers need a running daemon
//! and are `#[ignore]`d.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_show_without_config_fails() {
    let dir = tempdir().unwrap();
    isolated_cmd(dir.path())
        .args(["app", "config", "show"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("APP .config.yml not found"));
}

#[test]
fn test_config_show_prints_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".config.yml"), DEMO_CONFIG).unwrap();
    isolated_cmd(dir.path())
        .args(["app", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("APP ::: Config"))
        .stdout(predicate::str::contains("appname: Demo Site"));
}

#[test]
fn test_config_show_from_app_directory() {
    let dir = tempdir().unwrap();
    let app = dir.path().join("demo");
    fs::create_dir(&app).unwrap();
    fs::write(app.join(".config.yml"), DEMO_CONFIG).unwrap();
    isolated_cmd(dir.path())
        .args(["--app", "demo", "app", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("host: demo.localhost"));
}

#[test]
fn test_clean_output_hides_sections() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".config.yml"), DEMO_CONFIG).unwrap();
    isolated_cmd(dir.path())
        .args(["--clean-output", "app", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("APP ::: Config").not())
        .stdout(predicate::str::contains("apptype: D8"));
}

#[test]
fn test_quiet_hides_info() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".config.yml"), DEMO_CONFIG).unwrap();
    isolated_cmd(dir.path())
        .args(["-q", "app", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_invalid_settings_file_fails() {
    let dir = tempdir().unwrap();
    let settings = dir.path().join("bad.toml");
    fs::write(&settings, "[runner]\ntimeout_secs = 0\n").unwrap();
    drudock_cmd()
        .current_dir(dir.path())
        .env("DRUDOCK_SETTINGS", &settings)
        .args(["app", "about"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs must be greater than zero"));
}

#[test]
fn test_about_shows_version() {
    let dir = tempdir().unwrap();
    isolated_cmd(dir.path())
        .args(["app", "about"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "DruDock {}",
            env!("CARGO_PKG_VERSION")
        )));
}

/// Requires a running Docker daemon.
#[test]
#[ignore]
fn test_status_without_config_fails_after_docker_check() {
    let dir = tempdir().unwrap();
    isolated_cmd(dir.path())
        .args(["app", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(".config.yml not found"));
}

//! # DruDock CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file declares
//! `mod common;` and builds its commands with `drudock_cmd()` or `isolated_cmd()`.
//!

// Not every test file uses every helper.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// An `assert_cmd::Command` for the compiled `drudock` binary.
pub fn drudock_cmd() -> Command {
    Command::cargo_bin("drudock").expect("Failed to find drudock binary for testing")
}

/// A `drudock` command running in `dir`, with default settings and no colours.
///
/// Writes an empty settings file into `dir` so the user's own DruDock settings
/// never leak into a test.
pub fn isolated_cmd(dir: &Path) -> Command {
    let settings = dir.join("drudock-settings.toml");
    fs::write(&settings, "").expect("Failed to write test settings file");
    let mut cmd = drudock_cmd();
    cmd.current_dir(dir)
        .env("DRUDOCK_SETTINGS", settings)
        .env_remove("RUST_LOG")
        .arg("--no-ansi");
    cmd
}

/// A complete `.config.yml` for an app named "Demo Site".
pub const DEMO_CONFIG: &str = "\
appname: Demo Site
apptype: D8
host: demo.localhost
dist: Local
src: ./src
drudock:
  version: 1.4.0
";

//! # DruDock About Handler
//!
//! File: cli/src/commands/app/about.rs
//!
//! ## Overview
//!
//! Implements `drudock app about`: prints the DruDock version and the versions of the
//! Docker and docker-compose binaries it drives. Works without an app config and
//! without a running Docker daemon; a missing binary is reported as a warning.
//!
use crate::commands::context::Session;
use crate::common::process::{self, CommandLine};
use crate::core::error::Result;
use clap::Parser;
use std::time::Duration;
use tracing::debug;

/// Limit for each `--version` probe.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(about = "Show DruDock, Docker and docker-compose versions")]
pub struct AboutArgs {}

pub async fn handle_about(_args: AboutArgs, session: &Session) -> Result<()> {
    session.section("APP ::: About");
    let reporter = session.reporter();
    reporter.info(&format!("DruDock {}", env!("CARGO_PKG_VERSION")));

    let docker = CommandLine::new(session.settings().compose.docker_binary.as_str()).arg("--version");
    let compose = session.settings().compose_command().arg("--version");
    for probe in [docker, compose] {
        let line = probe.to_shell_line();
        match process::capture(probe, VERSION_PROBE_TIMEOUT).await {
            Ok(outcome) => reporter.info(outcome.output.trim()),
            Err(e) => {
                debug!("Version probe '{}' failed: {:?}", line, e);
                reporter.warning(&format!("Could not run '{}'", line));
            }
        }
    }
    Ok(())
}

//! # DruDock MySQL Export Handler
//!
//! File: cli/src/commands/mysql/export.rs
//!
//! ## Overview
//!
//! Implements `drudock mysql export`: dumps the app database with `mysqldump` inside
//! the `mysql` service and writes it to a file on the host. Without `--path` the dump
//! is written to `<app>.sql` in the current directory.
//!
use super::{client_command, MYSQL_SERVICE};
use crate::commands::context::Session;
use crate::common::docker::ComposeProject;
use crate::common::fs::io::ensure_dir_exists;
use crate::common::process::CommandLine;
use crate::core::config::Validation;
use crate::core::error::Result;
use crate::core::settings::MysqlSettings;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(about = "Export the app database to a SQL dump")]
pub struct ExportArgs {
    /// Where to write the dump. Defaults to `<app>.sql`.
    #[arg(short, long)]
    path: Option<PathBuf>,
}

pub async fn handle_export(args: ExportArgs, session: &Session) -> Result<()> {
    session.section("MYSQL ::: Export");
    let ctx = session.app(Validation::Enforce)?;
    ctx.require(&[MYSQL_SERVICE]).await?;

    let target = args
        .path
        .unwrap_or_else(|| PathBuf::from(format!("{}.sql", ctx.compose.name())));
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }

    let cmd = export_command(&ctx.compose, &ctx.settings().mysql, &target);
    ctx.run(cmd, false).await?;
    session
        .reporter()
        .info(&format!("Database exported to {}", target.display()));
    Ok(())
}

fn export_command(compose: &ComposeProject, mysql: &MysqlSettings, target: &Path) -> CommandLine {
    client_command(compose, "mysqldump", mysql)
        .stdout_to(target)
}

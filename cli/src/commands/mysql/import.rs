//! # DruDock MySQL Import Handler
//!
//! File: cli/src/commands/mysql/import.rs
//!
//! ## Overview
//!
//! Implements `drudock mysql import`: feeds a SQL dump from the host into the
//! `mysql` client of the app's `mysql` service
//! (`docker-compose exec -T mysql mysql ... < dump.sql`).
//!
use super::{client_command, MYSQL_SERVICE};
use crate::commands::context::Session;
use crate::common::docker::ComposeProject;
use crate::common::process::CommandLine;
use crate::core::config::Validation;
use crate::core::error::{DrudockError, Result};
use crate::core::settings::MysqlSettings;
use anyhow::anyhow;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Import a SQL dump into the app database")]
pub struct ImportArgs {
    /// Path of the SQL dump on the host.
    #[arg(short, long)]
    path: PathBuf,
}

pub async fn handle_import(args: ImportArgs, session: &Session) -> Result<()> {
    session.section("MYSQL ::: Import");
    if !args.path.is_file() {
        return Err(anyhow!(DrudockError::FileSystem(format!(
            "SQL dump not found: {}",
            args.path.display()
        ))));
    }
    let ctx = session.app(Validation::Enforce)?;
    ctx.require(&[MYSQL_SERVICE]).await?;

    info!("Importing {} into '{}'", args.path.display(), ctx.compose.name());
    session
        .reporter()
        .info(&format!("Importing {}", args.path.display()));
    let cmd = import_command(&ctx.compose, &ctx.settings().mysql, &args.path);
    ctx.run(cmd, false).await?;
    session.reporter().info("Import complete");
    Ok(())
}

fn import_command(compose: &ComposeProject, mysql: &MysqlSettings, dump: &Path) -> CommandLine {
    client_command(compose, "mysql", mysql)
        .stdin_from(dump)
}

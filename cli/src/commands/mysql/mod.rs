//! # DruDock MySQL Command Group
//!
//! File: cli/src/commands/mysql/mod.rs
//!
//! ## Overview
//!
//! `drudock mysql import|export|monitor`: moving SQL dumps in and out of the app's
//! `mysql` service and following its log. Credentials come from the `[mysql]`
//! section of the DruDock settings.
//!
//! ## Examples
//!
//! ```bash
//! drudock mysql import -p ./backup.sql
//! drudock mysql export -p ./demo.sql
//! drudock mysql monitor
//! ```
//!
use crate::commands::context::Session;
use crate::common::docker::ComposeProject;
use crate::common::process::CommandLine;
use crate::core::config::Validation;
use crate::core::error::Result;
use crate::core::settings::MysqlSettings;
use clap::{Parser, Subcommand};

/// Implements `drudock mysql export`.
mod export;
/// Implements `drudock mysql import`.
mod import;

const MYSQL_SERVICE: &str = "mysql";

#[derive(Parser, Debug)]
pub struct MysqlArgs {
    #[command(subcommand)]
    command: MysqlCommand,
}

#[derive(Subcommand, Debug)]
enum MysqlCommand {
    /// Import a SQL dump into the app database.
    Import(import::ImportArgs),
    /// Export the app database to a SQL dump.
    Export(export::ExportArgs),
    /// Follow the mysql container log.
    Monitor,
}

pub async fn handle_mysql(args: MysqlArgs, session: &Session) -> Result<()> {
    match args.command {
        MysqlCommand::Import(args) => import::handle_import(args, session).await?,
        MysqlCommand::Export(args) => export::handle_export(args, session).await?,
        MysqlCommand::Monitor => handle_monitor(session).await?,
    }
    Ok(())
}

async fn handle_monitor(session: &Session) -> Result<()> {
    session.section("MYSQL ::: Monitor");
    let ctx = session.app(Validation::Enforce)?;
    ctx.require(&[MYSQL_SERVICE]).await?;
    // Follows until interrupted, so it runs attached and the idle timeout does not apply.
    ctx.run(ctx.compose.logs(Some(MYSQL_SERVICE), true), true)
        .await?;
    Ok(())
}

/// `exec -T mysql <client> -u<user> -p<password> <database>`. The password is a
/// secret argument, so it never shows up in logs or error messages.
fn client_command(compose: &ComposeProject, client: &str, mysql: &MysqlSettings) -> CommandLine {
    compose
        .exec(MYSQL_SERVICE, [client.to_string(), format!("-u{}", mysql.user)], false)
        .secret_arg("-p", &mysql.password)
        .arg(mysql.database.clone())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_mysql_subcommands() {
        let import = MysqlArgs::try_parse_from(["mysql", "import", "-p", "dump.sql"]).unwrap();
        assert!(matches!(import.command, MysqlCommand::Import(_)));
        let monitor = MysqlArgs::try_parse_from(["mysql", "monitor"]).unwrap();
        assert!(matches!(monitor.command, MysqlCommand::Monitor));
    }

    #[test]
    fn test_client_command_hides_password() {
        use crate::core::config::ProjectConfig;
        use crate::core::settings::Settings;
        use serde_yaml::Mapping;
        use std::path::Path;

        let mut values = Mapping::new();
        values.insert("appname".into(), "demo".into());
        let cfg = ProjectConfig::from_mapping(values);
        let compose = ComposeProject::from_config(Path::new("/w"), &cfg, &Settings::default()).unwrap();
        let cmd = client_command(&compose, "mysqldump", &MysqlSettings::default());
        assert!(cmd
            .to_shell_line()
            .ends_with("exec -T mysql mysqldump -udev -pDEVPASSWORD dev_db"));
        let shown = cmd.to_string();
        assert!(shown.ends_with("exec -T mysql mysqldump -udev '-p****' dev_db"), "{}", shown);
        assert!(!shown.contains("DEVPASSWORD"));
    }
}

//! # DruDock App Config Handler
//!
//! File: cli/src/commands/app/config.rs
//!
//! ## Overview
//!
//! Implements `drudock app config show` and `drudock app config update`.
//!
//! `update` is the one command that loads the config without enforcing the required
//! keys: it is how an incomplete or outdated `.config.yml` gets repaired. Missing
//! keys are taken from `--set key=value` or prompted for, the config is restamped
//! with the running DruDock version and the whole file is rewritten.
//!
//! ## Usage
//!
//! ```bash
//! drudock app config show
//! drudock app config update --set host=demo.localhost --set dist=Dev
//! ```
//!
use crate::commands::context::Session;
use crate::common::ui::prompt;
use crate::core::config::{Validation, REQUIRED_KEYS, SCHEMA_VERSION_KEY};
use crate::core::error::{DrudockError, Result};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the app config.
    Show(ShowArgs),
    /// Fill in missing keys, set values and restamp the config version.
    Update(UpdateArgs),
}

#[derive(Parser, Debug)]
pub struct ShowArgs {}

#[derive(Parser, Debug)]
pub struct UpdateArgs {
    /// Set a top-level key, e.g. `--set host=demo.localhost`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,
}

pub async fn handle_config(args: ConfigArgs, session: &Session) -> Result<()> {
    match args.command {
        ConfigCommand::Show(_) => handle_show(session),
        ConfigCommand::Update(args) => handle_update(args, session),
    }
}

fn handle_show(session: &Session) -> Result<()> {
    session.section("APP ::: Config");
    let config = session.load_config(Validation::Skip)?;
    if let Some(path) = config.path() {
        session
            .reporter()
            .info(&format!("# {}", path.display()));
    }
    let yaml =
        serde_yaml::to_string(config.values()).context("Failed to serialise app config to YAML")?;
    for line in yaml.lines() {
        session.reporter().info(line);
    }
    Ok(())
}

fn handle_update(args: UpdateArgs, session: &Session) -> Result<()> {
    session.section("APP ::: Update Config");
    let mut config = session.load_config(Validation::Skip)?;

    for (key, value) in args.assignments {
        debug!("Setting {} = {}", key, value);
        config.set(&key, value);
    }

    for key in REQUIRED_KEYS {
        if !config.contains(key) {
            let value = prompt(key, None, session.is_interactive())?;
            config.set(key, value);
        }
    }

    config.set_schema_version(session.gateway().tool_version());
    let saved = session.gateway().save(&config)?;
    session
        .reporter()
        .info(&format!("App config updated: {}", saved.display()));
    Ok(())
}

fn parse_assignment(raw: &str) -> std::result::Result<(String, String), DrudockError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        DrudockError::ArgumentParsing(format!("expected KEY=VALUE, got '{}'", raw))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(DrudockError::ArgumentParsing(format!(
            "missing key in '{}'",
            raw
        )));
    }
    if key == SCHEMA_VERSION_KEY || key.contains('.') {
        return Err(DrudockError::ArgumentParsing(format!(
            "'{}' cannot be set directly",
            key
        )));
    }
    Ok((key.to_string(), value.to_string()))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ui::{RecordingReporter, Report};
    use crate::core::config::ConfigGateway;
    use crate::core::settings::Settings;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn session(root: &std::path::Path, reporter: Arc<RecordingReporter>) -> Session {
        Session::new(
            reporter,
            Settings::default(),
            ConfigGateway::new(root).with_tool_version("1.4.0"),
        )
        .with_interaction(false)
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("host=a.localhost").unwrap(),
            ("host".to_string(), "a.localhost".to_string())
        );
        assert_eq!(
            parse_assignment("src=a=b").unwrap(),
            ("src".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("host").is_err());
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("drudock.version=9").is_err());
    }

    #[tokio::test]
    async fn test_update_fills_missing_keys_and_restamps() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".config.yml"),
            "appname: demo\napptype: D8\ndist: Local\ndrudock:\n  version: 0.9.0\n",
        )
        .unwrap();
        let reporter = Arc::new(RecordingReporter::new());
        let session = session(dir.path(), reporter);

        let args = ConfigArgs::try_parse_from([
            "config", "update", "--set", "host=demo.localhost", "--set", "src=./web",
        ])
        .unwrap();
        handle_config(args, &session).await.unwrap();

        let cfg = session.load_config(Validation::Enforce).unwrap();
        assert_eq!(cfg.host().as_deref(), Some("demo.localhost"));
        assert_eq!(cfg.get_str("src").as_deref(), Some("./web"));
        assert_eq!(cfg.schema_version().as_deref(), Some("1.4.0"));
    }

    #[tokio::test]
    async fn test_update_without_values_fails_non_interactive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".config.yml"), "appname: demo\n").unwrap();
        let reporter = Arc::new(RecordingReporter::new());
        let session = session(dir.path(), reporter);

        let args = ConfigArgs::try_parse_from(["config", "update"]).unwrap();
        let err = handle_config(args, &session).await.unwrap_err();
        assert!(err.to_string().contains("'apptype'"));
        // Nothing was written.
        assert_eq!(
            fs::read_to_string(dir.path().join(".config.yml")).unwrap(),
            "appname: demo\n"
        );
    }

    #[tokio::test]
    async fn test_show_prints_incomplete_config() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".config.yml"), "appname: demo\n").unwrap();
        let reporter = Arc::new(RecordingReporter::new());
        let session = session(dir.path(), reporter.clone());

        let args = ConfigArgs::try_parse_from(["config", "show"]).unwrap();
        handle_config(args, &session).await.unwrap();
        let events = reporter.events();
        assert_eq!(events[0], Report::Section("APP ::: Config".into()));
        assert!(reporter.infos().contains(&"appname: demo".to_string()));
    }
}

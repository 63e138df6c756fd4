//! # DruDock App Init Handler
//!
//! File: cli/src/commands/app/init.rs
//!
//! ## Overview
//!
//! Implements `drudock app init`: writes a new `.config.yml` in the current
//! directory and renders the app's nginx server block into its docker directory.
//!
//! Values not given as flags are prompted for. With `--no-interaction`, prompts fall
//! back to their defaults; `--name` has no default and must be given.
//!
//! ## Usage
//!
//! ```bash
//! drudock app init
//! drudock -n app init --name "Demo Site" --type D7 --host demo.localhost
//! ```
//!
use crate::commands::context::Session;
use crate::common::ui::prompt;
use crate::core::config::CONFIG_FILENAME;
use crate::core::error::{DrudockError, Result};
use crate::core::templating;
use anyhow::anyhow;
use clap::Parser;
use serde_yaml::Mapping;
use tracing::debug;

/// Default Drupal major version tag for new apps.
const DEFAULT_APPTYPE: &str = "D8";
const DEFAULT_DIST: &str = "Local";
const DEFAULT_SRC: &str = "./src";

#[derive(Parser, Debug)]
#[command(about = "Create the .config.yml for a new app in the current directory")]
pub struct InitArgs {
    /// App name (e.g. "Demo Site").
    #[arg(long)]
    name: Option<String>,
    /// App type: D7, D8 or DEFAULT.
    #[arg(long = "type")]
    apptype: Option<String>,
    /// Hostname nginx serves the app on.
    #[arg(long)]
    host: Option<String>,
    /// Distribution tier: Local, Dev, Stage or Prod.
    #[arg(long)]
    dist: Option<String>,
    /// Path of the Drupal source.
    #[arg(long)]
    src: Option<String>,
}

pub async fn handle_init(args: InitArgs, session: &Session) -> Result<()> {
    session.section("APP ::: Init");
    debug!("Init args: {:?}", args);

    let target = session.gateway().root().join(CONFIG_FILENAME);
    if target.exists() {
        return Err(anyhow!(DrudockError::FileSystem(format!(
            "An app config already exists at {}. Use [drudock app config update] to change it.",
            target.display()
        ))));
    }

    let values = collect_values(args, session)?;
    let config = session.gateway().create(values);
    let saved = session.gateway().save(&config)?;
    session
        .reporter()
        .info(&format!("App config written to {}", saved.display()));

    let ctx = session.app_for(config)?;
    let written = templating::write_nginx_files(
        ctx.compose.dir(),
        &ctx.config,
        &session.settings().nginx.default_host,
    )?;
    for path in written {
        session
            .reporter()
            .info(&format!("nginx config written to {}", path.display()));
    }
    Ok(())
}

fn collect_values(args: InitArgs, session: &Session) -> Result<Mapping> {
    let interactive = session.is_interactive();
    let ask = |value: Option<String>, label: &str, default: Option<&str>| -> Result<String> {
        match value {
            Some(v) => Ok(v),
            None => prompt(label, default, interactive),
        }
    };

    let appname = ask(args.name, "App name", None)?;
    let apptype = ask(args.apptype, "App type (D7, D8, DEFAULT)", Some(DEFAULT_APPTYPE))?;
    let default_host = session.settings().nginx.default_host.clone();
    let host = ask(args.host, "Host", Some(default_host.as_str()))?;
    let dist = ask(args.dist, "Distribution (Local, Dev, Stage, Prod)", Some(DEFAULT_DIST))?;
    let src = ask(args.src, "Source path", Some(DEFAULT_SRC))?;

    if appname.trim().is_empty() {
        return Err(anyhow!(DrudockError::ArgumentParsing(
            "App name must not be empty.".to_string()
        )));
    }

    let mut values = Mapping::new();
    values.insert("appname".into(), appname.into());
    values.insert("apptype".into(), apptype.into());
    values.insert("host".into(), host.into());
    values.insert("dist".into(), dist.into());
    values.insert("src".into(), src.into());
    Ok(values)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ui::RecordingReporter;
    use crate::core::config::{ConfigGateway, Validation};
    use crate::core::settings::Settings;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn offline_session(root: &std::path::Path) -> Session {
        Session::new(
            Arc::new(RecordingReporter::new()),
            Settings::default(),
            ConfigGateway::new(root),
        )
        .with_interaction(false)
    }

    #[tokio::test]
    async fn test_init_writes_config_and_nginx() {
        let dir = tempdir().unwrap();
        let session = offline_session(dir.path());
        let args = InitArgs::try_parse_from(["init", "--name", "Demo Site", "--host", "demo.localhost"])
            .unwrap();
        handle_init(args, &session).await.unwrap();

        let cfg = session.load_config(Validation::Enforce).unwrap();
        assert_eq!(cfg.appname().as_deref(), Some("Demo Site"));
        assert_eq!(cfg.apptype().as_deref(), Some(DEFAULT_APPTYPE));
        assert_eq!(cfg.get_str("src").as_deref(), Some(DEFAULT_SRC));
        assert_eq!(cfg.schema_version().as_deref(), Some(env!("CARGO_PKG_VERSION")));
        assert!(dir
            .path()
            .join("docker_demosite/config/nginx/drudock.localhost")
            .is_file());
    }

    #[tokio::test]
    async fn test_init_requires_name_without_interaction() {
        let dir = tempdir().unwrap();
        let session = offline_session(dir.path());
        let args = InitArgs::try_parse_from(["init"]).unwrap();
        let err = handle_init(args, &session).await.unwrap_err();
        assert!(err.to_string().contains("App name"));
        assert!(!dir.path().join(CONFIG_FILENAME).exists());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "appname: old\n").unwrap();
        let session = offline_session(dir.path());
        let args = InitArgs::try_parse_from(["init", "--name", "new"]).unwrap();
        let err = handle_init(args, &session).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap(),
            "appname: old\n"
        );
    }
}

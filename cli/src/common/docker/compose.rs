//! # DruDock Compose Project
//!
//! File: cli/src/common/docker/compose.rs
//!
//! ## Overview
//!
//! Derives everything needed to address an app's docker-compose stack from its
//! `.config.yml`, and builds the structured `CommandLine`s commands run through the
//! process runner.
//!
//! ## Layout
//!
//! For an app named `My App` with distribution tier `dist`:
//! - Compose project name: `myapp` (the system app name), always passed explicitly
//! - Docker directory: `<app root>/docker_myapp`
//! - Compose file: `docker-compose.yml` for Local, Dev and unknown tiers;
//!   `docker-compose-stage.yml` / `docker-compose-prod.yml` for Stage / Prod
//! - Prod apps may also ship `docker-compose-nginx-proxy.yml`, a shared reverse proxy
//!   run as its own compose project named `proxy`
//!
//! ## Usage
//!
//! ```rust
//! let project = ComposeProject::from_config(root, &cfg, &settings)?;
//! let cmd = project.exec("redis", ["redis-cli", "info"], false);
//! // docker-compose -f <root>/docker_demo/docker-compose.yml --project-name demo exec -T redis redis-cli info
//! ```
//!
use crate::common::process::CommandLine;
use crate::core::config::{DistributionTier, ProjectConfig};
use crate::core::error::{DrudockError, Result};
use crate::core::settings::Settings;
use anyhow::anyhow;
use std::path::{Path, PathBuf};

/// Prefix of the per-app docker directory.
pub const PATH_PREFIX: &str = "docker_";
/// Compose file of the nginx reverse proxy, inside the docker directory.
pub const PROXY_COMPOSE_FILE: &str = "docker-compose-nginx-proxy.yml";
/// Compose project name the reverse proxy runs under.
pub const PROXY_PROJECT: &str = "proxy";

#[derive(Debug, Clone, PartialEq)]
pub struct ComposeProject {
    name: String,
    tier: DistributionTier,
    dir: PathBuf,
    file: PathBuf,
    compose: CommandLine,
}

impl ComposeProject {
    /// Builds the project for `config`, with the docker directory under `root`.
    ///
    /// # Errors
    ///
    /// `DrudockError::ConfigIncomplete` when the config has no `appname`.
    pub fn from_config(root: &Path, config: &ProjectConfig, settings: &Settings) -> Result<Self> {
        let name = config
            .system_appname()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                anyhow!(DrudockError::ConfigIncomplete {
                    missing: vec!["appname".to_string()],
                })
            })?;
        let tier = config.dist().unwrap_or(DistributionTier::Local);
        let dir = root.join(format!("{}{}", PATH_PREFIX, name));
        let file = dir.join(compose_file_name(&tier));
        Ok(Self {
            name,
            tier,
            dir,
            file,
            compose: settings.compose_command(),
        })
    }

    /// Compose project name (the system app name).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tier(&self) -> &DistributionTier {
        &self.tier
    }

    /// The app's docker directory (`docker_<app>`).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// `docker-compose -f <file> --project-name <name>`
    pub fn base(&self) -> CommandLine {
        self.compose
            .clone()
            .arg("-f")
            .arg(self.file.to_string_lossy())
            .arg("--project-name")
            .arg(self.name.as_str())
    }

    /// `exec` into `service`. Without a tty `-T` is added so compose does not try to
    /// allocate one.
    pub fn exec<I, S>(&self, service: &str, args: I, tty: bool) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cmd = self.base().arg("exec");
        let cmd = if tty { cmd } else { cmd.arg("-T") };
        cmd.arg(service).args(args)
    }

    pub fn up(&self) -> CommandLine {
        self.base().args(["up", "-d"])
    }

    pub fn stop(&self) -> CommandLine {
        self.base().arg("stop")
    }

    pub fn restart(&self) -> CommandLine {
        self.base().arg("restart")
    }

    pub fn ps(&self) -> CommandLine {
        self.base().arg("ps")
    }

    /// Stops and removes the project's containers and networks.
    pub fn down(&self) -> CommandLine {
        self.base().arg("down")
    }

    /// `docker-compose -f <dir>/docker-compose-nginx-proxy.yml --project-name proxy`
    ///
    /// # Errors
    ///
    /// `ArgumentParsing` unless the app is on the Prod tier, `FileSystem` when the
    /// proxy compose file does not exist.
    pub fn proxy(&self) -> Result<CommandLine> {
        if self.tier != DistributionTier::Prod {
            return Err(anyhow!(DrudockError::ArgumentParsing(format!(
                "The nginx proxy is only available for Prod apps (dist: {}).",
                self.tier
            ))));
        }
        let file = self.dir.join(PROXY_COMPOSE_FILE);
        if !file.is_file() {
            return Err(anyhow!(DrudockError::FileSystem(format!(
                "{} not found",
                file.display()
            ))));
        }
        Ok(self
            .compose
            .clone()
            .arg("-f")
            .arg(file.to_string_lossy())
            .arg("--project-name")
            .arg(PROXY_PROJECT))
    }

    pub fn logs(&self, service: Option<&str>, follow: bool) -> CommandLine {
        let cmd = self.base().arg("logs");
        let cmd = if follow { cmd.arg("-f") } else { cmd };
        match service {
            Some(s) => cmd.arg(s),
            None => cmd,
        }
    }
}

fn compose_file_name(tier: &DistributionTier) -> String {
    match tier {
        DistributionTier::Stage => "docker-compose-stage.yml".to_string(),
        DistributionTier::Prod => "docker-compose-prod.yml".to_string(),
        _ => "docker-compose.yml".to_string(),
    }
}

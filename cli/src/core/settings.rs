//! # DruDock Tool Settings
//!
//! File: cli/src/core/settings.rs
//!
//! ## Overview
//!
//! Per-user settings for DruDock itself, as opposed to the per-app `.config.yml`
//! handled by `core::config`. Every value has a default, so the settings file is
//! optional.
//!
//! ## Sources
//!
//! 1. The file named by the `DRUDOCK_SETTINGS` environment variable (`~` expanded)
//! 2. `<config dir>/drudock/config.toml` (e.g. `~/.config/drudock/config.toml`)
//! 3. Built-in defaults
//!
//! ## Example
//!
//! ```toml
//! [runner]
//! timeout_secs = 7200
//! idle_timeout_secs = 900
//! tolerated_exit_codes = [129, 130]
//!
//! [compose]
//! binary = "docker compose"
//!
//! [mysql]
//! password = "secret"
//! ```
//!
use crate::common::process::{CommandLine, ExitPolicy, ProcessSpec, COMPOSE_EXEC_TTY_EXIT};
use crate::core::error::{DrudockError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable that points at an explicit settings file.
pub const SETTINGS_ENV: &str = "DRUDOCK_SETTINGS";
/// Upper bound for either runner timeout (one year).
pub const MAX_TIMEOUT_SECS: u64 = 365 * 24 * 3600;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub runner: RunnerSettings,
    #[serde(default)]
    pub compose: ComposeSettings,
    #[serde(default)]
    pub mysql: MysqlSettings,
    #[serde(default)]
    pub nginx: NginxSettings,
}

/// Process runner limits and exit-code policy.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunnerSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Non-zero exit codes treated as success. Defaults to `[129]`, the code
    /// `docker-compose exec` returns after a tty session.
    #[serde(default = "default_tolerated_exit_codes")]
    pub tolerated_exit_codes: Vec<i32>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ComposeSettings {
    /// Compose executable. May contain a subcommand, e.g. `docker compose`.
    #[serde(default = "default_compose_binary")]
    pub binary: String,
    #[serde(default = "default_docker_binary")]
    pub docker_binary: String,
}

/// Credentials of the development database inside the `mysql` service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MysqlSettings {
    #[serde(default = "default_mysql_user")]
    pub user: String,
    #[serde(default = "default_mysql_password")]
    pub password: String,
    #[serde(default = "default_mysql_database")]
    pub database: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NginxSettings {
    /// Host used when an app config has no `host`.
    #[serde(default = "default_nginx_host")]
    pub default_host: String,
}

fn default_timeout_secs() -> u64 {
    3600
}
fn default_idle_timeout_secs() -> u64 {
    600
}
fn default_tolerated_exit_codes() -> Vec<i32> {
    vec![COMPOSE_EXEC_TTY_EXIT]
}
fn default_compose_binary() -> String {
    "docker-compose".to_string()
}
fn default_docker_binary() -> String {
    "docker".to_string()
}
fn default_mysql_user() -> String {
    "dev".to_string()
}
fn default_mysql_password() -> String {
    "DEVPASSWORD".to_string()
}
fn default_mysql_database() -> String {
    "dev_db".to_string()
}
fn default_nginx_host() -> String {
    "drudock.localhost".to_string()
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            tolerated_exit_codes: default_tolerated_exit_codes(),
        }
    }
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            binary: default_compose_binary(),
            docker_binary: default_docker_binary(),
        }
    }
}

impl Default for MysqlSettings {
    fn default() -> Self {
        Self {
            user: default_mysql_user(),
            password: default_mysql_password(),
            database: default_mysql_database(),
        }
    }
}

impl Default for NginxSettings {
    fn default() -> Self {
        Self {
            default_host: default_nginx_host(),
        }
    }
}

impl Settings {
    /// Loads settings from `DRUDOCK_SETTINGS`, the user config directory, or defaults.
    pub fn load() -> Result<Settings> {
        if let Ok(explicit) = std::env::var(SETTINGS_ENV) {
            let path = PathBuf::from(shellexpand::tilde(&explicit).into_owned());
            info!("Loading settings from {} (via {})", path.display(), SETTINGS_ENV);
            return Self::load_from_path(&path);
        }
        match user_settings_path() {
            Some(path) if path.is_file() => {
                info!("Loading settings from {}", path.display());
                Self::load_from_path(&path)
            }
            Some(path) => {
                debug!("No settings file at {}, using defaults", path.display());
                Ok(Settings::default())
            }
            None => {
                debug!("Could not determine user config directory, using default settings");
                Ok(Settings::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.runner.timeout_secs == 0 {
            return Err(anyhow!(DrudockError::Settings(
                "runner.timeout_secs must be greater than zero".to_string()
            )));
        }
        if self.runner.idle_timeout_secs == 0 {
            return Err(anyhow!(DrudockError::Settings(
                "runner.idle_timeout_secs must be greater than zero".to_string()
            )));
        }
        for (key, value) in [
            ("timeout_secs", self.runner.timeout_secs),
            ("idle_timeout_secs", self.runner.idle_timeout_secs),
        ] {
            if value > MAX_TIMEOUT_SECS {
                return Err(anyhow!(DrudockError::Settings(format!(
                    "runner.{} must not exceed {} seconds",
                    key, MAX_TIMEOUT_SECS
                ))));
            }
        }
        if self.compose.binary.trim().is_empty() {
            return Err(anyhow!(DrudockError::Settings(
                "compose.binary must not be empty".to_string()
            )));
        }
        Ok(())
    }

    pub fn exit_policy(&self) -> ExitPolicy {
        ExitPolicy::with_tolerated(self.runner.tolerated_exit_codes.iter().copied())
    }

    /// A process spec carrying the configured timeouts.
    pub fn process_spec(&self, command: CommandLine, tty: bool) -> ProcessSpec {
        ProcessSpec::new(command)
            .with_timeout(Duration::from_secs(self.runner.timeout_secs))
            .with_idle_timeout(Duration::from_secs(self.runner.idle_timeout_secs))
            .with_tty(tty)
    }

    /// Splits `compose.binary` into program and leading arguments.
    pub fn compose_command(&self) -> CommandLine {
        let mut words = self.compose.binary.split_whitespace();
        let program = words.next().unwrap_or("docker-compose");
        CommandLine::new(program).args(words)
    }
}

fn user_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "DruDock", "drudock").map(|dirs| dirs.config_dir().join("config.toml"))
}

//! # DruDock Command Context
//!
//! File: cli/src/commands/context.rs
//!
//! ## Overview
//!
//! State shared by every command handler for one invocation of the tool. `main`
//! builds a single `Session` from the global flags and passes it down; handlers that
//! act on an app turn it into an `AppContext` holding the loaded `.config.yml` and the
//! app's compose project.
//!
//! ## Architecture
//!
//! - **`Session`**: The reporter, tool settings, config gateway, `--app` hint and
//!   the `--no-interaction` flag.
//! - **`AppContext`**: Borrowed from a `Session`. Runs command lines through the
//!   process runner with the configured timeouts and exit policy, and checks that the
//!   compose services a command needs are up.
//!
//! ## Usage
//!
//! ```rust
//! let ctx = session.app(Validation::Enforce)?;
//! ctx.require(&["redis"]).await?;
//! ctx.exec("redis", ["redis-cli", "info"], false).await?;
//! ```
//!
use crate::common::docker::state::{self, ServiceContainer};
use crate::common::docker::ComposeProject;
use crate::common::process::{self, CommandLine, ProcessOutcome};
use crate::common::ui::Reporter;
use crate::core::config::{ConfigGateway, ProjectConfig, Validation};
use crate::core::error::Result;
use crate::core::settings::Settings;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub struct Session {
    reporter: Arc<dyn Reporter>,
    settings: Settings,
    gateway: ConfigGateway,
    app_hint: Option<String>,
    interactive: bool,
}

impl Session {
    pub fn new(reporter: Arc<dyn Reporter>, settings: Settings, gateway: ConfigGateway) -> Self {
        Self {
            reporter,
            settings,
            gateway,
            app_hint: None,
            interactive: true,
        }
    }

    pub fn with_app_hint(mut self, app_hint: Option<String>) -> Self {
        self.app_hint = app_hint;
        self
    }

    pub fn with_interaction(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn gateway(&self) -> &ConfigGateway {
        &self.gateway
    }

    pub fn app_hint(&self) -> Option<&str> {
        self.app_hint.as_deref()
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn section(&self, title: &str) {
        self.reporter.section(title);
    }

    pub fn load_config(&self, validation: Validation) -> Result<ProjectConfig> {
        self.gateway
            .load(self.app_hint(), self.reporter(), validation)
    }

    /// Loads the active app config and derives its compose project.
    pub fn app(&self, validation: Validation) -> Result<AppContext<'_>> {
        let config = self.load_config(validation)?;
        self.app_for(config)
    }

    /// Builds the context for an already loaded (or freshly created) config.
    pub fn app_for(&self, config: ProjectConfig) -> Result<AppContext<'_>> {
        // The docker directory lives next to the config file.
        let root = config
            .path()
            .and_then(Path::parent)
            .unwrap_or_else(|| self.gateway.root())
            .to_path_buf();
        let compose = ComposeProject::from_config(&root, &config, &self.settings)?;
        debug!(
            "App '{}' uses compose file {}",
            compose.name(),
            compose.file().display()
        );
        Ok(AppContext {
            session: self,
            config,
            compose,
        })
    }
}

pub struct AppContext<'a> {
    session: &'a Session,
    pub config: ProjectConfig,
    pub compose: ComposeProject,
}

impl AppContext<'_> {
    pub fn reporter(&self) -> &dyn Reporter {
        self.session.reporter()
    }

    pub fn settings(&self) -> &Settings {
        self.session.settings()
    }

    /// Runs `command` with the configured timeouts and exit policy.
    pub async fn run(&self, command: CommandLine, tty: bool) -> Result<ProcessOutcome> {
        let settings = self.session.settings();
        let spec = settings.process_spec(command, tty);
        process::run(&spec, &settings.exit_policy(), self.reporter()).await
    }

    /// `docker-compose exec` into one of the app's services.
    pub async fn exec<I, S>(&self, service: &str, args: I, tty: bool) -> Result<ProcessOutcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(self.compose.exec(service, args, tty), tty).await
    }

    /// Fails with `ContainersNotRunning` unless every service in `services` is up.
    pub async fn require(&self, services: &[&str]) -> Result<Vec<ServiceContainer>> {
        state::ensure_services_running(self.compose.name(), services).await
    }
}

//! # DruDock App Command Group
//!
//! File: cli/src/commands/app/mod.rs
//!
//! ## Overview
//!
//! This module is the entry point and router for `drudock app`: creating an app's
//! `.config.yml`, inspecting and repairing it, and driving the app's compose stack
//! (start, stop, restart, status, destroy, exec, bash).
//!
//! ## Architecture
//!
//! - `AppArgs`: Top-level arguments for the group.
//! - `AppCommand`: One variant per subcommand, each holding that subcommand's args.
//! - `handle_app`: Dispatches to the handler in the matching submodule.
//!
//! ## Examples
//!
//! ```bash
//! drudock app init --name "Demo Site" --type D8 --dist Local
//! drudock app start
//! drudock app exec -s php -- php -v
//! drudock app config update --set host=demo.localhost
//! ```
//!
use crate::commands::context::Session;
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Implements `drudock app about`.
mod about;
/// Implements `drudock app bash`.
mod bash;
/// Implements `drudock app config show|update`.
mod config;
/// Implements `drudock app exec`.
mod exec;
/// Implements `drudock app init`.
mod init;
/// Implements `drudock app start|stop|restart|status|destroy`.
mod lifecycle;

pub use config::ConfigCommand;

#[derive(Parser, Debug)]
pub struct AppArgs {
    #[command(subcommand)]
    pub command: AppCommand,
}

#[derive(Subcommand, Debug)]
pub enum AppCommand {
    /// Create the .config.yml for a new app.
    Init(init::InitArgs),
    /// Show or update the app config.
    Config(config::ConfigArgs),
    /// Start the app containers.
    Start(lifecycle::StartArgs),
    /// Stop the app containers.
    Stop(lifecycle::StopArgs),
    /// Restart the app containers.
    Restart(lifecycle::RestartArgs),
    /// Show the status of the app containers.
    Status(lifecycle::StatusArgs),
    /// Stop and remove the app containers.
    Destroy(lifecycle::DestroyArgs),
    /// Run a command inside one of the app's services.
    Exec(exec::ExecArgs),
    /// Open a bash shell inside one of the app's containers.
    Bash(bash::BashArgs),
    /// Show DruDock and Docker versions.
    About(about::AboutArgs),
}

impl AppCommand {
    /// Whether the command works without a reachable Docker daemon.
    pub fn works_offline(&self) -> bool {
        matches!(
            self,
            AppCommand::About(_)
                | AppCommand::Config(config::ConfigArgs {
                    command: ConfigCommand::Show(_)
                })
        )
    }
}

pub async fn handle_app(args: AppArgs, session: &Session) -> Result<()> {
    match args.command {
        AppCommand::Init(args) => init::handle_init(args, session).await?,
        AppCommand::Config(args) => config::handle_config(args, session).await?,
        AppCommand::Start(args) => lifecycle::handle_start(args, session).await?,
        AppCommand::Stop(args) => lifecycle::handle_stop(args, session).await?,
        AppCommand::Restart(args) => lifecycle::handle_restart(args, session).await?,
        AppCommand::Status(args) => lifecycle::handle_status(args, session).await?,
        AppCommand::Destroy(args) => lifecycle::handle_destroy(args, session).await?,
        AppCommand::Exec(args) => exec::handle_exec(args, session).await?,
        AppCommand::Bash(args) => bash::handle_bash(args, session).await?,
        AppCommand::About(args) => about::handle_about(args, session).await?,
    }
    Ok(())
}

//! # DruDock Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the DruDock CLI application.
//! It handles:
//! - Command-line argument parsing using Clap, including the global output flags
//! - Setting up the logging system based on verbosity flags
//! - Checking that the Docker daemon is reachable before commands that need it
//! - Routing execution to the command group handlers
//!
//! ## Architecture
//!
//! - Each command group (`app`, `mysql`, `drush`, `redis`, `nginx`) is a variant of
//!   the `Commands` enum, handled by its module under `commands::`
//! - Handlers return errors; only this file reports them and sets the exit code
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! drudock --help
//!
//! # Redis info for the app in ./demo, without section labels
//! drudock --app demo --clean-output redis info
//!
//! # Debug logging
//! drudock -vv app start
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging and colours
//! 3. Load settings and build the `Session`
//! 4. Check the Docker daemon (skipped for `app about` and `app config show`)
//! 5. Route to the command handler, reporting any error and exiting with 1
//!
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command groups and the shared session.
mod common; // Shared utilities (process runner, docker, fs, ui).
mod core; // Core infrastructure (config gateway, settings, errors, templating).

use crate::commands::context::Session;
use crate::common::docker::{self, connect::DOCKER_PING_TIMEOUT};
use crate::common::ui::{ConsoleReporter, Reporter};
use crate::core::config::ConfigGateway;
use crate::core::error::{DrudockError, Result};
use crate::core::settings::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "drudock",
    about = "DruDock: Drupal development environments on docker-compose",
    long_about = "Manage Drupal apps running under docker-compose: app lifecycle, Drush,\n\
                  MySQL, Redis and nginx operations behind one CLI.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Do not output any message except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Clean output without section labels.
    #[arg(long, global = true)]
    clean_output: bool,

    /// Force ANSI colour output.
    #[arg(long, global = true, conflicts_with = "no_ansi")]
    ansi: bool,

    /// Disable ANSI colour output.
    #[arg(long, global = true)]
    no_ansi: bool,

    /// Do not ask any interactive question.
    #[arg(short = 'n', long, global = true)]
    no_interaction: bool,

    /// App directory to look for .config.yml in when it is not in the current directory.
    #[arg(long, global = true, value_name = "NAME")]
    app: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// App config and container lifecycle.
    App(commands::app::AppArgs),
    /// MySQL import, export and monitoring.
    Mysql(commands::mysql::MysqlArgs),
    /// Drush operations.
    Drush(commands::drush::DrushArgs),
    /// Redis operations.
    Redis(commands::redis::RedisArgs),
    /// nginx operations.
    Nginx(commands::nginx::NginxArgs),
}

impl Commands {
    fn needs_docker(&self) -> bool {
        match self {
            Commands::App(args) => !args.command.works_offline(),
            _ => true,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    if cli.ansi || cli.no_ansi {
        console::set_colors_enabled(cli.ansi);
        console::set_colors_enabled_stderr(cli.ansi);
    }

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let reporter = Arc::new(ConsoleReporter::new(cli.quiet, cli.clean_output));
    if let Err(e) = run(cli, reporter.clone()).await {
        tracing::error!("Command execution failed: {:?}", e);
        if let Some(code) = e.downcast_ref::<DrudockError>().and_then(DrudockError::exit_code) {
            tracing::debug!("Failing subprocess exited with {}", code);
        }
        reporter.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli, reporter: Arc<ConsoleReporter>) -> Result<()> {
    let settings = Settings::load()?;
    let session = Session::new(reporter, settings, ConfigGateway::current_dir()?)
        .with_app_hint(cli.app)
        .with_interaction(!cli.no_interaction);

    if cli.command.needs_docker() {
        docker::ensure_docker_available(DOCKER_PING_TIMEOUT).await?;
    }

    match cli.command {
        Commands::App(args) => commands::app::handle_app(args, &session).await,
        Commands::Mysql(args) => commands::mysql::handle_mysql(args, &session).await,
        Commands::Drush(args) => commands::drush::handle_drush(args, &session).await,
        Commands::Redis(args) => commands::redis::handle_redis(args, &session).await,
        Commands::Nginx(args) => commands::nginx::handle_nginx(args, &session).await,
    }
}

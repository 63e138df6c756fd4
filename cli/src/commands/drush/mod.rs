//! # DruDock Drush Command Group
//!
//! File: cli/src/commands/drush/mod.rs
//!
//! ## Overview
//!
//! `drudock drush <sub>`: common Drush operations run inside the app's `php` service
//! (`docker-compose exec -T php drush --root=/app/www <args>`).
//!
//! Some operations differ by Drupal major version, read from the `apptype` key:
//! - `cr` runs `cc all` on D7 apps
//! - `dis` runs `dis` on D7 and `pm-uninstall` on later versions
//! - `cex` / `cim` need configuration management and are refused on D7
//!
//! ## Examples
//!
//! ```bash
//! drudock drush cr
//! drudock drush en devel views_ui
//! drudock drush uli
//! ```
//!
use crate::commands::context::Session;
use crate::core::config::Validation;
use crate::core::error::{DrudockError, Result};
use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing::debug;

const PHP_SERVICE: &str = "php";
const DRUPAL_ROOT: &str = "--root=/app/www";

#[derive(Parser, Debug)]
pub struct DrushArgs {
    #[command(subcommand)]
    command: DrushCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum DrushCommand {
    /// Rebuild Drupal caches (cc all on Drupal 7).
    Cr,
    /// Run pending database updates.
    Updb,
    /// Generate a one-time admin login link.
    Uli,
    /// Enable modules.
    En {
        #[arg(required = true)]
        modules: Vec<String>,
    },
    /// Disable (D7) or uninstall (D8+) modules.
    Dis {
        #[arg(required = true)]
        modules: Vec<String>,
    },
    /// Export configuration (D8+).
    Cex,
    /// Import configuration (D8+).
    Cim,
    /// Rebuild the Drupal 7 registry.
    Rr,
}

impl DrushCommand {
    fn title(&self) -> &'static str {
        match self {
            DrushCommand::Cr => "Cache Rebuild",
            DrushCommand::Updb => "Database Updates",
            DrushCommand::Uli => "Login",
            DrushCommand::En { .. } => "Enable Modules",
            DrushCommand::Dis { .. } => "Disable Modules",
            DrushCommand::Cex => "Config Export",
            DrushCommand::Cim => "Config Import",
            DrushCommand::Rr => "Registry Rebuild",
        }
    }
}

pub async fn handle_drush(args: DrushArgs, session: &Session) -> Result<()> {
    session.section(&format!("DRUSH ::: {}", args.command.title()));
    let ctx = session.app(Validation::Enforce)?;
    let drush_args = invocation(
        &args.command,
        ctx.config.apptype().as_deref(),
        ctx.config.host().as_deref(),
    )?;
    debug!("drush {:?}", drush_args);

    ctx.require(&[PHP_SERVICE]).await?;
    let mut command = vec!["drush".to_string(), DRUPAL_ROOT.to_string()];
    command.extend(drush_args);
    ctx.exec(PHP_SERVICE, command, false).await?;
    Ok(())
}

fn is_d7(apptype: Option<&str>) -> bool {
    apptype.is_some_and(|t| t.trim().eq_ignore_ascii_case("D7"))
}

/// The drush arguments a subcommand runs for a given app.
fn invocation(
    command: &DrushCommand,
    apptype: Option<&str>,
    host: Option<&str>,
) -> Result<Vec<String>> {
    let d7 = is_d7(apptype);
    let words = |w: &[&str]| w.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let with_modules = |w: &[&str], modules: &[String]| {
        let mut args = words(w);
        args.extend(modules.iter().cloned());
        args
    };

    let args = match command {
        DrushCommand::Cr if d7 => words(&["cc", "all"]),
        DrushCommand::Cr => words(&["cr"]),
        DrushCommand::Updb => words(&["updb", "-y"]),
        DrushCommand::Uli => {
            let mut args = words(&["uli"]);
            if let Some(h) = host {
                args.push(format!("--uri=http://{}", h));
            }
            args
        }
        DrushCommand::En { modules } => with_modules(&["en", "-y"], modules),
        DrushCommand::Dis { modules } if d7 => with_modules(&["dis", "-y"], modules),
        DrushCommand::Dis { modules } => with_modules(&["pm-uninstall", "-y"], modules),
        DrushCommand::Cex | DrushCommand::Cim if d7 => {
            return Err(anyhow!(DrudockError::ArgumentParsing(
                "Configuration export/import is not available for D7 apps.".to_string()
            )));
        }
        DrushCommand::Cex => words(&["cex", "-y"]),
        DrushCommand::Cim => words(&["cim", "-y"]),
        DrushCommand::Rr => words(&["rr"]),
    };
    Ok(args)
}

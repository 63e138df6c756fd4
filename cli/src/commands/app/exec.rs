//! # DruDock App Exec Handler
//!
//! File: cli/src/commands/app/exec.rs
//!
//! ## Overview
//!
//! Implements `drudock app exec`: runs an arbitrary command inside one of the app's
//! compose services via `docker-compose exec`. Without `--tty` the output is
//! streamed through the reporter; with it the command is attached to the terminal.
//!
//! ## Usage
//!
//! ```bash
//! drudock app exec -- ls -la /app/www
//! drudock app exec -s mysql -t -- mysql -u dev -p
//! ```
//!
use crate::commands::context::Session;
use crate::core::config::Validation;
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(about = "Run a command inside one of the app's services")]
pub struct ExecArgs {
    /// Compose service to run the command in.
    #[arg(short, long, default_value = "php")]
    service: String,
    /// Attach the command to the terminal (for interactive programs).
    #[arg(short, long)]
    tty: bool,
    /// The command and its arguments.
    #[arg(required = true, last = true)]
    command: Vec<String>,
}

pub async fn handle_exec(args: ExecArgs, session: &Session) -> Result<()> {
    session.section(&format!("APP ::: Exec in {}", args.service));
    debug!("Exec args: {:?}", args);
    let ctx = session.app(Validation::Enforce)?;
    ctx.require(&[args.service.as_str()]).await?;
    ctx.exec(&args.service, args.command, args.tty).await?;
    Ok(())
}

//! # DruDock App Bash Handler
//!
//! File: cli/src/commands/app/bash.rs
//!
//! ## Overview
//!
//! Implements `drudock app bash`: an interactive bash shell in one of the app's
//! containers. The container is looked up by its compose labels and entered with
//! `docker exec -it <container> bash`, attached to the operator's terminal.
//!
use crate::commands::context::Session;
use crate::common::docker::state::ServiceContainer;
use crate::common::process::CommandLine;
use crate::core::config::Validation;
use crate::core::error::{DrudockError, Result};
use anyhow::anyhow;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Open a bash shell inside one of the app's containers")]
pub struct BashArgs {
    /// Compose service whose container to enter.
    #[arg(short, long, default_value = "php")]
    service: String,
}

pub async fn handle_bash(args: BashArgs, session: &Session) -> Result<()> {
    session.section("APP ::: Bash");
    let ctx = session.app(Validation::Enforce)?;
    let running = ctx.require(&[args.service.as_str()]).await?;
    let container = container_for(&running, &args.service).ok_or_else(|| {
        anyhow!(DrudockError::ContainersNotRunning {
            app: ctx.compose.name().to_string(),
            services: vec![args.service.clone()],
        })
    })?;
    let cmd = bash_command(&session.settings().compose.docker_binary, container);
    ctx.run(cmd, true).await?;
    Ok(())
}

fn container_for<'a>(running: &'a [ServiceContainer], service: &str) -> Option<&'a str> {
    running
        .iter()
        .find(|c| c.service == service)
        .map(|c| c.name.as_str())
}

fn bash_command(docker_binary: &str, container: &str) -> CommandLine {
    CommandLine::new(docker_binary).args(["exec", "-it", container, "bash"])
}

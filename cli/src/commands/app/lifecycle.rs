//! # DruDock App Lifecycle Handlers
//!
//! File: cli/src/commands/app/lifecycle.rs
//!
//! ## Overview
//!
//! `drudock app start|stop|restart|status|destroy`: thin wrappers over
//! `docker-compose up -d`, `stop`, `restart`, `ps` and `down` for the app's compose
//! project.
//!
use crate::commands::context::Session;
use crate::common::ui;
use crate::core::config::Validation;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Start the app containers (docker-compose up -d)")]
pub struct StartArgs {}

#[derive(Parser, Debug)]
#[command(about = "Stop the app containers")]
pub struct StopArgs {}

#[derive(Parser, Debug)]
#[command(about = "Restart the app containers")]
pub struct RestartArgs {}

#[derive(Parser, Debug)]
#[command(about = "Show the app containers (docker-compose ps)")]
pub struct StatusArgs {}

#[derive(Parser, Debug)]
#[command(about = "Stop and remove the app containers (docker-compose down)")]
pub struct DestroyArgs {}

pub async fn handle_start(_args: StartArgs, session: &Session) -> Result<()> {
    session.section("APP ::: Starting App Containers");
    let ctx = session.app(Validation::Enforce)?;
    info!(
        "Starting compose project '{}' ({} tier)",
        ctx.compose.name(),
        ctx.compose.tier()
    );
    ctx.run(ctx.compose.up(), false).await?;
    Ok(())
}

pub async fn handle_stop(_args: StopArgs, session: &Session) -> Result<()> {
    session.section("APP ::: Stopping App Containers");
    let ctx = session.app(Validation::Enforce)?;
    info!("Stopping compose project '{}'", ctx.compose.name());
    ctx.run(ctx.compose.stop(), false).await?;
    Ok(())
}

pub async fn handle_restart(_args: RestartArgs, session: &Session) -> Result<()> {
    session.section("APP ::: Restarting App Containers");
    let ctx = session.app(Validation::Enforce)?;
    ctx.run(ctx.compose.restart(), false).await?;
    Ok(())
}

pub async fn handle_status(_args: StatusArgs, session: &Session) -> Result<()> {
    session.section("APP ::: Status");
    let ctx = session.app(Validation::Enforce)?;
    ctx.run(ctx.compose.ps(), false).await?;
    Ok(())
}

pub async fn handle_destroy(_args: DestroyArgs, session: &Session) -> Result<()> {
    session.section("APP ::: Destroying App Containers");
    let ctx = session.app(Validation::Enforce)?;
    let question = format!(
        "Remove all containers and networks of '{}'?",
        ctx.compose.name()
    );
    if !ui::confirm(&question, true, session.is_interactive())? {
        session.reporter().info("Aborted, nothing was removed");
        return Ok(());
    }
    info!("Tearing down compose project '{}'", ctx.compose.name());
    ctx.run(ctx.compose.down(), false).await?;
    Ok(())
}

//! # DruDock Nginx Sethost Handler
//!
//! File: cli/src/commands/nginx/sethost.rs
//!
//! ## Overview
//!
//! Implements `drudock nginx sethost`: renders the Drupal server block for the app's
//! host into `docker_<app>/config/nginx/`. With `--host`, the new host is saved to
//! `.config.yml` first. If the `nginx` service is running it is reloaded so the new
//! server block takes effect.
//!
use crate::commands::context::Session;
use crate::common::docker::state;
use crate::core::config::Validation;
use crate::core::error::Result;
use crate::core::templating;
use clap::Parser;
use tracing::debug;

use super::{reload, NGINX_SERVICE};

#[derive(Parser, Debug)]
#[command(about = "Write the nginx server block for the app host")]
pub struct SethostArgs {
    /// New host for the app. Saved to .config.yml.
    #[arg(long)]
    host: Option<String>,
}

pub async fn handle_sethost(args: SethostArgs, session: &Session) -> Result<()> {
    session.section("NGINX ::: Set Host");
    let mut config = session.load_config(Validation::Enforce)?;
    if let Some(host) = args.host {
        config.set("host", host);
        session.gateway().save(&config)?;
    }

    let ctx = session.app_for(config)?;
    let written = templating::write_nginx_files(
        ctx.compose.dir(),
        &ctx.config,
        &session.settings().nginx.default_host,
    )?;
    for path in &written {
        session
            .reporter()
            .info(&format!("nginx config written to {}", path.display()));
    }

    let running = state::running_services(ctx.compose.name()).await?;
    if running.iter().any(|c| c.service == NGINX_SERVICE) {
        reload(&ctx).await?;
    } else {
        debug!("nginx is not running for '{}'", ctx.compose.name());
        session
            .reporter()
            .info("nginx is not running; the new host is used on the next start.");
    }
    Ok(())
}

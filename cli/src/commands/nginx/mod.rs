//! # DruDock Nginx Command Group
//!
//! File: cli/src/commands/nginx/mod.rs
//!
//! ## Overview
//!
//! `drudock nginx reload|monitor|flush-pagespeed|sethost`: operations on the app's
//! `nginx` service and its server block.
//!
//! `proxy-start` / `proxy-stop` drive the shared reverse proxy that Prod apps ship as
//! `docker_<app>/docker-compose-nginx-proxy.yml` (compose project `proxy`).
//!
//! ## Examples
//!
//! ```bash
//! drudock nginx reload
//! drudock nginx sethost --host demo.localhost
//! drudock nginx proxy-start
//! ```
//!
use crate::commands::context::{AppContext, Session};
use crate::core::config::Validation;
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Implements `drudock nginx sethost`.
mod sethost;

const NGINX_SERVICE: &str = "nginx";
const PAGESPEED_CACHE: &str = "/var/ngx_pagespeed_cache";

#[derive(Parser, Debug)]
pub struct NginxArgs {
    #[command(subcommand)]
    command: NginxCommand,
}

#[derive(Subcommand, Debug)]
enum NginxCommand {
    /// Reload the nginx configuration.
    Reload,
    /// Follow the nginx container log.
    Monitor,
    /// Empty the PageSpeed cache and reload nginx.
    FlushPagespeed,
    /// Write the nginx server block for the app host.
    Sethost(sethost::SethostArgs),
    /// Start the shared nginx reverse proxy (Prod apps only).
    ProxyStart,
    /// Stop the shared nginx reverse proxy (Prod apps only).
    ProxyStop,
}

pub async fn handle_nginx(args: NginxArgs, session: &Session) -> Result<()> {
    match args.command {
        NginxCommand::Reload => {
            session.section("NGINX ::: Reload");
            let ctx = session.app(Validation::Enforce)?;
            ctx.require(&[NGINX_SERVICE]).await?;
            reload(&ctx).await?;
        }
        NginxCommand::Monitor => {
            session.section("NGINX ::: Monitor");
            let ctx = session.app(Validation::Enforce)?;
            ctx.require(&[NGINX_SERVICE]).await?;
            ctx.run(ctx.compose.logs(Some(NGINX_SERVICE), true), true)
                .await?;
        }
        NginxCommand::FlushPagespeed => {
            session.section("NGINX ::: Flush PageSpeed Cache");
            let ctx = session.app(Validation::Enforce)?;
            ctx.require(&[NGINX_SERVICE]).await?;
            ctx.exec(NGINX_SERVICE, flush_pagespeed_args(), false)
                .await?;
            reload(&ctx).await?;
        }
        NginxCommand::Sethost(args) => sethost::handle_sethost(args, session).await?,
        NginxCommand::ProxyStart => {
            session.section("NGINX ::: Starting Proxy");
            let ctx = session.app(Validation::Enforce)?;
            ctx.run(ctx.compose.proxy()?.args(["up", "-d"]), false)
                .await?;
        }
        NginxCommand::ProxyStop => {
            session.section("NGINX ::: Stopping Proxy");
            let ctx = session.app(Validation::Enforce)?;
            ctx.run(ctx.compose.proxy()?.arg("stop"), false).await?;
        }
    }
    Ok(())
}

async fn reload(ctx: &AppContext<'_>) -> Result<()> {
    ctx.exec(NGINX_SERVICE, ["nginx", "-s", "reload"], false)
        .await?;
    Ok(())
}

/// The glob has to be expanded inside the container, hence the inner shell.
fn flush_pagespeed_args() -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("rm -rf {}/*", PAGESPEED_CACHE),
    ]
}

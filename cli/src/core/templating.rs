//! # DruDock Templating
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Renders the files nginx needs to serve a Drupal app: the server block (an
//! embedded Tera template with the app host interpolated) and, for hosted tiers,
//! the `nginx.env` file read by the shared nginx proxy.
//!
//! ## Output Layout
//!
//! Relative to the app's docker directory (`./docker_<app>`):
//! - Local / Dev / other tiers: `config/nginx/drudock.localhost`
//! - Stage / Prod: `config/nginx/<host>` and `nginx.env`
//!
//! ## Examples
//!
//! ```rust
//! let conf = templating::render_nginx_config("demo.localhost")?;
//! assert!(conf.contains("server_name demo.localhost;"));
//! ```
//!
use crate::common::fs::io::write_string_to_file;
use crate::core::config::ProjectConfig;
use crate::core::error::{DrudockError, Result};
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use tera::Tera;
use tracing::info;

const NGINX_TEMPLATE: &str = include_str!("../../templates/nginx-drupal.conf.tera");

/// File name of the server block for non-hosted tiers.
pub const LOCAL_SITE_NAME: &str = "drudock.localhost";
const WEB_ROOT: &str = "/app/www";
const PHP_UPSTREAM: &str = "php:9000";

/// Renders the Drupal nginx server block for `host`.
pub fn render_nginx_config(host: &str) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("host", host);
    context.insert("web_root", WEB_ROOT);
    context.insert("php_upstream", PHP_UPSTREAM);
    Tera::one_off(NGINX_TEMPLATE, &context, false)
        .map_err(|e| anyhow!(DrudockError::Template { source: e }))
        .with_context(|| format!("Failed to render nginx config for host '{}'", host))
}

/// Renders the proxy environment file for hosted tiers.
pub fn render_nginx_env(host: &str) -> String {
    format!(
        "VIRTUAL_HOST={}\nAPPS_PATH=~/app\nVIRTUAL_NETWORK=nginx-proxy",
        host
    )
}

/// Writes the nginx files for `config` under `app_dir` and returns their paths.
///
/// The host falls back to `default_host` when the config has none.
pub fn write_nginx_files(
    app_dir: &Path,
    config: &ProjectConfig,
    default_host: &str,
) -> Result<Vec<PathBuf>> {
    let host = config.host().unwrap_or_else(|| default_host.to_string());
    let rendered = render_nginx_config(&host)?;
    let nginx_dir = app_dir.join("config").join("nginx");

    let hosted = config.dist().is_some_and(|d| d.is_hosted());
    let written = if hosted {
        let site = nginx_dir.join(&host);
        write_string_to_file(&site, &rendered)?;
        let env_file = app_dir.join("nginx.env");
        write_string_to_file(&env_file, &render_nginx_env(&host))?;
        vec![site, env_file]
    } else {
        let site = nginx_dir.join(LOCAL_SITE_NAME);
        write_string_to_file(&site, &rendered)?;
        vec![site]
    };
    info!("Wrote nginx config for host '{}': {:?}", host, written);
    Ok(written)
}

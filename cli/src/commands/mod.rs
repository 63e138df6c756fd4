//! # DruDock Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the command groups of the DruDock CLI and the context they
//! share. Each command is a thin adapter: parse arguments, load the app config
//! through the `Session`, build a command line and hand it to the process runner.
//!
//! ## Command Groups
//!
//! - `app`: App config and compose stack lifecycle
//! - `drush`: Drush operations in the `php` service
//! - `mysql`: Database import, export and log monitoring
//! - `nginx`: nginx reload, log monitoring, PageSpeed cache, server block
//! - `redis`: `redis-cli` operations
//!
//! Every handler opens its output with a `<GROUP> ::: <Action>` section.
//!

/// App config and container lifecycle commands (`init`, `config`, `start`, `exec`, ...).
pub mod app;
/// The `Session` / `AppContext` shared by all handlers.
pub mod context;
/// Drush commands (`cr`, `updb`, `uli`, `en`, `dis`, `cex`, `cim`, `rr`).
pub mod drush;
/// MySQL commands (`import`, `export`, `monitor`).
pub mod mysql;
/// nginx commands (`reload`, `monitor`, `flush-pagespeed`, `sethost`).
pub mod nginx;
/// Redis commands (`info`, `ping`, `flush`, `monitor`).
pub mod redis;

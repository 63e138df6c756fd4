//! # DruDock Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components that provide
//! foundational functionality for DruDock: the per-app configuration, the
//! tool-wide settings, error types and templating.
//!
//! ## Architecture
//!
//! - `config`: The config gateway: locating, loading, validating and saving `.config.yml`
//! - `error`: Error types and the `Result` alias
//! - `settings`: Tool settings (runner timeouts, compose binary, MySQL credentials)
//! - `templating`: nginx server block rendering
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::{ConfigGateway, Validation};
//! use crate::core::error::{DrudockError, Result};
//! use crate::core::settings::Settings;
//! ```
//!
pub mod config;
pub mod error;
pub mod settings;
pub mod templating;

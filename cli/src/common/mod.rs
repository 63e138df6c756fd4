//! # DruDock Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utility modules used by the command handlers, kept apart from the
//! command-specific logic (`commands::`) and the core infrastructure (`core::`).
//!
//! ## Architecture
//!
//! - **`docker`**: Daemon availability, compose project addressing and container state.
//! - **`fs`**: Directory creation and file writing.
//! - **`process`**: The process runner: shell command lines with streamed output,
//!   timeouts and an exit-code policy.
//! - **`ui`**: The `Reporter` trait, console styling and interactive prompts.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{process, ui};
//!
//! let outcome = process::run(&spec, &policy, &reporter).await?;
//! let host = ui::prompt("Host", Some("demo.localhost"), interactive)?;
//! ```
//!

/// Docker daemon checks, compose projects and container state.
pub mod docker;
/// Filesystem helpers (directory creation, file writing).
pub mod fs;
/// Running external commands with streaming output and timeouts.
pub mod process;
/// Console output and prompts.
pub mod ui;

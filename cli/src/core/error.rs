//! # DruDock Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the DruDock CLI. Library-like
//! layers (the config gateway, the process runner, the Docker checks) return these
//! typed errors; command handlers propagate them with `anyhow` context and only
//! `main` decides to terminate the process.
//!
//! ## Architecture
//!
//! The error system consists of two components:
//! - `DrudockError`: A `thiserror` enum covering every fatal condition the tool reports
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible propagation
//!
//! The variants cover these domains:
//! - Project configuration (not found, incomplete, unparsable, unwritable)
//! - Tool settings and filesystem preparation
//! - External process execution
//! - Container runtime availability and container state
//! - Template rendering
//!
//! ## Examples
//!
//! ```rust
//! // Branching on a typed error carried inside anyhow
//! match gateway.load(None, &reporter, Validation::Enforce) {
//!     Ok(cfg) => println!("Loaded {}", cfg.appname().unwrap_or_default()),
//!     Err(e) if matches!(e.downcast_ref::<DrudockError>(), Some(DrudockError::ConfigNotFound { .. })) => {
//!         println!("Run `drudock app init` first.");
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the DruDock application.
#[derive(Error, Debug)]
pub enum DrudockError {
    #[error("You're not currently in an APP directory. APP .config.yml not found (searched: {})", display_paths(.searched))]
    ConfigNotFound { searched: Vec<PathBuf> },

    #[error("App config is missing required keys: {}. Run [drudock app config update].", .missing.join(", "))]
    ConfigIncomplete { missing: Vec<String> },

    #[error("Failed to parse app config '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write app config '{}': {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Command failed: {cmd} ({reason}){}", format_output(.output))]
    ProcessExecution {
        cmd: String,
        exit_code: Option<i32>,
        reason: String,
        output: String,
    },

    #[error("Cannot connect to the Docker daemon. Is the docker daemon running? ({0})")]
    EnvironmentUnavailable(String),

    #[error("Docker API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("Containers for app '{app}' are not running: {}. Run [drudock app start].", .services.join(", "))]
    ContainersNotRunning { app: String, services: Vec<String> },

    #[error("Template rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Argument error: {0}")]
    ArgumentParsing(String),
}

impl DrudockError {
    /// Exit code carried by a `ProcessExecution` error, if the process exited at all.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DrudockError::ProcessExecution { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Output was already streamed to the user; the error only repeats its tail.
const OUTPUT_TAIL_LINES: usize = 20;

fn format_output(output: &str) -> String {
    let lines: Vec<&str> = output.trim_end().lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let tail = &lines[lines.len().saturating_sub(OUTPUT_TAIL_LINES)..];
    format!("\nOutput:\n{}", tail.join("\n"))
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

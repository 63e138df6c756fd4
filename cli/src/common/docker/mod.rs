//! # DruDock Docker Module Interface
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! Everything DruDock knows about the container runtime. Container lifecycle itself is
//! driven through `docker-compose` command lines run by `common::process`; the `bollard`
//! client is used for the read-only questions that are awkward to answer by parsing
//! CLI output.
//!
//! ## Architecture
//!
//! - **`connect`**: Connecting to the daemon and the pre-command reachability check.
//! - **`state`**: Which compose services of an app are running, and under which
//!   container names.
//! - **`compose`**: `ComposeProject`, the per-app compose file / project name and the
//!   command lines built from them.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::docker;
//!
//! docker::ensure_docker_available(docker::connect::DOCKER_PING_TIMEOUT).await?;
//! let project = docker::ComposeProject::from_config(root, &cfg, &settings)?;
//! docker::state::ensure_services_running(project.name(), &["php"]).await?;
//! ```
//!

/// Connection to the local Docker daemon and the availability check.
pub mod connect;
/// Compose project naming and command construction.
pub mod compose;
/// Queries about running compose service containers.
pub mod state;

pub use compose::ComposeProject;
pub use connect::ensure_docker_available;

//! # DruDock Docker Connection Helper
//!
//! File: cli/src/common/docker/connect.rs
//!
//! ## Overview
//!
//! Establishes the connection to the local Docker daemon through `bollard` and
//! answers the one question every DruDock command needs answered before it runs:
//! is the container runtime reachable at all?
//!
//! - **`connect_docker`**: `Docker::connect_with_local_defaults()` mapped into the
//!   application's error type.
//! - **`ensure_docker_available`**: Connects and pings the daemon, bounded by a short
//!   timeout. Any failure becomes `DrudockError::EnvironmentUnavailable`, which `main`
//!   reports before exiting.
//!
use crate::core::error::{DrudockError, Result};
use anyhow::{anyhow, Context};
use bollard::Docker;
use std::time::Duration;
use tracing::{debug, instrument};

/// How long the reachability check waits for the daemon to answer.
pub const DOCKER_PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Connects to the local Docker daemon using default settings
/// (`/var/run/docker.sock` or `DOCKER_HOST`).
#[instrument]
pub async fn connect_docker() -> Result<Docker> {
    Docker::connect_with_local_defaults()
        .map_err(|e| anyhow!(DrudockError::DockerApi { source: e }))
        .context("Failed to connect to Docker daemon. Is it running and accessible?")
}

/// Fails with `EnvironmentUnavailable` unless the daemon answers a ping within `limit`.
#[instrument]
pub async fn ensure_docker_available(limit: Duration) -> Result<()> {
    let docker = Docker::connect_with_local_defaults()
        .map_err(|e| anyhow!(DrudockError::EnvironmentUnavailable(e.to_string())))?;
    ping_daemon(&docker, limit).await
}

async fn ping_daemon(docker: &Docker, limit: Duration) -> Result<()> {
    match tokio::time::timeout(limit, docker.ping()).await {
        Ok(Ok(reply)) => {
            debug!("Docker daemon answered ping: {}", reply);
            Ok(())
        }
        Ok(Err(e)) => Err(anyhow!(DrudockError::EnvironmentUnavailable(e.to_string()))),
        Err(_) => Err(anyhow!(DrudockError::EnvironmentUnavailable(format!(
            "no answer within {}s",
            limit.as_secs_f64()
        )))),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    /// Requires a running Docker daemon. Run locally with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn test_docker_available() {
        assert!(ensure_docker_available(DOCKER_PING_TIMEOUT).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_daemon_is_environment_error() {
        // A socket that cannot exist.
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-docker.sock");
        let docker = Docker::connect_with_unix(
            &missing.to_string_lossy(),
            1,
            bollard::API_DEFAULT_VERSION,
        )
        .unwrap();
        let err = ping_daemon(&docker, Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DrudockError>(),
            Some(DrudockError::EnvironmentUnavailable(_))
        ));
    }
}

//! # DruDock Docker State Querying
//!
//! File: cli/src/common/docker/state.rs
//!
//! ## Overview
//!
//! Read-only queries about an app's compose containers. DruDock commands talk to
//! services through `docker-compose exec`, which fails with an unhelpful message when
//! the service is down, so commands check first that the services they need are
//! running and report which ones are not.
//!
//! ## Architecture
//!
//! Containers are matched through the labels docker-compose puts on them:
//! - `com.docker.compose.project`: the compose project (DruDock passes
//!   `--project-name <app>` explicitly, so this is the system app name)
//! - `com.docker.compose.service`: the service name (`php`, `mysql`, `redis`, ...)
//!
//! Label matching works for both the v1 (`app_php_1`) and v2 (`app-php-1`) container
//! naming schemes.
//!
use crate::core::error::{DrudockError, Result};
use anyhow::anyhow;
use bollard::container::ListContainersOptions;
use bollard::models::ContainerSummary;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::connect::connect_docker;

pub const PROJECT_LABEL: &str = "com.docker.compose.project";
pub const SERVICE_LABEL: &str = "com.docker.compose.service";

/// A running container belonging to a compose project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceContainer {
    pub service: String,
    pub name: String,
}

/// Lists the running containers of compose project `project`.
#[instrument]
pub async fn running_services(project: &str) -> Result<Vec<ServiceContainer>> {
    let docker = connect_docker().await?;
    let mut filters = HashMap::new();
    filters.insert(
        "label".to_string(),
        vec![format!("{}={}", PROJECT_LABEL, project)],
    );
    let options = Some(ListContainersOptions {
        all: false,
        filters,
        ..Default::default()
    });
    let summaries = docker
        .list_containers(options)
        .await
        .map_err(|e| anyhow!(DrudockError::DockerApi { source: e }))?;
    let services = service_containers(&summaries);
    debug!("Running services for '{}': {:?}", project, services);
    Ok(services)
}

/// Fails with `ContainersNotRunning` naming every required service that is down.
pub async fn ensure_services_running(project: &str, required: &[&str]) -> Result<Vec<ServiceContainer>> {
    let running = running_services(project).await?;
    let missing = missing_services(&running, required);
    if missing.is_empty() {
        Ok(running)
    } else {
        Err(anyhow!(DrudockError::ContainersNotRunning {
            app: project.to_string(),
            services: missing,
        }))
    }
}

/// Extracts `(service, container name)` pairs from container summaries.
pub fn service_containers(summaries: &[ContainerSummary]) -> Vec<ServiceContainer> {
    summaries
        .iter()
        .filter_map(|c| {
            let service = c.labels.as_ref()?.get(SERVICE_LABEL)?.clone();
            let name = c
                .names
                .as_ref()
                .and_then(|n| n.first())
                .map(|n| n.trim_start_matches('/').to_string())
                .or_else(|| c.id.clone())?;
            Some(ServiceContainer { service, name })
        })
        .collect()
}

/// Required services with no running container, in the order given.
pub fn missing_services(running: &[ServiceContainer], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|svc| !running.iter().any(|r| r.service == **svc))
        .map(|svc| svc.to_string())
        .collect()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, service: Option<&str>) -> ContainerSummary {
        let mut labels = HashMap::new();
        labels.insert(PROJECT_LABEL.to_string(), "demo".to_string());
        if let Some(s) = service {
            labels.insert(SERVICE_LABEL.to_string(), s.to_string());
        }
        ContainerSummary {
            id: Some(format!("id-{}", name)),
            names: Some(vec![format!("/{}", name)]),
            labels: Some(labels),
            ..Default::default()
        }
    }

    #[test]
    fn test_service_containers_reads_labels() {
        let summaries = vec![
            summary("demo-php-1", Some("php")),
            summary("demo_mysql_1", Some("mysql")),
            summary("stray", None),
        ];
        assert_eq!(
            service_containers(&summaries),
            vec![
                ServiceContainer {
                    service: "php".into(),
                    name: "demo-php-1".into()
                },
                ServiceContainer {
                    service: "mysql".into(),
                    name: "demo_mysql_1".into()
                },
            ]
        );
    }

    #[test]
    fn test_missing_services() {
        let running = service_containers(&[summary("demo-php-1", Some("php"))]);
        assert_eq!(missing_services(&running, &["php"]), Vec::<String>::new());
        assert_eq!(
            missing_services(&running, &["redis", "php", "nginx"]),
            vec!["redis".to_string(), "nginx".to_string()]
        );
    }

    /// Requires a running Docker daemon.
    #[tokio::test]
    #[ignore]
    async fn test_running_services_unknown_project_is_empty() {
        let services = running_services("drudock-test-no-such-project").await.unwrap();
        assert!(services.is_empty());
    }
}

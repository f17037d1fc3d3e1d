// Docker engine access via bollard: containers and networks for interface labeling

mod convert;

use crate::models::{ContainerInfo, DockerNetwork};
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    InspectContainerOptions, ListContainersOptions, ListNetworksOptions,
};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Container engine operations the resolver needs.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Liveness probe. `false` means every other call is skipped for this pass.
    async fn available(&self) -> bool;

    /// Running containers with their detail. Containers that vanish between the
    /// listing and the inspect call are left out.
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerInfo>>;

    async fn list_networks(&self) -> anyhow::Result<Vec<DockerNetwork>>;
}

pub struct DockerRepo {
    docker: Option<Docker>,
}

impl DockerRepo {
    /// Build a client for the socket. No request is made until the first probe.
    pub fn connect(socket: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix(socket, timeout_secs, bollard::API_DEFAULT_VERSION)?;
        Ok(Self {
            docker: Some(docker),
        })
    }

    /// A repo that reports itself unavailable, for hosts without a usable socket.
    pub fn unavailable() -> Self {
        Self { docker: None }
    }

    fn client(&self) -> anyhow::Result<&Docker> {
        self.docker
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("docker client not configured"))
    }
}

#[async_trait]
impl ContainerRuntime for DockerRepo {
    async fn available(&self) -> bool {
        let Some(docker) = self.docker.as_ref() else {
            return false;
        };
        match docker.ping().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "docker socket not available");
                false
            }
        }
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerInfo>> {
        let docker = self.client()?;
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let filter = ListContainersOptions {
            all: false,
            filters: Some(filters),
            ..Default::default()
        };
        let summaries = docker.list_containers(Some(filter)).await?;

        let mut containers = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            let Some(id) = summary.id.as_deref() else {
                continue;
            };
            let inspect = match docker
                .inspect_container(id, None::<InspectContainerOptions>)
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(container = id, error = %e, "container vanished before inspect");
                    continue;
                }
            };
            if let Some(info) = convert::container_from_inspect(&inspect) {
                containers.push(info);
            }
        }
        Ok(containers)
    }

    #[instrument(skip(self), fields(repo = "docker", operation = "list_networks"))]
    async fn list_networks(&self) -> anyhow::Result<Vec<DockerNetwork>> {
        let docker = self.client()?;
        let networks = docker.list_networks(None::<ListNetworksOptions>).await?;
        let out: Vec<DockerNetwork> = networks.iter().filter_map(convert::network_from_api).collect();
        if out.len() < networks.len() {
            warn!(
                skipped = networks.len() - out.len(),
                "docker networks without an id were skipped"
            );
        }
        Ok(out)
    }
}

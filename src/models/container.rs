// Docker container and network models

use std::collections::HashMap;

/// Prefix the platform's bundled apps put on compose projects, container names and networks.
pub const APP_PREFIX: &str = "ix-";

/// Docker Compose v2 project label.
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Per-network endpoint of a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerNetwork {
    pub network_id: String,
    pub mac_address: String,
    pub ip_address: String,
}

/// Snapshot of one running container. `pid` is 0 when the engine reports none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerInfo {
    pub id: String,
    pub name: String,
    pub pid: u32,
    /// Keyed by Docker network name.
    pub networks: HashMap<String, ContainerNetwork>,
    pub labels: HashMap<String, String>,
}

impl ContainerInfo {
    /// Application name: compose project without the app prefix, else the container
    /// name without the prefix and without a trailing `-<n>` instance number.
    pub fn app_name(&self) -> String {
        if let Some(project) = self.labels.get(COMPOSE_PROJECT_LABEL) {
            return strip_app_prefix(project).to_string();
        }
        let name = strip_app_prefix(&self.name);
        match name.rsplit_once('-') {
            Some((head, suffix))
                if !head.is_empty()
                    && !suffix.is_empty()
                    && suffix.bytes().all(|b| b.is_ascii_digit()) =>
            {
                head.to_string()
            }
            _ => name.to_string(),
        }
    }
}

/// A Docker network and the host bridge interface backing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockerNetwork {
    pub id: String,
    pub name: String,
    pub bridge_name: String,
}

impl DockerNetwork {
    /// Host bridge name: the explicit override when set, else `br-` plus the first
    /// 12 characters of the network id.
    pub fn bridge_name_for(id: &str, explicit: Option<&str>) -> String {
        match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                let short: String = id.chars().take(12).collect();
                format!("br-{short}")
            }
        }
    }

    pub fn app_name(&self) -> String {
        app_name_from_network(&self.name)
    }
}

/// `ix-grafana_default` -> `grafana`. Networks outside the app convention yield "".
pub fn app_name_from_network(network_name: &str) -> String {
    let Some(name) = network_name.strip_prefix(APP_PREFIX) else {
        return String::new();
    };
    match name.find('_') {
        Some(idx) if idx > 0 => name[..idx].to_string(),
        _ => name.to_string(),
    }
}

fn strip_app_prefix(s: &str) -> &str {
    s.strip_prefix(APP_PREFIX).unwrap_or(s)
}

// Convert bollard API models into our container/network snapshots.

use crate::models::{ContainerInfo, ContainerNetwork, DockerNetwork};
use bollard::models::{ContainerInspectResponse, Network};

/// Option (or label) naming the host bridge explicitly, e.g. `docker0` for the default network.
pub(crate) const BRIDGE_NAME_OPTION: &str = "com.docker.network.bridge.name";

/// Exposed for unit tests. `None` when the engine omitted the container id.
pub(crate) fn container_from_inspect(raw: &ContainerInspectResponse) -> Option<ContainerInfo> {
    let id = raw.id.clone().filter(|id| !id.is_empty())?;
    let name = raw
        .name
        .as_deref()
        .unwrap_or_default()
        .trim_start_matches('/')
        .to_string();
    let pid = raw
        .state
        .as_ref()
        .and_then(|s| s.pid)
        .filter(|pid| *pid > 0)
        .and_then(|pid| u32::try_from(pid).ok())
        .unwrap_or(0);
    let labels = raw
        .config
        .as_ref()
        .and_then(|c| c.labels.clone())
        .unwrap_or_default();
    let networks = raw
        .network_settings
        .as_ref()
        .and_then(|n| n.networks.as_ref())
        .map(|nets| {
            nets.iter()
                .map(|(net_name, ep)| {
                    (
                        net_name.clone(),
                        ContainerNetwork {
                            network_id: ep.network_id.clone().unwrap_or_default(),
                            mac_address: ep.mac_address.clone().unwrap_or_default(),
                            ip_address: ep.ip_address.clone().unwrap_or_default(),
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    Some(ContainerInfo {
        id,
        name,
        pid,
        networks,
        labels,
    })
}

pub(crate) fn network_from_api(raw: &Network) -> Option<DockerNetwork> {
    let id = raw.id.clone().filter(|id| !id.is_empty())?;
    let explicit = raw
        .options
        .as_ref()
        .and_then(|o| o.get(BRIDGE_NAME_OPTION))
        .or_else(|| raw.labels.as_ref().and_then(|l| l.get(BRIDGE_NAME_OPTION)));
    let bridge_name = DockerNetwork::bridge_name_for(&id, explicit.map(String::as_str));
    Some(DockerNetwork {
        name: raw.name.clone().unwrap_or_default(),
        id,
        bridge_name,
    })
}

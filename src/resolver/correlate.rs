// Source correlation: join each external source onto host interface names.
//
// The veth pair technique: an interface inside a container namespace reports its
// peer's host ifindex as `iflink`; the index map turns that into a host name.

use super::Snapshot;
use crate::docker_repo::ContainerRuntime;
use crate::host_repo::{DescriptorTarget, HostFacts};
use crate::models::{ContainerInfo, DockerNetwork};
use crate::vm_repo::VmManager;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Host ifindex -> interface name, built once per pass.
#[derive(Debug, Clone, Default)]
pub struct IfindexMap {
    by_index: HashMap<u32, String>,
}

impl IfindexMap {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let by_index = snapshot
            .interfaces
            .iter()
            .filter_map(|(name, facts)| Some((facts.ifindex?, name.clone())))
            .collect();
        Self { by_index }
    }

    pub fn name(&self, index: u32) -> Option<&str> {
        self.by_index.get(&index).map(String::as_str)
    }

    /// Host names of the peers behind a namespace's `iflink` values; unknown indices drop out.
    pub fn host_peers<'a>(&'a self, peers: &'a [u32]) -> impl Iterator<Item = &'a str> + 'a {
        peers.iter().filter_map(|idx| self.name(*idx))
    }

    pub(crate) fn len(&self) -> usize {
        self.by_index.len()
    }
}

/// Host veth -> container, and host bridge -> Docker network.
pub async fn docker_sources(
    runtime: &dyn ContainerRuntime,
    host: &dyn HostFacts,
    index: &IfindexMap,
) -> (HashMap<String, ContainerInfo>, HashMap<String, DockerNetwork>) {
    let mut veths = HashMap::new();
    let mut networks = HashMap::new();

    if !runtime.available().await {
        debug!("container runtime not available, skipping container/network mapping");
        return (veths, networks);
    }

    match runtime.list_containers().await {
        Ok(containers) => {
            for container in containers {
                if container.pid == 0 {
                    continue;
                }
                let peers = host.namespace_peer_indices(container.pid);
                for name in index.host_peers(&peers) {
                    veths.insert(name.to_string(), container.clone());
                }
            }
        }
        Err(e) => warn!(error = %e, "failed to list docker containers"),
    }

    match runtime.list_networks().await {
        Ok(list) => {
            for net in list {
                if !net.bridge_name.is_empty() {
                    networks.insert(net.bridge_name.clone(), net);
                }
            }
        }
        Err(e) => warn!(error = %e, "failed to list docker networks"),
    }

    (veths, networks)
}

/// Host veth -> LXC/Incus container name. A container is correlated once: later init
/// processes of an already mapped name are ignored.
pub fn incus_veths(host: &dyn HostFacts, index: &IfindexMap) -> HashMap<String, String> {
    let mut veths = HashMap::new();
    let mut mapped: HashSet<String> = HashSet::new();

    for init in host.lxc_init_processes() {
        if mapped.contains(&init.name) {
            continue;
        }
        let peers = host.namespace_peer_indices(init.pid);
        for name in index.host_peers(&peers) {
            veths.insert(name.to_string(), init.name.clone());
            mapped.insert(init.name.clone());
        }
    }

    if !veths.is_empty() {
        debug!(count = veths.len(), "mapped Incus/LXC containers");
    }
    veths
}

/// Tap/macvtap interface -> VM name. The management daemon is tried first; the
/// hypervisor CLI only runs when that yields no interface at all.
pub async fn vm_interfaces(
    vms: &dyn VmManager,
    host: &dyn HostFacts,
    index: &IfindexMap,
) -> HashMap<String, String> {
    let mut out = HashMap::new();

    match vms.running_vms().await {
        Ok(entries) => {
            for vm in entries {
                for target in host.process_descriptors(vm.pid) {
                    let name = match target {
                        DescriptorTarget::Tap(name) => Some(name),
                        DescriptorTarget::Macvtap(idx) => index.name(idx).map(str::to_string),
                    };
                    if let Some(name) = name {
                        out.insert(name, vm.name.clone());
                    }
                }
            }
        }
        Err(e) => debug!(error = %e, "management daemon VM query failed"),
    }
    if !out.is_empty() {
        debug!(count = out.len(), "mapped VMs via management daemon");
        return out;
    }

    let domains = match vms.running_domains().await {
        Ok(d) => d,
        Err(e) => {
            debug!(error = %e, "vm mapping not available");
            return out;
        }
    };
    for domain in domains {
        match vms.domain_interfaces(&domain).await {
            Ok(ifaces) => {
                for iface in ifaces {
                    out.insert(iface, domain.clone());
                }
            }
            Err(e) => debug!(vm = %domain, error = %e, "failed to get VM interfaces"),
        }
    }
    out
}

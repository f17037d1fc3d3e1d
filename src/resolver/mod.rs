// Interface topology resolver: one pass turns the counter table into labeled records.
//
// Stages: snapshot -> source correlation -> VLAN inheritance -> classification.
// Nothing survives a pass; every map below is rebuilt per call.

mod classify;
mod correlate;
mod inherit;

pub use classify::{Classification, Context, RULES, Rule, SYSTEM_APP};
pub use correlate::{IfindexMap, docker_sources, incus_veths, vm_interfaces};
pub use inherit::bridge_vlans;

use crate::docker_repo::ContainerRuntime;
use crate::error::ResolveError;
use crate::host_repo::HostFacts;
use crate::models::{
    ContainerInfo, DockerNetwork, InterfaceInfo, InterfaceReport, LinkState, VlanRecord,
};
use crate::vm_repo::VmManager;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Per-interface sysfs facts captured in stage 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceFacts {
    pub state: LinkState,
    pub ifindex: Option<u32>,
    pub has_driver: bool,
}

/// Stage 1 output. The key set of `interfaces` is the working set of the pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub interfaces: BTreeMap<String, InterfaceFacts>,
    /// Member -> bridge. Only members and bridges present in `interfaces`.
    pub bridges: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn capture<'a>(host: &dyn HostFacts, names: impl IntoIterator<Item = &'a String>) -> Self {
        let interfaces: BTreeMap<String, InterfaceFacts> = names
            .into_iter()
            .map(|name| {
                let facts = InterfaceFacts {
                    state: host
                        .operstate(name)
                        .map(|s| LinkState::from_operstate(&s))
                        .unwrap_or_default(),
                    ifindex: host.ifindex(name),
                    has_driver: host.has_driver(name),
                };
                (name.clone(), facts)
            })
            .collect();

        let mut bridges = BTreeMap::new();
        for name in interfaces.keys() {
            let Some(master) = host.master(name) else {
                continue;
            };
            if interfaces.contains_key(&master) {
                bridges.insert(name.clone(), master);
            } else {
                debug!(iface = %name, bridge = %master, "dropping membership of unknown bridge");
            }
        }
        Self {
            interfaces,
            bridges,
        }
    }

    pub fn bridge_of(&self, iface: &str) -> Option<&str> {
        self.bridges.get(iface).map(String::as_str)
    }
}

/// Stage 2 output: every external source, keyed by host interface name.
#[derive(Debug, Clone, Default)]
pub struct Correlations {
    pub container_veths: HashMap<String, ContainerInfo>,
    pub incus_veths: HashMap<String, String>,
    /// Keyed by host bridge name.
    pub bridge_networks: HashMap<String, DockerNetwork>,
    pub vm_interfaces: HashMap<String, String>,
    pub vlans: HashMap<String, VlanRecord>,
}

/// Stages 3 and 4 over prepared inputs. Pure and deterministic: output is sorted by
/// interface name and identical for identical inputs.
pub fn resolve_topology(snapshot: &Snapshot, sources: &Correlations) -> Vec<InterfaceInfo> {
    let bridge_vlans = bridge_vlans(&snapshot.bridges, &sources.vlans);
    snapshot
        .interfaces
        .iter()
        .map(|(name, facts)| {
            let ctx = Context {
                name,
                bridge: snapshot.bridge_of(name),
                facts,
                sources,
                bridge_vlans: &bridge_vlans,
            };
            let c = classify::classify(&ctx);
            InterfaceInfo {
                name: name.clone(),
                instance: c.instance,
                instance_type: c.instance_type,
                app: c.app,
                bridge: ctx.bridge.unwrap_or_default().to_string(),
                vlan: c.vlan,
                state: facts.state,
            }
        })
        .collect()
}

pub struct TopologyResolver {
    host: Arc<dyn HostFacts>,
    runtime: Arc<dyn ContainerRuntime>,
    vms: Arc<dyn VmManager>,
}

impl TopologyResolver {
    pub fn new(
        host: Arc<dyn HostFacts>,
        runtime: Arc<dyn ContainerRuntime>,
        vms: Arc<dyn VmManager>,
    ) -> Self {
        Self { host, runtime, vms }
    }

    /// Run one full pass. Only an unreadable counter table is an error; every other
    /// source degrades to an empty contribution.
    #[instrument(skip(self), fields(operation = "resolve"))]
    pub async fn resolve(&self) -> Result<Vec<InterfaceReport>, ResolveError> {
        let counters = self.host.interface_counters()?;
        debug!(count = counters.len(), "collected interface stats");

        let snapshot = Snapshot::capture(self.host.as_ref(), counters.keys());
        let sources = self.correlate(&snapshot).await;
        let infos = resolve_topology(&snapshot, &sources);

        Ok(infos
            .into_iter()
            .map(|info| {
                let counters = counters.get(&info.name).copied().unwrap_or_default();
                InterfaceReport { info, counters }
            })
            .collect())
    }

    async fn correlate(&self, snapshot: &Snapshot) -> Correlations {
        let index = IfindexMap::from_snapshot(snapshot);
        debug!(indexed = index.len(), "built ifindex map");
        let host = self.host.as_ref();

        let (container_veths, bridge_networks) =
            docker_sources(self.runtime.as_ref(), host, &index).await;
        let incus_veths = incus_veths(host, &index);
        let vm_interfaces = vm_interfaces(self.vms.as_ref(), host, &index).await;
        let vlans = host.vlan_config();

        Correlations {
            container_veths,
            incus_veths,
            bridge_networks,
            vm_interfaces,
            vlans,
        }
    }
}

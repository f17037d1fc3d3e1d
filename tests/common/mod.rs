// Shared test helpers: in-memory fact sources and a fixture procfs/sysfs tree

#![allow(dead_code)]

use async_trait::async_trait;
use netexporter::docker_repo::ContainerRuntime;
use netexporter::error::ResolveError;
use netexporter::host_repo::{DescriptorTarget, HostFacts, LxcInit};
use netexporter::models::*;
use netexporter::vm_repo::VmManager;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// One host interface as the fake reports it.
#[derive(Debug, Clone, Default)]
pub struct FakeIface {
    pub operstate: Option<String>,
    pub ifindex: Option<u32>,
    pub master: Option<String>,
    pub has_driver: bool,
    pub counters: InterfaceCounters,
}

pub fn iface(ifindex: u32) -> FakeIface {
    FakeIface {
        operstate: Some("up".into()),
        ifindex: Some(ifindex),
        ..Default::default()
    }
}

/// In-memory host. `fail_counters` simulates an unreadable counter table.
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    pub ifaces: BTreeMap<String, FakeIface>,
    pub vlans: HashMap<String, VlanRecord>,
    /// pid -> iflink values seen inside its namespace
    pub namespaces: HashMap<u32, Vec<u32>>,
    pub lxc: Vec<LxcInit>,
    pub descriptors: HashMap<u32, Vec<DescriptorTarget>>,
    pub fail_counters: bool,
}

impl FakeHost {
    pub fn with(mut self, name: &str, iface: FakeIface) -> Self {
        self.ifaces.insert(name.to_string(), iface);
        self
    }

    pub fn vlan(mut self, name: &str, id: &str, parent: &str) -> Self {
        self.vlans.insert(
            name.to_string(),
            VlanRecord {
                name: name.to_string(),
                id: id.to_string(),
                parent: parent.to_string(),
            },
        );
        self
    }

    pub fn namespace(mut self, pid: u32, peers: &[u32]) -> Self {
        self.namespaces.insert(pid, peers.to_vec());
        self
    }
}

impl HostFacts for FakeHost {
    fn interface_counters(&self) -> Result<BTreeMap<String, InterfaceCounters>, ResolveError> {
        if self.fail_counters {
            return Err(ResolveError::Counters {
                path: PathBuf::from("/proc/1/net/dev"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        Ok(self
            .ifaces
            .iter()
            .map(|(name, i)| (name.clone(), i.counters))
            .collect())
    }

    fn operstate(&self, iface: &str) -> Option<String> {
        self.ifaces.get(iface)?.operstate.clone()
    }

    fn ifindex(&self, iface: &str) -> Option<u32> {
        self.ifaces.get(iface)?.ifindex
    }

    fn master(&self, iface: &str) -> Option<String> {
        self.ifaces.get(iface)?.master.clone()
    }

    fn has_driver(&self, iface: &str) -> bool {
        self.ifaces.get(iface).is_some_and(|i| i.has_driver)
    }

    fn vlan_config(&self) -> HashMap<String, VlanRecord> {
        self.vlans.clone()
    }

    fn namespace_peer_indices(&self, pid: u32) -> Vec<u32> {
        self.namespaces.get(&pid).cloned().unwrap_or_default()
    }

    fn lxc_init_processes(&self) -> Vec<LxcInit> {
        self.lxc.clone()
    }

    fn process_descriptors(&self, pid: u32) -> Vec<DescriptorTarget> {
        self.descriptors.get(&pid).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeRuntime {
    pub available: bool,
    pub containers: Vec<ContainerInfo>,
    pub networks: Vec<DockerNetwork>,
    pub fail_listing: bool,
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    async fn available(&self) -> bool {
        self.available
    }

    async fn list_containers(&self) -> anyhow::Result<Vec<ContainerInfo>> {
        if self.fail_listing {
            anyhow::bail!("engine error");
        }
        Ok(self.containers.clone())
    }

    async fn list_networks(&self) -> anyhow::Result<Vec<DockerNetwork>> {
        if self.fail_listing {
            anyhow::bail!("engine error");
        }
        Ok(self.networks.clone())
    }
}

/// `None` for a source makes that call fail.
#[derive(Debug, Clone, Default)]
pub struct FakeVms {
    pub vms: Option<Vec<VmEntry>>,
    pub domains: Option<Vec<String>>,
    pub domain_ifaces: HashMap<String, Vec<String>>,
}

#[async_trait]
impl VmManager for FakeVms {
    async fn running_vms(&self) -> anyhow::Result<Vec<VmEntry>> {
        self.vms
            .clone()
            .ok_or_else(|| anyhow::anyhow!("midclt: not found"))
    }

    async fn running_domains(&self) -> anyhow::Result<Vec<String>> {
        self.domains
            .clone()
            .ok_or_else(|| anyhow::anyhow!("virsh: not found"))
    }

    async fn domain_interfaces(&self, domain: &str) -> anyhow::Result<Vec<String>> {
        self.domain_ifaces
            .get(domain)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("domain {domain} not found"))
    }
}

pub fn container(name: &str, pid: u32) -> ContainerInfo {
    ContainerInfo {
        id: format!("{name}-id"),
        name: name.to_string(),
        pid,
        ..Default::default()
    }
}

pub fn network(id: &str, name: &str) -> DockerNetwork {
    DockerNetwork {
        id: id.to_string(),
        name: name.to_string(),
        bridge_name: DockerNetwork::bridge_name_for(id, None),
    }
}

/// Writable procfs/sysfs layout under a temp dir.
pub struct FixtureTree {
    pub dir: tempfile::TempDir,
}

impl FixtureTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn procfs(&self) -> PathBuf {
        self.dir.path().join("proc")
    }

    pub fn sysfs(&self) -> PathBuf {
        self.dir.path().join("sys")
    }

    pub fn write(&self, rel: impl AsRef<Path>, content: &str) {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, content).expect("write");
    }

    pub fn symlink(&self, target: impl AsRef<Path>, rel: impl AsRef<Path>) {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::os::unix::fs::symlink(target, path).expect("symlink");
    }

    pub fn mkdir(&self, rel: impl AsRef<Path>) {
        std::fs::create_dir_all(self.dir.path().join(rel)).expect("mkdir");
    }

    /// `sys/class/net/<name>` with operstate and ifindex.
    pub fn sys_iface(&self, name: &str, operstate: &str, ifindex: u32) {
        let base = Path::new("sys/class/net").join(name);
        self.write(base.join("operstate"), &format!("{operstate}\n"));
        self.write(base.join("ifindex"), &format!("{ifindex}\n"));
    }
}

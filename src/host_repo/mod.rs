// Host facts read from procfs and sysfs.
//
// Every reader is best effort except the counter table, which defines the pass.

mod cgroup;
mod fd;
mod netdev;
mod sysfs;
mod vlan;

pub use cgroup::parse_lxc_init_cgroup;
pub use fd::{DescriptorTarget, RawTarget, parse_descriptor_target, parse_fdinfo_iff};
pub use netdev::parse_net_dev;
pub use vlan::parse_vlan_config;

use crate::config::PathsConfig;
use crate::error::ResolveError;
use crate::models::{InterfaceCounters, VlanRecord};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// An LXC/Incus container init process found by the cgroup scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LxcInit {
    pub pid: u32,
    pub name: String,
}

/// Read-only view of the host the resolver runs against.
///
/// The production implementation is [`HostRepo`]; tests substitute in-memory facts.
pub trait HostFacts: Send + Sync {
    /// Counter table of the host network namespace. Failing here aborts the pass.
    fn interface_counters(&self) -> Result<BTreeMap<String, InterfaceCounters>, ResolveError>;

    /// Raw `operstate` text, if readable.
    fn operstate(&self, iface: &str) -> Option<String>;

    fn ifindex(&self, iface: &str) -> Option<u32>;

    /// Name of the bridge this interface is enslaved to.
    fn master(&self, iface: &str) -> Option<String>;

    /// Whether `device/driver` exists, i.e. the interface is backed by hardware.
    fn has_driver(&self, iface: &str) -> bool;

    /// VLAN sub-interfaces keyed by name. Empty when the host has no 8021q table.
    fn vlan_config(&self) -> HashMap<String, VlanRecord>;

    /// `iflink` of every non-loopback interface inside the network namespace of `pid`,
    /// i.e. the host-side ifindex of each veth peer.
    fn namespace_peer_indices(&self, pid: u32) -> Vec<u32>;

    /// LXC/Incus init processes, ascending by pid.
    fn lxc_init_processes(&self) -> Vec<LxcInit>;

    /// Tap and macvtap devices held open by `pid`.
    fn process_descriptors(&self, pid: u32) -> Vec<DescriptorTarget>;
}

/// Mount points of the host's procfs and sysfs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    pub procfs: PathBuf,
    pub sysfs: PathBuf,
}

impl HostPaths {
    /// sysfs lives under the host root when the exporter runs against a mounted rootfs.
    pub fn from_config(paths: &PathsConfig) -> Self {
        let sysfs = if paths.is_chrooted() {
            Path::new(&paths.rootfs).join("sys")
        } else {
            PathBuf::from("/sys")
        };
        Self {
            procfs: PathBuf::from(&paths.procfs),
            sysfs,
        }
    }

    fn class_net(&self) -> PathBuf {
        self.sysfs.join("class").join("net")
    }

    fn pid_dir(&self, pid: u32) -> PathBuf {
        self.procfs.join(pid.to_string())
    }
}

pub struct HostRepo {
    paths: HostPaths,
}

impl HostRepo {
    pub fn new(paths: HostPaths) -> Self {
        Self { paths }
    }

    fn iface_dir(&self, iface: &str) -> PathBuf {
        self.paths.class_net().join(iface)
    }
}

impl HostFacts for HostRepo {
    #[instrument(skip(self), fields(repo = "host", operation = "interface_counters"))]
    fn interface_counters(&self) -> Result<BTreeMap<String, InterfaceCounters>, ResolveError> {
        // /proc/net follows the reader's own namespace; PID 1 is always the host's.
        let path = self.paths.pid_dir(1).join("net").join("dev");
        let content = std::fs::read_to_string(&path)
            .map_err(|source| ResolveError::Counters { path, source })?;
        Ok(parse_net_dev(&content))
    }

    fn operstate(&self, iface: &str) -> Option<String> {
        sysfs::read_trimmed(&self.iface_dir(iface).join("operstate"))
    }

    fn ifindex(&self, iface: &str) -> Option<u32> {
        sysfs::read_u32(&self.iface_dir(iface).join("ifindex"))
    }

    fn master(&self, iface: &str) -> Option<String> {
        sysfs::link_basename(&self.iface_dir(iface).join("master"))
    }

    fn has_driver(&self, iface: &str) -> bool {
        std::fs::read_link(self.iface_dir(iface).join("device").join("driver")).is_ok()
    }

    #[instrument(skip(self), fields(repo = "host", operation = "vlan_config"))]
    fn vlan_config(&self) -> HashMap<String, VlanRecord> {
        let path = self.paths.pid_dir(1).join("net").join("vlan").join("config");
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let vlans = parse_vlan_config(&content);
                if !vlans.is_empty() {
                    debug!(count = vlans.len(), "discovered VLAN interfaces");
                }
                vlans
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "VLAN config not available");
                HashMap::new()
            }
        }
    }

    fn namespace_peer_indices(&self, pid: u32) -> Vec<u32> {
        // The container's own sysfs view, reached through its root.
        let class_net = self
            .paths
            .pid_dir(pid)
            .join("root")
            .join("sys")
            .join("class")
            .join("net");
        let entries = match std::fs::read_dir(&class_net) {
            Ok(e) => e,
            Err(e) => {
                debug!(pid, error = %e, "cannot read namespace sysfs");
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name != "lo")
            .collect();
        names.sort();
        names
            .iter()
            .filter_map(|name| sysfs::read_u32(&class_net.join(name).join("iflink")))
            .collect()
    }

    #[instrument(skip(self), fields(repo = "host", operation = "lxc_init_processes"))]
    fn lxc_init_processes(&self) -> Vec<LxcInit> {
        let entries = match std::fs::read_dir(&self.paths.procfs) {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "cannot scan procfs for LXC processes");
                return Vec::new();
            }
        };
        let mut pids: Vec<u32> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|e| e.file_name().to_str()?.parse::<u32>().ok())
            .filter(|pid| *pid > 1)
            .collect();
        pids.sort_unstable();

        pids.into_iter()
            .filter_map(|pid| {
                let cgroup = std::fs::read_to_string(self.paths.pid_dir(pid).join("cgroup")).ok()?;
                let name = parse_lxc_init_cgroup(&cgroup)?;
                Some(LxcInit {
                    pid,
                    name: name.to_string(),
                })
            })
            .collect()
    }

    fn process_descriptors(&self, pid: u32) -> Vec<DescriptorTarget> {
        let pid_dir = self.paths.pid_dir(pid);
        let fd_dir = pid_dir.join("fd");
        let entries = match std::fs::read_dir(&fd_dir) {
            Ok(e) => e,
            Err(e) => {
                debug!(pid, error = %e, "cannot read process fd dir");
                return Vec::new();
            }
        };
        let mut fds: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        fds.sort_by_key(|fd| fd.parse::<u64>().unwrap_or(u64::MAX));

        let mut targets = Vec::new();
        for fd in fds {
            let Ok(link) = std::fs::read_link(fd_dir.join(&fd)) else {
                continue;
            };
            let Some(target) = parse_descriptor_target(&link.to_string_lossy()) else {
                continue;
            };
            match target {
                RawTarget::Tun => {
                    let fdinfo = std::fs::read_to_string(pid_dir.join("fdinfo").join(&fd))
                        .unwrap_or_default();
                    if let Some(name) = parse_fdinfo_iff(&fdinfo) {
                        targets.push(DescriptorTarget::Tap(name.to_string()));
                    }
                }
                RawTarget::Tap(index) => targets.push(DescriptorTarget::Macvtap(index)),
            }
        }
        targets
    }
}

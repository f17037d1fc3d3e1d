// HostRepo tests against a fixture procfs/sysfs tree

mod common;

use common::FixtureTree;
use netexporter::config::PathsConfig;
use netexporter::host_repo::{DescriptorTarget, HostFacts, HostPaths, HostRepo, LxcInit};
use std::path::PathBuf;

const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:    1000      10    0    0    0     0          0         0     1000      10    0    0    0     0       0          0
enp3s0: 987654321 12345 1 2 0 0 0 7 123456789 6789 3 4 0 0 0 0
  br0: 500 5 0 0 0 0 0 0 600 6 0 0 0 0 0 0
";

const VLAN_CONFIG: &str = "\
VLAN Dev name    | VLAN ID
Name-Type: VLAN_NAME_TYPE_RAW_PLUS_VID_NO_PAD
enp3s0.100     | 100  | enp3s0
";

fn repo(tree: &FixtureTree) -> HostRepo {
    HostRepo::new(HostPaths {
        procfs: tree.procfs(),
        sysfs: tree.sysfs(),
    })
}

#[test]
fn host_paths_follow_rootfs() {
    let plain = HostPaths::from_config(&PathsConfig::default());
    assert_eq!(plain.procfs, PathBuf::from("/proc"));
    assert_eq!(plain.sysfs, PathBuf::from("/sys"));

    let mounted = HostPaths::from_config(&PathsConfig {
        procfs: "/host/proc".into(),
        rootfs: "/host".into(),
    });
    assert_eq!(mounted.procfs, PathBuf::from("/host/proc"));
    assert_eq!(mounted.sysfs, PathBuf::from("/host/sys"));
}

#[test]
fn counters_come_from_pid_one() {
    let tree = FixtureTree::new();
    tree.write("proc/1/net/dev", NET_DEV);
    let counters = repo(&tree).interface_counters().unwrap();
    let names: Vec<&str> = counters.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["br0", "enp3s0", "lo"]);
    assert_eq!(counters["enp3s0"].rx_bytes, 987654321);
    assert_eq!(counters["enp3s0"].tx_dropped, 4);
}

#[test]
fn missing_counter_table_is_an_error() {
    let tree = FixtureTree::new();
    let err = repo(&tree).interface_counters().unwrap_err();
    assert!(err.to_string().contains("net/dev"));
}

#[test]
fn sysfs_attributes_are_best_effort() {
    let tree = FixtureTree::new();
    tree.sys_iface("enp3s0", "up", 2);
    tree.sys_iface("veth1", "lowerlayerdown", 9);
    tree.sys_iface("br0", "up", 3);
    tree.symlink("../../devices/virtual/net/br0", "sys/class/net/veth1/master");
    tree.symlink(
        "../../../bus/pci/drivers/igc",
        "sys/class/net/enp3s0/device/driver",
    );
    tree.write("sys/class/net/broken/ifindex", "not-a-number\n");

    let repo = repo(&tree);
    assert_eq!(repo.operstate("veth1").as_deref(), Some("lowerlayerdown"));
    assert_eq!(repo.ifindex("enp3s0"), Some(2));
    assert_eq!(repo.ifindex("broken"), None);
    assert_eq!(repo.ifindex("missing"), None);
    assert_eq!(repo.master("veth1").as_deref(), Some("br0"));
    assert_eq!(repo.master("enp3s0"), None);
    assert!(repo.has_driver("enp3s0"));
    assert!(!repo.has_driver("veth1"));
}

#[test]
fn vlan_table_is_optional() {
    let tree = FixtureTree::new();
    assert!(repo(&tree).vlan_config().is_empty());

    tree.write("proc/1/net/vlan/config", VLAN_CONFIG);
    let vlans = repo(&tree).vlan_config();
    assert_eq!(vlans.len(), 1);
    assert_eq!(vlans["enp3s0.100"].id, "100");
    assert_eq!(vlans["enp3s0.100"].parent, "enp3s0");
}

#[test]
fn namespace_peers_skip_loopback() {
    let tree = FixtureTree::new();
    let ns = "proc/4242/root/sys/class/net";
    tree.write(format!("{ns}/lo/iflink"), "1\n");
    tree.write(format!("{ns}/eth0/iflink"), "17\n");
    tree.write(format!("{ns}/eth1/iflink"), "23\n");

    let repo = repo(&tree);
    assert_eq!(repo.namespace_peer_indices(4242), vec![17, 23]);
    assert!(repo.namespace_peer_indices(9999).is_empty());
}

#[test]
fn lxc_scan_finds_init_processes_only() {
    let tree = FixtureTree::new();
    tree.write("proc/1/cgroup", "0::/init.scope\n");
    tree.write("proc/310/cgroup", "0::/lxc.payload.backupserver/init.scope\n");
    tree.write("proc/311/cgroup", "0::/lxc.payload.backupserver/system.slice/cron.service\n");
    tree.write("proc/42/cgroup", "0::/lxc.payload.dev/init.scope\n");
    tree.write("proc/900/cgroup", "0::/system.slice/docker.service\n");
    tree.mkdir("proc/self");
    tree.mkdir("proc/77");

    let found = repo(&tree).lxc_init_processes();
    assert_eq!(
        found,
        vec![
            LxcInit {
                pid: 42,
                name: "dev".into()
            },
            LxcInit {
                pid: 310,
                name: "backupserver".into()
            },
        ]
    );
}

#[test]
fn descriptors_yield_taps_and_macvtaps() {
    let tree = FixtureTree::new();
    tree.symlink("/dev/net/tun", "proc/7000/fd/12");
    tree.write("proc/7000/fdinfo/12", "pos:\t0\nflags:\t0104002\niff:\tvnet0\n");
    tree.symlink("/dev/tap31", "proc/7000/fd/3");
    tree.symlink("/dev/null", "proc/7000/fd/0");
    tree.symlink("socket:[12345]", "proc/7000/fd/4");
    // tun without fdinfo is skipped
    tree.symlink("/dev/net/tun", "proc/7000/fd/20");

    let targets = repo(&tree).process_descriptors(7000);
    assert_eq!(
        targets,
        vec![
            DescriptorTarget::Macvtap(31),
            DescriptorTarget::Tap("vnet0".into()),
        ]
    );
    assert!(repo(&tree).process_descriptors(1).is_empty());
}

// Tap/macvtap discovery through a VM process's open descriptors

const TUN_DEVICE: &str = "/dev/net/tun";
const TAP_DEVICE_PREFIX: &str = "/dev/tap";

/// A network device a process holds open, as the resolver consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorTarget {
    /// Tap created through the tun device; carries the kernel interface name.
    Tap(String),
    /// Macvtap character device; carries the interface's ifindex.
    Macvtap(u32),
}

/// Classification of a descriptor's symlink target before fdinfo is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTarget {
    Tun,
    Tap(u32),
}

/// `/dev/net/tun` -> `Tun`, `/dev/tap17` -> `Tap(17)`, anything else -> `None`.
pub fn parse_descriptor_target(target: &str) -> Option<RawTarget> {
    if target == TUN_DEVICE {
        return Some(RawTarget::Tun);
    }
    let index = target.strip_prefix(TAP_DEVICE_PREFIX)?.parse().ok()?;
    Some(RawTarget::Tap(index))
}

/// Interface name from the `iff:` line of a tun descriptor's fdinfo.
pub fn parse_fdinfo_iff(fdinfo: &str) -> Option<&str> {
    fdinfo
        .lines()
        .find_map(|line| line.strip_prefix("iff:"))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

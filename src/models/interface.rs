// Network interface models: raw counters in, resolved records out

use serde::Serialize;
use std::fmt;

/// Cumulative counters for one interface, as read from the host's net/dev table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceCounters {
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub rx_errors: u64,
    pub rx_dropped: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
    pub tx_errors: u64,
    pub tx_dropped: u64,
}

/// Role of an interface on the host. Serializes to the lowercase label value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Physical,
    Bridge,
    Docker,
    Incus,
    Vm,
    Macvtap,
    Vlan,
    Loopback,
    Unknown,
}

impl InstanceType {
    pub const ALL: [InstanceType; 9] = [
        InstanceType::Physical,
        InstanceType::Bridge,
        InstanceType::Docker,
        InstanceType::Incus,
        InstanceType::Vm,
        InstanceType::Macvtap,
        InstanceType::Vlan,
        InstanceType::Loopback,
        InstanceType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::Physical => "physical",
            InstanceType::Bridge => "bridge",
            InstanceType::Docker => "docker",
            InstanceType::Incus => "incus",
            InstanceType::Vm => "vm",
            InstanceType::Macvtap => "macvtap",
            InstanceType::Vlan => "vlan",
            InstanceType::Loopback => "loopback",
            InstanceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kernel operstate folded to three values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    Up,
    Down,
    #[default]
    Unknown,
}

impl LinkState {
    /// Parse the contents of sysfs `operstate` (e.g. "up\n", "lowerlayerdown").
    pub fn from_operstate(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "up" => LinkState::Up,
            "down" | "lowerlayerdown" | "notpresent" => LinkState::Down,
            _ => LinkState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Up => "up",
            LinkState::Down => "down",
            LinkState::Unknown => "unknown",
        }
    }
}

/// Resolved labels for one interface. `bridge` and `vlan` are empty when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub instance: String,
    pub instance_type: InstanceType,
    pub app: String,
    pub bridge: String,
    pub vlan: String,
    pub state: LinkState,
}

/// One row of a pass: labels paired with the counters read in the same pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceReport {
    #[serde(flatten)]
    pub info: InterfaceInfo,
    pub counters: InterfaceCounters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operstate_folds_to_three_states() {
        assert_eq!(LinkState::from_operstate("up\n"), LinkState::Up);
        assert_eq!(LinkState::from_operstate("DOWN"), LinkState::Down);
        assert_eq!(LinkState::from_operstate("lowerlayerdown"), LinkState::Down);
        assert_eq!(LinkState::from_operstate("dormant"), LinkState::Unknown);
        assert_eq!(LinkState::from_operstate(""), LinkState::Unknown);
    }

    #[test]
    fn instance_type_serializes_lowercase() {
        let json = serde_json::to_string(&InstanceType::Macvtap).unwrap();
        assert_eq!(json, "\"macvtap\"");
        for t in InstanceType::ALL {
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{}\"", t));
        }
    }
}

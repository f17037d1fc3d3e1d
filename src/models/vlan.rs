// 802.1Q sub-interface record

/// One row of the kernel VLAN config table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanRecord {
    pub name: String,
    pub id: String,
    pub parent: String,
}

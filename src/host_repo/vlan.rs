// Parser for the 8021q VLAN config table
//
//   VLAN Dev name    | VLAN ID
//   Name-Type: VLAN_NAME_TYPE_RAW_PLUS_VID_NO_PAD
//   eno1.100       | 100  | eno1

use crate::models::VlanRecord;
use std::collections::HashMap;

pub fn parse_vlan_config(content: &str) -> HashMap<String, VlanRecord> {
    let mut vlans = HashMap::new();
    for line in content.lines() {
        if line.trim().is_empty() || line.starts_with("VLAN") || line.starts_with("Name-Type:") {
            continue;
        }
        let mut cols = line.split('|').map(str::trim);
        let (Some(name), Some(id), Some(parent)) = (cols.next(), cols.next(), cols.next()) else {
            continue;
        };
        if name.is_empty() || id.is_empty() {
            continue;
        }
        vlans.insert(
            name.to_string(),
            VlanRecord {
                name: name.to_string(),
                id: id.to_string(),
                parent: parent.to_string(),
            },
        );
    }
    vlans
}

// VLAN inheritance through bridges (one level).

use crate::models::VlanRecord;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Bridge -> VLAN id, taken from the VLAN sub-interfaces enslaved to each bridge.
///
/// When one bridge has several VLAN members the lowest id wins (numeric order, then
/// lexical for ids that do not parse). A bridge that is itself a member of another
/// bridge does not pass its id further up.
pub fn bridge_vlans(
    bridges: &BTreeMap<String, String>,
    vlans: &HashMap<String, VlanRecord>,
) -> HashMap<String, String> {
    let mut out: HashMap<String, String> = HashMap::new();
    for (member, bridge) in bridges {
        let Some(record) = vlans.get(member) else {
            continue;
        };
        let replace = match out.get(bridge) {
            None => true,
            Some(current) if current == &record.id => false,
            Some(current) => {
                debug!(
                    bridge = %bridge,
                    kept = %lowest(current, &record.id),
                    candidates = ?[current.as_str(), record.id.as_str()],
                    "bridge has more than one VLAN member"
                );
                compare_ids(&record.id, current) == Ordering::Less
            }
        };
        if replace {
            out.insert(bridge.clone(), record.id.clone());
        }
    }
    out
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn lowest<'a>(a: &'a str, b: &'a str) -> &'a str {
    if compare_ids(b, a) == Ordering::Less { b } else { a }
}

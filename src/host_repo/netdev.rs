// Parser for the kernel's net/dev counter table

use crate::models::InterfaceCounters;
use std::collections::BTreeMap;

const FIELDS: usize = 16;

/// Parse the whole table. The two header lines and malformed rows are skipped.
///
/// Row layout after `iface:` is 8 receive columns then 8 transmit columns; only
/// bytes/packets/errs/drop of each half are kept.
pub fn parse_net_dev(content: &str) -> BTreeMap<String, InterfaceCounters> {
    content.lines().skip(2).filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<(String, InterfaceCounters)> {
    let (iface, rest) = line.split_once(':')?;
    let iface = iface.trim();
    if iface.is_empty() {
        return None;
    }
    let values: Vec<u64> = rest
        .split_whitespace()
        .take(FIELDS)
        .map(|f| f.parse::<u64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if values.len() < FIELDS {
        return None;
    }
    Some((
        iface.to_string(),
        InterfaceCounters {
            rx_bytes: values[0],
            rx_packets: values[1],
            rx_errors: values[2],
            rx_dropped: values[3],
            tx_bytes: values[8],
            tx_packets: values[9],
            tx_errors: values[10],
            tx_dropped: values[11],
        },
    ))
}

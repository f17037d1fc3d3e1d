// Parsers for midclt and virsh output

use crate::models::VmEntry;
use serde::Deserialize;

// vm.query emits explicit nulls for stopped or half-created VMs; every field is optional.
#[derive(Deserialize)]
struct RawVm {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    status: Option<RawStatus>,
}

#[derive(Deserialize)]
struct RawStatus {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    pid: Option<i64>,
}

/// `midclt call vm.query` JSON. Only RUNNING entries with a name and a positive pid are kept.
pub fn parse_vm_query(json: &str) -> anyhow::Result<Vec<VmEntry>> {
    let raw: Vec<RawVm> = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("midclt unmarshal: {}", e))?;
    Ok(raw
        .into_iter()
        .filter_map(|vm| {
            let status = vm.status?;
            if status.state.as_deref() != Some("RUNNING") {
                return None;
            }
            let pid = u32::try_from(status.pid?).ok().filter(|p| *p > 0)?;
            let name = vm.name.filter(|n| !n.is_empty())?;
            Some(VmEntry { name, pid })
        })
        .collect())
}

/// One name per line (`virsh list --name`), blanks dropped.
pub fn parse_name_list(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// First column of `virsh domiflist` after the header and separator lines.
pub fn parse_domiflist(out: &str) -> Vec<String> {
    out.lines()
        .skip(2)
        .filter_map(|l| l.split_whitespace().next())
        .filter(|name| *name != "-")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vm_query_keeps_running_with_pid() {
        let json = r#"[
            {"id": 1, "name": "haos", "status": {"state": "RUNNING", "pid": 3301, "domain_state": "RUNNING"}},
            {"id": 2, "name": "win11", "status": {"state": "STOPPED", "pid": null}},
            {"id": 3, "name": "booting", "status": {"state": "RUNNING", "pid": 0}},
            {"id": 4, "name": "nostatus"}
        ]"#;
        let vms = parse_vm_query(json).unwrap();
        assert_eq!(
            vms,
            vec![VmEntry {
                name: "haos".into(),
                pid: 3301
            }]
        );
    }

    #[test]
    fn vm_query_tolerates_null_fields() {
        let json = r#"[
            {"name": "haos", "status": {"state": "RUNNING", "pid": 3301}},
            {"name": "template", "status": null},
            {"name": "halfmade", "status": {"state": null, "pid": null}},
            {"name": null, "status": {"state": "RUNNING", "pid": 4400}}
        ]"#;
        let vms = parse_vm_query(json).unwrap();
        assert_eq!(
            vms,
            vec![VmEntry {
                name: "haos".into(),
                pid: 3301
            }]
        );
    }

    #[test]
    fn vm_query_rejects_garbage() {
        assert!(parse_vm_query("Failed to connect").is_err());
    }

    #[test]
    fn name_list_drops_blank_lines() {
        assert_eq!(parse_name_list("haos\n\n  pfsense \n"), vec!["haos", "pfsense"]);
    }

    #[test]
    fn domiflist_reads_first_column() {
        let out = " Interface   Type     Source   Model    MAC\n\
                   -----------------------------------------------------------\n \
                   vnet0       bridge   br0      virtio   52:54:00:6b:3c:58\n \
                   -           network  default  virtio   52:54:00:11:22:33\n \
                   macvtap0    direct   eno1     virtio   52:54:00:aa:bb:cc\n\n";
        assert_eq!(parse_domiflist(out), vec!["vnet0", "macvtap0"]);
    }
}

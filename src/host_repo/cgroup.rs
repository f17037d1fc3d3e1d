// LXC/Incus init-process detection from /proc/<pid>/cgroup

const PAYLOAD: &str = "lxc.payload.";
const INIT_SCOPE: &str = "/init.scope";

/// Container name when the cgroup text places the process exactly in
/// `lxc.payload.<name>/init.scope`. Other processes of the container return `None`.
pub fn parse_lxc_init_cgroup(content: &str) -> Option<&str> {
    content.lines().find_map(|line| {
        let start = line.find(PAYLOAD)? + PAYLOAD.len();
        let rest = &line[start..];
        let slash = rest.find('/')?;
        if slash == 0 || &rest[slash..] != INIT_SCOPE {
            return None;
        }
        Some(&rest[..slash])
    })
}

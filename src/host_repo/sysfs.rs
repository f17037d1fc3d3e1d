// Best-effort sysfs attribute reads. Any failure is an absent value.

use std::path::Path;

pub(super) fn read_trimmed(path: &Path) -> Option<String> {
    let s = std::fs::read_to_string(path).ok()?;
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

pub(super) fn read_u32(path: &Path) -> Option<u32> {
    read_trimmed(path)?.parse().ok()
}

/// Final component of a symlink target (`../../devices/virtual/net/br0` -> `br0`).
pub(super) fn link_basename(path: &Path) -> Option<String> {
    let target = std::fs::read_link(path).ok()?;
    let name = target.file_name()?.to_string_lossy().into_owned();
    if name.is_empty() { None } else { Some(name) }
}

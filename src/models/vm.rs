// Running virtual machine as reported by the management daemon

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmEntry {
    pub name: String,
    /// QEMU process id; always positive for entries that survive parsing.
    pub pid: u32,
}

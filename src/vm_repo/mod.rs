// VM discovery through the management daemon (midclt) with a virsh fallback

mod command;
mod parse;

pub use command::CommandRunner;
pub use parse::{parse_domiflist, parse_name_list, parse_vm_query};

use crate::models::VmEntry;
use async_trait::async_trait;
use tracing::instrument;

/// Hypervisor-side queries the VM locator needs.
#[async_trait]
pub trait VmManager: Send + Sync {
    /// Running VMs with their QEMU pid, from the management daemon.
    async fn running_vms(&self) -> anyhow::Result<Vec<VmEntry>>;

    /// Running domain names from the hypervisor CLI.
    async fn running_domains(&self) -> anyhow::Result<Vec<String>>;

    /// Host-side interface names attached to one domain.
    async fn domain_interfaces(&self, domain: &str) -> anyhow::Result<Vec<String>>;
}

pub struct VmRepo {
    runner: CommandRunner,
}

impl VmRepo {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl VmManager for VmRepo {
    #[instrument(skip(self), fields(repo = "vm", operation = "running_vms"))]
    async fn running_vms(&self) -> anyhow::Result<Vec<VmEntry>> {
        let out = self.runner.output("midclt", &["call", "vm.query"]).await?;
        parse_vm_query(&out)
    }

    #[instrument(skip(self), fields(repo = "vm", operation = "running_domains"))]
    async fn running_domains(&self) -> anyhow::Result<Vec<String>> {
        let out = self
            .runner
            .output("virsh", &["list", "--name", "--state-running"])
            .await?;
        Ok(parse_name_list(&out))
    }

    #[instrument(skip(self), fields(repo = "vm", operation = "domain_interfaces"))]
    async fn domain_interfaces(&self, domain: &str) -> anyhow::Result<Vec<String>> {
        let out = self.runner.output("virsh", &["domiflist", domain]).await?;
        Ok(parse_domiflist(&out))
    }
}

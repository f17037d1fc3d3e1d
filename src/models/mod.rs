// Domain models shared by the fact readers, the resolver and the emitter

mod container;
mod interface;
mod vlan;
mod vm;

pub use container::{
    APP_PREFIX, COMPOSE_PROJECT_LABEL, ContainerInfo, ContainerNetwork, DockerNetwork,
    app_name_from_network,
};
pub use interface::{InstanceType, InterfaceCounters, InterfaceInfo, InterfaceReport, LinkState};
pub use vlan::VlanRecord;
pub use vm::VmEntry;

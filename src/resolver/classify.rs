// Ordered classification rules.
//
// The first rule whose predicate matches the interface name decides the outcome, so
// RULES order is the tie-break. Only the final fallback consults the VLAN table to
// catch dot-notation sub-interfaces (eno1.100).
//
// Bridge members inherit their bridge's VLAN id unless they carry one of their own.
// Macvtap is the exception: it never sits under a bridge.

use super::{Correlations, InterfaceFacts};
use crate::models::{InstanceType, app_name_from_network};
use std::collections::HashMap;

/// App label for host-owned interfaces.
pub const SYSTEM_APP: &str = "system";

/// Inputs a rule may look at for one interface.
pub struct Context<'a> {
    pub name: &'a str,
    pub bridge: Option<&'a str>,
    pub facts: &'a InterfaceFacts,
    pub sources: &'a Correlations,
    /// Bridge -> VLAN id, from the inheritance stage.
    pub bridge_vlans: &'a HashMap<String, String>,
}

impl Context<'_> {
    fn inherited_vlan(&self) -> String {
        self.bridge
            .and_then(|br| self.bridge_vlans.get(br))
            .cloned()
            .unwrap_or_default()
    }

    fn raw(&self, instance_type: InstanceType, app: &str) -> Classification {
        Classification {
            instance_type,
            instance: self.name.to_string(),
            app: app.to_string(),
            vlan: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub instance_type: InstanceType,
    pub instance: String,
    pub app: String,
    pub vlan: String,
}

pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub classify: fn(&Context<'_>) -> Classification,
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "loopback",
        matches: is_loopback,
        classify: loopback,
    },
    Rule {
        name: "container-veth",
        matches: is_veth,
        classify: container_veth,
    },
    Rule {
        name: "vm-tap",
        matches: is_tap,
        classify: vm_tap,
    },
    Rule {
        name: "macvtap",
        matches: is_macvtap,
        classify: macvtap,
    },
    Rule {
        name: "vlan",
        matches: is_vlan,
        classify: vlan,
    },
    Rule {
        name: "bridge",
        matches: is_bridge,
        classify: bridge,
    },
    Rule {
        name: "device",
        matches: any,
        classify: device,
    },
];

pub(super) fn classify(ctx: &Context<'_>) -> Classification {
    RULES
        .iter()
        .find(|rule| (rule.matches)(ctx.name))
        .map(|rule| (rule.classify)(ctx))
        .unwrap_or_else(|| device(ctx))
}

fn is_loopback(name: &str) -> bool {
    name == "lo"
}

fn is_veth(name: &str) -> bool {
    name.starts_with("veth")
}

fn is_tap(name: &str) -> bool {
    name.starts_with("vnet")
}

fn is_macvtap(name: &str) -> bool {
    name.starts_with("macvtap") || name.starts_with("macvlan")
}

fn is_vlan(name: &str) -> bool {
    name.starts_with("vlan")
}

fn is_bridge(name: &str) -> bool {
    ["br", "docker", "incus"].iter().any(|p| name.starts_with(p))
}

/// Docker's per-network bridges are named `br-<12 hex of network id>`.
fn is_docker_hash_bridge(name: &str) -> bool {
    name.starts_with("br-")
}

fn any(_: &str) -> bool {
    true
}

fn loopback(_: &Context<'_>) -> Classification {
    Classification {
        instance_type: InstanceType::Loopback,
        instance: "loopback".to_string(),
        app: SYSTEM_APP.to_string(),
        vlan: String::new(),
    }
}

fn container_veth(ctx: &Context<'_>) -> Classification {
    let mut c = if let Some(container) = ctx.sources.container_veths.get(ctx.name) {
        Classification {
            instance_type: InstanceType::Docker,
            instance: container.name.clone(),
            app: container.app_name(),
            vlan: String::new(),
        }
    } else if let Some(name) = ctx.sources.incus_veths.get(ctx.name) {
        Classification {
            instance_type: InstanceType::Incus,
            instance: name.clone(),
            app: name.clone(),
            vlan: String::new(),
        }
    } else {
        // Orphan: no live owner found, fall back to the parent bridge's network.
        let app = ctx
            .bridge
            .and_then(|br| ctx.sources.bridge_networks.get(br))
            .map(|net| app_name_from_network(&net.name))
            .unwrap_or_default();
        ctx.raw(InstanceType::Docker, &app)
    };
    c.vlan = ctx.inherited_vlan();
    c
}

fn vm_tap(ctx: &Context<'_>) -> Classification {
    let mut c = vm_owned(ctx, InstanceType::Vm);
    c.vlan = ctx.inherited_vlan();
    c
}

/// Macvtap sits directly on a NIC, never under a bridge, so nothing is inherited.
fn macvtap(ctx: &Context<'_>) -> Classification {
    vm_owned(ctx, InstanceType::Macvtap)
}

fn vm_owned(ctx: &Context<'_>, instance_type: InstanceType) -> Classification {
    match ctx.sources.vm_interfaces.get(ctx.name) {
        Some(vm) => Classification {
            instance_type,
            instance: vm.clone(),
            app: vm.clone(),
            vlan: String::new(),
        },
        None => ctx.raw(instance_type, ""),
    }
}

fn vlan(ctx: &Context<'_>) -> Classification {
    let mut c = ctx.raw(InstanceType::Vlan, SYSTEM_APP);
    c.vlan = match ctx.sources.vlans.get(ctx.name) {
        Some(v) => v.id.clone(),
        None => ctx.inherited_vlan(),
    };
    c
}

fn bridge(ctx: &Context<'_>) -> Classification {
    let mut c = if is_docker_hash_bridge(ctx.name) {
        match ctx.sources.bridge_networks.get(ctx.name) {
            Some(net) => Classification {
                instance_type: InstanceType::Bridge,
                instance: net.name.clone(),
                app: net.app_name(),
                vlan: String::new(),
            },
            None => ctx.raw(InstanceType::Bridge, ""),
        }
    } else {
        // br0, docker0, incusbr0: well-known system bridges keep their own name.
        ctx.raw(InstanceType::Bridge, SYSTEM_APP)
    };
    // Its own recorded id first; a bridge enslaved to another bridge inherits one level.
    c.vlan = match ctx.bridge_vlans.get(ctx.name) {
        Some(id) => id.clone(),
        None => ctx.inherited_vlan(),
    };
    c
}

fn device(ctx: &Context<'_>) -> Classification {
    let instance_type = if ctx.facts.has_driver {
        InstanceType::Physical
    } else {
        InstanceType::Unknown
    };
    let mut c = ctx.raw(instance_type, SYSTEM_APP);
    match ctx.sources.vlans.get(ctx.name) {
        Some(v) => {
            c.instance_type = InstanceType::Vlan;
            c.vlan = v.id.clone();
        }
        None => c.vlan = ctx.inherited_vlan(),
    }
    c
}

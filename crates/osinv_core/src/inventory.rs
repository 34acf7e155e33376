//! Inventory assembly.
//!
//! [`build_list`] produces the full group/host/variable structure expected
//! from `--list`, [`build_host`] the variables of a single host for `--host`.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, info};

use osinv_templates::Evaluator;

use crate::error::{InventoryError, InventoryResult};
use crate::resolve::{include, resolve_groups, resolve_host_vars, resolve_name, HostVars};
use crate::store::ResourceStore;

/// Members of a single group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Group {
    pub hosts: Vec<String>,
}

/// Per-host variables, serialized as the reserved `_meta` group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Meta {
    pub hostvars: IndexMap<String, HostVars>,
}

/// A complete dynamic inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Inventory {
    #[serde(flatten)]
    groups: IndexMap<String, Group>,
    #[serde(rename = "_meta")]
    meta: Meta,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the host generated from resource `resource` with its groups and
    /// variables.
    ///
    /// Groups are created on first use. Host names must be unique.
    pub fn add_host(
        &mut self,
        resource: &str,
        name: String,
        groups: IndexSet<String>,
        host_vars: HostVars,
    ) -> InventoryResult<()> {
        if self.meta.hostvars.contains_key(&name) {
            return Err(InventoryError::DuplicateName {
                name,
                resource: resource.to_string(),
            });
        }

        for group_name in groups {
            let group = self.groups.entry(group_name).or_default();
            if !group.hosts.contains(&name) {
                group.hosts.push(name.clone());
            }
        }
        self.meta.hostvars.insert(name, host_vars);
        Ok(())
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Groups in order of first use.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &Group)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    pub fn host_vars(&self, name: &str) -> Option<&HostVars> {
        self.meta.hostvars.get(name)
    }

    pub fn contains_host(&self, name: &str) -> bool {
        self.meta.hostvars.contains_key(name)
    }

    pub fn host_count(&self) -> usize {
        self.meta.hostvars.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Build the inventory of every included resource, in snapshot order.
pub fn build_list<E: Evaluator + ?Sized>(
    store: &ResourceStore,
    evaluator: &E,
) -> InventoryResult<Inventory> {
    let mut inventory = Inventory::new();

    for resource in store.iter() {
        debug!("Processing resource {}", resource.id());
        if !include(evaluator, resource)? {
            continue;
        }

        let name = resolve_name(evaluator, resource)?;
        let groups = resolve_groups(evaluator, resource)?;
        let host_vars = resolve_host_vars(evaluator, resource)?;

        inventory.add_host(resource.id(), name, groups, host_vars)?;
    }

    info!(
        "Built inventory with {} hosts in {} groups from {} resources",
        inventory.host_count(),
        inventory.group_count(),
        store.len()
    );
    Ok(inventory)
}

/// Host variables of the first included resource named `target`.
///
/// An unknown host yields empty variables, not an error.
pub fn build_host<E: Evaluator + ?Sized>(
    store: &ResourceStore,
    evaluator: &E,
    target: &str,
) -> InventoryResult<HostVars> {
    for resource in store.iter() {
        if !include(evaluator, resource)? {
            continue;
        }
        if resolve_name(evaluator, resource)? == target {
            debug!("Host '{}' is resource {}", target, resource.id());
            return resolve_host_vars(evaluator, resource);
        }
    }

    debug!("Host '{}' not found", target);
    Ok(HostVars::new())
}

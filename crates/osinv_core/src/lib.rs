//! # osinv_core
//!
//! Maps a snapshot of cloud resources onto an Ansible dynamic inventory.
//!
//! For every resource of a [`ResourceStore`], four templates decide whether
//! the resource is included, what it is called, which groups it belongs to
//! and which host variables it exports. The results are assembled into an
//! [`Inventory`] (for `--list`) or a single host's variables (for `--host`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use osinv_core::{build_list, ResourceStore};
//! use osinv_templates::TemplateRenderer;
//!
//! let store = ResourceStore::load("openstack.info").unwrap();
//! let renderer = TemplateRenderer::with_defaults().unwrap();
//!
//! let inventory = build_list(&store, &renderer).unwrap();
//! println!("{}", serde_json::to_string(&inventory).unwrap());
//! ```

pub mod error;
pub mod inventory;
pub mod literal;
pub mod resolve;
pub mod store;

pub use error::{InventoryError, InventoryResult, LiteralError};
pub use inventory::{build_host, build_list, Group, Inventory, Meta};
pub use literal::parse_literal;
pub use resolve::{
    include, parse_value, resolve_groups, resolve_host_vars, resolve_name, HostVars, META_GROUP,
};
pub use store::{Resource, ResourceStore, RESOURCE_ID_KEY};

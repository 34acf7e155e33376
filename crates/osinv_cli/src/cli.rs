//! Command line definition.
//!
//! Follows the Ansible dynamic inventory protocol: the inventory is requested
//! with `--list` and a single host's variables with `--host <name>`.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use osinv_templates::TemplateKind;

/// Ansible dynamic inventory for OpenStack resource snapshots
#[derive(Parser, Debug)]
#[command(name = "osinv")]
#[command(version, about = "OpenStack Ansible dynamic inventory")]
#[command(long_about = r#"
Reads a JSON snapshot of OpenStack resources and prints an Ansible dynamic
inventory. Four Jinja templates, rendered once per resource, decide which
resources are included, their inventory names, their groups and their
host variables.

Templates are taken from the command line, then the environment, then the
[templates] table of the config file, then the built-in defaults.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Config error (snapshot or config file)
  4 - Template error
"#)]
#[command(group(ArgGroup::new("mode").args(["list", "host"])))]
pub struct Cli {
    /// List inventory
    #[arg(long)]
    pub list: bool,

    /// Get hostvars for a specific host
    #[arg(long, value_name = "INVENTORY_NAME")]
    pub host: Option<String>,

    /// Print additional debugging information to stderr
    #[arg(long)]
    pub debug: bool,

    /// Location of the OpenStack info snapshot
    #[arg(
        long = "info",
        value_name = "PATH",
        env = "OPENSTACK_INFO",
        default_value = "openstack.info"
    )]
    pub info: PathBuf,

    /// TOML or YAML file providing templates
    #[arg(long, value_name = "PATH", env = "OSI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Template generating the inventory name of a resource
    #[arg(long, value_name = "TEMPLATE", env = "OSI_ANSIBLE_INVENTORY_NAME_TEMPLATE")]
    pub ansible_inventory_name_template: Option<String>,

    /// Template generating newline separated group names of a resource
    #[arg(long, value_name = "TEMPLATE", env = "OSI_ANSIBLE_GROUPS_TEMPLATE")]
    pub ansible_groups_template: Option<String>,

    /// Template rendering 'True' to include a resource or 'False' to exclude it
    #[arg(long, value_name = "TEMPLATE", env = "OSI_ANSIBLE_RESOURCE_FILTER_TEMPLATE")]
    pub ansible_resource_filter_template: Option<String>,

    /// Template generating newline separated '<key>=<value>' host variables
    #[arg(long, value_name = "TEMPLATE", env = "OSI_ANSIBLE_HOST_VARS_TEMPLATE")]
    pub ansible_host_vars_template: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// What the inventory consumer asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Host(String),
}

impl Cli {
    pub fn mode(&self) -> Option<Mode> {
        if self.list {
            Some(Mode::List)
        } else {
            self.host.clone().map(Mode::Host)
        }
    }

    /// Template given on the command line or in the environment.
    pub fn template(&self, kind: TemplateKind) -> Option<&str> {
        match kind {
            TemplateKind::Name => self.ansible_inventory_name_template.as_deref(),
            TemplateKind::Groups => self.ansible_groups_template.as_deref(),
            TemplateKind::Filter => self.ansible_resource_filter_template.as_deref(),
            TemplateKind::HostVars => self.ansible_host_vars_template.as_deref(),
        }
    }
}

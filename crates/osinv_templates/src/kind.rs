//! The four inventory templates and their built-in defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Names the inventory name after the resource identifier, which is unique
/// within a snapshot.
pub const DEFAULT_NAME_TEMPLATE: &str = "{{ uuid }}";

/// Puts every resource in the `all` group.
pub const DEFAULT_GROUPS_TEMPLATE: &str = "all";

/// Includes compute instances only.
pub const DEFAULT_FILTER_TEMPLATE: &str = r#"{{ type == "instance" }}"#;

/// Sets `ansible_host` from the first address attribute present (IPv6 before
/// IPv4, access addresses before interface addresses) and exports every
/// attribute prefixed with `os_`.
pub const DEFAULT_HOST_VARS_TEMPLATE: &str = "ansible_host={{ accessIPv6 or accessIPv4 or interface_ip or ip }}
{% for attr, value in resource|items %}
os_{{ attr }}={{ value }}
{% endfor %}";

/// One of the four per-resource templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Derives the inventory name of a resource.
    Name,
    /// Derives the newline separated group names of a resource.
    Groups,
    /// Decides whether a resource is included (`True`) or not (`False`).
    Filter,
    /// Derives newline separated `key=value` host variables.
    HostVars,
}

impl TemplateKind {
    /// All kinds, in the order they are compiled.
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Name,
        TemplateKind::Groups,
        TemplateKind::Filter,
        TemplateKind::HostVars,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "inventory_name",
            Self::Groups => "groups",
            Self::Filter => "resource_filter",
            Self::HostVars => "host_vars",
        }
    }

    /// Environment variable that overrides the default source.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Name => "OSI_ANSIBLE_INVENTORY_NAME_TEMPLATE",
            Self::Groups => "OSI_ANSIBLE_GROUPS_TEMPLATE",
            Self::Filter => "OSI_ANSIBLE_RESOURCE_FILTER_TEMPLATE",
            Self::HostVars => "OSI_ANSIBLE_HOST_VARS_TEMPLATE",
        }
    }

    pub fn default_source(&self) -> &'static str {
        match self {
            Self::Name => DEFAULT_NAME_TEMPLATE,
            Self::Groups => DEFAULT_GROUPS_TEMPLATE,
            Self::Filter => DEFAULT_FILTER_TEMPLATE,
            Self::HostVars => DEFAULT_HOST_VARS_TEMPLATE,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Per-resource template interpretation.
//!
//! Each resolver renders one template against a resource and interprets the
//! rendered text: the filter as a boolean, the name as-is, the groups as one
//! name per line and the host variables as one `key=value` pair per line.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use osinv_templates::{Evaluator, TemplateKind};

use crate::error::{InventoryError, InventoryResult, LiteralError};
use crate::literal::parse_literal;
use crate::store::Resource;

/// Group name reserved for per-host variables in the inventory output.
pub const META_GROUP: &str = "_meta";

/// Host variables of a single host.
pub type HostVars = Map<String, Value>;

static HOST_VAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[^=]*[^=\s])\s*=\s*(?P<value>.*)$").expect("host var pattern is valid")
});

fn render<E: Evaluator + ?Sized>(
    evaluator: &E,
    kind: TemplateKind,
    resource: &Resource,
) -> InventoryResult<String> {
    evaluator
        .render(kind, resource.attributes())
        .map_err(|e| InventoryError::template(resource.id(), e))
}

/// Non-empty lines of rendered output, with surrounding whitespace removed.
fn lines(rendered: &str) -> impl Iterator<Item = &str> {
    rendered.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Decide whether a resource is part of the inventory.
///
/// The filter template must render exactly `True` or `False`, surrounding
/// whitespace included; anything else is an error rather than a guess.
pub fn include<E: Evaluator + ?Sized>(evaluator: &E, resource: &Resource) -> InventoryResult<bool> {
    let rendered = render(evaluator, TemplateKind::Filter, resource)?;
    match rendered.as_str() {
        "True" => Ok(true),
        "False" => {
            debug!("Resource {} excluded by filter", resource.id());
            Ok(false)
        }
        other => Err(InventoryError::result(
            TemplateKind::Filter,
            resource.id(),
            format!("expected 'True' or 'False', got '{}'", other),
        )),
    }
}

/// Render the inventory name of a resource.
pub fn resolve_name<E: Evaluator + ?Sized>(
    evaluator: &E,
    resource: &Resource,
) -> InventoryResult<String> {
    let name = render(evaluator, TemplateKind::Name, resource)?;
    if name.is_empty() {
        return Err(InventoryError::result(
            TemplateKind::Name,
            resource.id(),
            "rendered inventory name is empty",
        ));
    }
    debug!("Rendered inventory name as '{}' for {}", name, resource.id());
    Ok(name)
}

/// Render the groups of a resource, in order of first appearance.
pub fn resolve_groups<E: Evaluator + ?Sized>(
    evaluator: &E,
    resource: &Resource,
) -> InventoryResult<IndexSet<String>> {
    let rendered = render(evaluator, TemplateKind::Groups, resource)?;

    let mut groups = IndexSet::new();
    for group in lines(&rendered) {
        if group == META_GROUP {
            return Err(InventoryError::result(
                TemplateKind::Groups,
                resource.id(),
                format!("'{}' is reserved and cannot be used as a group", META_GROUP),
            ));
        }
        groups.insert(group.to_string());
    }

    debug!("Rendered groups as {:?} for {}", groups, resource.id());
    Ok(groups)
}

/// Render the host variables of a resource.
///
/// Sequence and mapping literals become structured values; every other value
/// is kept as a string. A repeated key keeps its last value.
pub fn resolve_host_vars<E: Evaluator + ?Sized>(
    evaluator: &E,
    resource: &Resource,
) -> InventoryResult<HostVars> {
    let rendered = render(evaluator, TemplateKind::HostVars, resource)?;

    let mut host_vars = HostVars::new();
    for line in lines(&rendered) {
        let captures = HOST_VAR_LINE.captures(line).ok_or_else(|| {
            InventoryError::result(
                TemplateKind::HostVars,
                resource.id(),
                format!("expected '<key>=<value>', got '{}'", line),
            )
        })?;
        let key = &captures["key"];
        let value = parse_value(&captures["value"]);

        if host_vars.contains_key(key) {
            debug!("host_var '{}' set more than once for {}", key, resource.id());
        }
        debug!("host_var '{}' set to {} for {}", key, value, resource.id());
        host_vars.insert(key.to_string(), value);
    }

    Ok(host_vars)
}

/// Interpret a rendered host variable value.
pub fn parse_value(raw: &str) -> Value {
    match parse_literal(raw) {
        Ok(value) => value,
        Err(LiteralError::NotStructured) => Value::String(raw.to_string()),
        Err(e) => {
            debug!("Keeping '{}' as a string: {}", raw, e);
            Value::String(raw.to_string())
        }
    }
}

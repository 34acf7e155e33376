//! Integration tests for inventory building with real templates.

use std::fs;

use osinv_core::{build_host, build_list, InventoryError, ResourceStore};
use osinv_templates::{TemplateKind, TemplateRenderer, TemplateSources};
use serde_json::{json, Value};
use tempfile::tempdir;

fn store(snapshot: Value) -> ResourceStore {
    ResourceStore::from_value(snapshot).unwrap()
}

fn renderer(sources: TemplateSources) -> TemplateRenderer {
    TemplateRenderer::compile(sources).unwrap()
}

fn list(store: &ResourceStore, renderer: &TemplateRenderer) -> Value {
    serde_json::to_value(build_list(store, renderer).unwrap()).unwrap()
}

/// A single instance with the default templates.
#[test]
fn test_default_templates_single_instance() {
    let store = store(json!({"r1": {"type": "instance", "ip": "10.0.0.5"}}));
    let output = list(&store, &TemplateRenderer::with_defaults().unwrap());

    assert_eq!(output["all"], json!({"hosts": ["r1"]}));

    let host_vars = &output["_meta"]["hostvars"]["r1"];
    assert_eq!(host_vars["ansible_host"], json!("10.0.0.5"));
    assert_eq!(host_vars["os_type"], json!("instance"));
    assert_eq!(host_vars["os_ip"], json!("10.0.0.5"));
    assert_eq!(host_vars["os_uuid"], json!("r1"));
}

/// Resources other than instances are excluded by default.
#[test]
fn test_default_filter_excludes_volumes() {
    let store = store(json!({"r1": {"type": "volume", "ip": "10.0.0.5"}}));
    let output = list(&store, &TemplateRenderer::with_defaults().unwrap());

    assert_eq!(output, json!({"_meta": {"hostvars": {}}}));
}

#[test]
fn test_excluded_resources_appear_nowhere() {
    let store = store(json!({
        "i1": {"type": "instance", "name": "web01"},
        "v1": {"type": "volume", "name": "data01"},
        "i2": {"type": "instance", "name": "web02"}
    }));
    let renderer = renderer(TemplateSources::new().with(TemplateKind::Name, "{{ name }}"));
    let inventory = build_list(&store, &renderer).unwrap();

    assert!(!inventory.contains_host("data01"));
    for (_, group) in inventory.groups() {
        assert!(!group.hosts.iter().any(|h| h == "data01"));
    }
    assert_eq!(inventory.host_count(), 2);
}

/// Two resources sharing a metadata group end up in both groups.
#[test]
fn test_groups_from_metadata() {
    let store = store(json!({
        "r1": {"type": "instance", "metadata": {"ansible_group": "web"}},
        "r2": {"type": "instance", "metadata": {"ansible_group": "web"}}
    }));
    let renderer = renderer(TemplateSources::new().with(
        TemplateKind::Groups,
        r"{{ ['all', metadata.ansible_group] | join('\n') }}",
    ));
    let output = list(&store, &renderer);

    assert_eq!(output["web"], json!({"hosts": ["r1", "r2"]}));
    assert_eq!(output["all"], json!({"hosts": ["r1", "r2"]}));
}

#[test]
fn test_repeated_group_lines_do_not_duplicate_members() {
    let store = store(json!({"r1": {"type": "instance"}}));
    let renderer = renderer(
        TemplateSources::new().with(TemplateKind::Groups, "all\nweb\nall\n  web\n"),
    );
    let output = list(&store, &renderer);

    assert_eq!(output["all"], json!({"hosts": ["r1"]}));
    assert_eq!(output["web"], json!({"hosts": ["r1"]}));
}

#[test]
fn test_structured_host_vars() {
    let store = store(json!({"r1": {"type": "instance"}}));
    let renderer = renderer(TemplateSources::new().with(
        TemplateKind::HostVars,
        "nums=[1, 2, 3]\nlabel=foo\nvolumes={{ ['a', 'b'] }}\n",
    ));
    let output = list(&store, &renderer);
    let host_vars = &output["_meta"]["hostvars"]["r1"];

    assert_eq!(host_vars["nums"], json!([1, 2, 3]));
    assert_eq!(host_vars["label"], json!("foo"));
    assert_eq!(host_vars["volumes"], json!(["a", "b"]));
}

#[test]
fn test_nested_attributes_round_trip_through_default_host_vars() {
    let store = store(json!({
        "r1": {"type": "instance", "networks": ["private", "public"], "metadata": {"role": "web"}}
    }));
    let output = list(&store, &TemplateRenderer::with_defaults().unwrap());
    let host_vars = &output["_meta"]["hostvars"]["r1"];

    assert_eq!(host_vars["os_networks"], json!(["private", "public"]));
    assert_eq!(host_vars["os_metadata"], json!({"role": "web"}));
}

#[test]
fn test_control_characters_in_nested_strings_survive() {
    let store = store(json!({
        "r1": {"type": "instance", "tags": ["plain", "esc\u{1b}[0m"]}
    }));
    let output = list(&store, &TemplateRenderer::with_defaults().unwrap());

    assert_eq!(
        output["_meta"]["hostvars"]["r1"]["os_tags"],
        json!(["plain", "esc\u{1b}[0m"])
    );
}

#[test]
fn test_duplicate_names_abort_the_run() {
    let store = store(json!({
        "r1": {"type": "instance", "name": "web"},
        "r2": {"type": "instance", "name": "web"}
    }));
    let renderer = renderer(TemplateSources::new().with(TemplateKind::Name, "{{ name }}"));

    let err = build_list(&store, &renderer).unwrap_err();
    assert!(matches!(
        err,
        InventoryError::DuplicateName { ref name, ref resource } if name == "web" && resource == "r2"
    ));
}

#[test]
fn test_bad_filter_output_aborts_the_run() {
    let store = store(json!({"r1": {"type": "instance"}}));
    let renderer = renderer(TemplateSources::new().with(TemplateKind::Filter, "{{ type }}"));

    let err = build_list(&store, &renderer).unwrap_err();
    assert!(err.is_template_error());
}

#[test]
fn test_padded_filter_output_aborts_the_run() {
    let store = store(json!({"r1": {"type": "instance"}}));
    let renderer = renderer(TemplateSources::new().with(TemplateKind::Filter, "  True  \n\n"));

    let err = build_list(&store, &renderer).unwrap_err();
    assert!(matches!(
        err,
        InventoryError::TemplateResult { kind: TemplateKind::Filter, .. }
    ));
}

/// A resource with its own `resource` attribute still gets the default variables.
#[test]
fn test_default_templates_with_resource_attribute() {
    let store = store(json!({"r1": {"type": "instance", "ip": "10.0.0.5", "resource": "vol-1"}}));
    let output = list(&store, &TemplateRenderer::with_defaults().unwrap());

    assert_eq!(output["all"], json!({"hosts": ["r1"]}));
    let host_vars = &output["_meta"]["hostvars"]["r1"];
    assert_eq!(host_vars["ansible_host"], json!("10.0.0.5"));
    assert_eq!(host_vars["os_resource"], json!("vol-1"));
    assert_eq!(host_vars["os_uuid"], json!("r1"));
}

#[test]
fn test_malformed_host_vars_abort_the_run() {
    let store = store(json!({"r1": {"type": "instance"}}));
    let renderer = renderer(TemplateSources::new().with(TemplateKind::HostVars, "ansible_host"));

    assert!(build_list(&store, &renderer).is_err());
}

#[test]
fn test_build_host() {
    let store = store(json!({
        "r1": {"type": "instance", "name": "web01", "ip": "10.0.0.5"},
        "r2": {"type": "instance", "name": "web02", "ip": "10.0.0.6"}
    }));
    let renderer = renderer(TemplateSources::new().with(TemplateKind::Name, "{{ name }}"));

    let host_vars = build_host(&store, &renderer, "web02").unwrap();
    assert_eq!(host_vars["ansible_host"], json!("10.0.0.6"));

    let inventory = build_list(&store, &renderer).unwrap();
    assert_eq!(inventory.host_vars("web02"), Some(&host_vars));
}

#[test]
fn test_build_host_unknown_name() {
    let store = store(json!({
        "r1": {"type": "instance"},
        "v1": {"type": "volume"}
    }));
    let renderer = TemplateRenderer::with_defaults().unwrap();

    assert!(build_host(&store, &renderer, "missing").unwrap().is_empty());
    // excluded resources are unknown hosts too
    assert!(build_host(&store, &renderer, "v1").unwrap().is_empty());
}

#[test]
fn test_snapshot_file_end_to_end() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("openstack.info");
    fs::write(
        &path,
        r#"{
            "8c1f": {"type": "instance", "name": "web01", "accessIPv4": "192.0.2.10"},
            "9d2e": {"type": "instance", "name": "db01", "accessIPv4": "192.0.2.11"},
            "a3b4": {"type": "network", "name": "private"}
        }"#,
    )
    .unwrap();

    let store = ResourceStore::load(&path).unwrap();
    let renderer = renderer(
        TemplateSources::new()
            .with(TemplateKind::Name, "{{ name }}")
            .with(TemplateKind::Groups, "all\n{{ name[:2] }}"),
    );
    let output = list(&store, &renderer);

    assert_eq!(output["all"], json!({"hosts": ["web01", "db01"]}));
    assert_eq!(output["we"], json!({"hosts": ["web01"]}));
    assert_eq!(output["db"], json!({"hosts": ["db01"]}));
    assert_eq!(
        output["_meta"]["hostvars"]["db01"]["ansible_host"],
        json!("192.0.2.11")
    );
    assert!(output.get("private").is_none());
}

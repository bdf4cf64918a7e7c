// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use ifcx_core::{
    CompositionConfig, CompositionStatus, Diagnostic, ErrorPolicy, Federation, IfcxDocument,
};
use serde_json::{json, Value};

fn doc(value: Value) -> IfcxDocument {
    IfcxDocument::from_json_str(&value.to_string()).expect("fixture parses")
}

/// Document holding one entry with only attributes.
fn single(path: &str, attributes: Value) -> IfcxDocument {
    doc(json!({"data": [{"path": path, "attributes": attributes}]}))
}

#[test]
fn two_file_example_composes_with_later_file_winning() {
    let mut fed = Federation::default();
    fed.add_file(
        "File1",
        doc(json!({"data": [
            {"path": "root1", "children": {"Wall": "wall1"}},
            {"path": "wall1", "attributes": {"h": 3}}
        ]})),
    );
    fed.add_file("File2", single("wall1", json!({"h": 5, "w": 2})));

    let root = fed.composed_root().expect("composed");
    assert_eq!(root.path, "root1");
    assert_eq!(root.children.len(), 1);
    let wall = &root.children[0];
    assert_eq!(wall.name, "Wall");
    assert_eq!(wall.path, "wall1");
    let attributes = Value::Object(wall.attributes.clone());
    assert_eq!(attributes, json!({"h": 5, "w": 2}));
    assert_eq!(wall.source_files, vec!["File1", "File2"]);
}

#[test]
fn override_law_falls_back_to_earlier_file() {
    let mut fed = Federation::default();
    fed.add_file("A", single("x", json!({"c": "a", "only_a": 1})));
    fed.add_file("B", single("x", json!({"other": 2})));
    let x = fed.composed_root().unwrap();
    assert_eq!(x.attributes["c"], json!("a"));

    fed.add_file("C", single("x", json!({"c": "c"})));
    let x = fed.composed_root().unwrap();
    assert_eq!(x.attributes["c"], json!("c"));
    assert_eq!(x.attributes["only_a"], json!(1));

    // Reordering flips the winner.
    fed.move_file(2, 0);
    assert_eq!(fed.composed_root().unwrap().attributes["c"], json!("a"));
}

#[test]
fn recomposition_is_idempotent() {
    let mut fed = Federation::default();
    fed.add_file(
        "model",
        doc(json!({"data": [
            {"path": "site", "children": {"B": "building", "C": "building/Storey"}},
            {"path": "building", "children": {"Storey": "storey"}, "inherits": {"t": "type"}},
            {"path": "storey", "attributes": {"elevation": 0}},
            {"path": "type", "attributes": {"kind": "office"}}
        ]})),
    );
    let first = fed.composed_root().cloned();
    fed.recompose();
    let second = fed.composed_root().cloned();
    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(
        fed.report().status,
        CompositionStatus::Composed { nodes: 4 }
    );
}

fn first_child_color(fed: &Federation) -> Value {
    let root = fed.composed_root().unwrap();
    root.children[0].attributes["color"].clone()
}

#[test]
fn gap_fill_and_own_value_wins() {
    let base = json!({"data": [
        {"path": "root", "children": {"N": "n"}},
        {"path": "n", "inherits": {"m": "m"}},
        {"path": "m", "attributes": {"color": "red"}}
    ]});
    let mut fed = Federation::default();
    fed.add_file("base", doc(base));
    assert_eq!(first_child_color(&fed), json!("red"));

    fed.add_file("paint", single("n", json!({"color": "blue"})));
    assert_eq!(first_child_color(&fed), json!("blue"));
}

#[test]
fn single_inherit_root_collapses_to_target() {
    let mut fed = Federation::default();
    fed.add_file(
        "f",
        doc(json!({"data": [
            {"path": "entry", "inherits": {"main": "Wall1"}},
            {"path": "Wall1", "attributes": {"h": 3}}
        ]})),
    );
    let root = fed.composed_root().unwrap();
    assert_eq!(root.path, "Wall1");
    assert_eq!(root.name, "Wall1");
    assert!(root.children.is_empty());
}

#[test]
fn cycles_terminate_and_are_reported() {
    let mut fed = Federation::default();
    fed.add_file(
        "f",
        doc(json!({"data": [
            {"path": "root", "children": {"A": "a", "B": "b"}},
            {"path": "a", "attributes": {"a": 1}, "inherits": {"x": "b"}},
            {"path": "b", "attributes": {"b": 1}, "inherits": {"x": "a"}}
        ]})),
    );
    let root = fed.composed_root().unwrap();
    let a = root.child("A").unwrap();
    let b = root.child("B").unwrap();
    assert_eq!(a.attributes.len(), 2);
    assert_eq!(b.attributes.len(), 2);
    let cycles = fed
        .report()
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::CircularReference { .. }))
        .count();
    assert_eq!(cycles, 2);
}

#[test]
fn visibility_toggle_removes_and_restores_subtree() {
    let mut fed = Federation::default();
    fed.add_file("site", single("site", json!({"n": 1})));
    fed.add_file(
        "annex",
        doc(json!({"data": [
            {"path": "annex", "children": {"Room": "room"}},
            {"path": "room", "attributes": {"area": 12}}
        ]})),
    );
    let both = fed.composed_root().cloned().unwrap();
    let names: Vec<_> = both.children.iter().map(|c| c.path.clone()).collect();
    assert_eq!(both.name, "Root");
    assert_eq!(names, vec!["site", "annex"]);

    fed.set_file_visibility(1, false);
    let hidden = fed.composed_root().unwrap();
    assert_eq!(hidden.path, "site");
    assert!(hidden.find("annex").is_none());

    fed.set_file_visibility(1, true);
    assert_eq!(fed.composed_root(), Some(&both));
}

#[test]
fn no_root_found_is_reported() {
    let mut fed = Federation::default();
    fed.add_file("f", doc(json!({"data": [{"path": "a/b"}]})));
    assert!(fed.composed_root().is_none());
    assert_eq!(fed.report().status, CompositionStatus::NoRoot);
    assert!(fed.report().diagnostics.contains(&Diagnostic::NoRoot));
}

#[test]
fn missing_schemas_warn_without_changing_output() {
    let fixture = json!({
        "schemas": {"bsi::ifc::height": {"value": {"quantityKind": "Length"}}},
        "data": [{"path": "w", "attributes": {"bsi::ifc::height": 3, "custom::note": "x"}}]
    });
    let mut fed = Federation::default();
    fed.add_file("f", doc(fixture.clone()));
    assert_eq!(
        fed.report().diagnostics,
        vec![Diagnostic::MissingSchema {
            path: "w".into(),
            key: "custom::note".into()
        }]
    );
    let with_validation = fed.composed_root().cloned();

    let mut quiet = Federation::new(CompositionConfig {
        validate_schemas: false,
        ..CompositionConfig::default()
    });
    quiet.add_file("f", doc(fixture));
    assert!(quiet.report().diagnostics.is_empty());
    assert_eq!(quiet.composed_root().cloned(), with_validation);

    let root = fed.composed_root().unwrap();
    let flat = fed.flattened_attributes(root);
    assert_eq!(flat["bsi::ifc::height"], json!("3 m"));
    assert_eq!(flat["custom::note"], json!("x"));
}

fn chain_of(len: usize, field: &str) -> IfcxDocument {
    let data: Vec<Value> = (0..len)
        .map(|i| {
            let mut entry = json!({"path": format!("n{i}"), "attributes": {format!("k{i}"): i}});
            if i + 1 < len {
                entry[field] = json!({"next": format!("n{}", i + 1)});
            }
            entry
        })
        .collect();
    doc(json!({ "data": data }))
}

fn deep_chain(len: usize) -> IfcxDocument {
    chain_of(len, "children")
}

#[test]
fn default_depth_limit_is_reachable_through_children() {
    let limit = CompositionConfig::default().max_depth;
    let mut fed = Federation::default();
    fed.add_file("deep", chain_of(limit, "children"));
    assert_eq!(
        fed.report().status,
        CompositionStatus::Composed { nodes: limit }
    );
    let last = vec!["next"; limit - 1].join("/");
    let leaf = fed.composed_root().unwrap().find(&last).unwrap();
    assert_eq!(leaf.path, format!("n{}", limit - 1));
}

#[test]
fn default_depth_limit_is_reachable_through_inherits() {
    let limit = CompositionConfig::default().max_depth;
    let mut fed = Federation::default();
    fed.add_file("deep", chain_of(limit, "inherits"));
    assert_eq!(
        fed.report().status,
        CompositionStatus::Composed { nodes: 1 }
    );
    let root = fed.composed_root().unwrap();
    assert_eq!(root.attributes.len(), limit);
}

#[test]
fn one_past_default_depth_limit_fails_without_crashing() {
    let limit = CompositionConfig::default().max_depth;
    for field in ["children", "inherits"] {
        let mut fed = Federation::default();
        fed.add_file("deep", chain_of(limit + 1, field));
        assert!(fed.composed_root().is_none());
        assert_eq!(
            fed.report().status,
            CompositionStatus::Failed {
                reason: format!("reference chain exceeded depth {limit} at `n{limit}`"),
            }
        );
    }
}

#[test]
fn depth_failure_clears_tree_by_default() {
    let mut fed = Federation::new(CompositionConfig {
        max_depth: 8,
        ..CompositionConfig::default()
    });
    fed.add_file("ok", deep_chain(4));
    assert!(fed.composed_root().is_some());
    fed.add_file("deep", deep_chain(20));
    assert!(fed.composed_root().is_none());
    assert!(matches!(
        fed.report().status,
        CompositionStatus::Failed { .. }
    ));
    assert_eq!(fed.files().len(), 2);
}

#[test]
fn depth_failure_keeps_last_good_when_configured() {
    let mut fed = Federation::new(CompositionConfig {
        max_depth: 8,
        on_error: ErrorPolicy::KeepLastGood,
        ..CompositionConfig::default()
    });
    fed.add_file("ok", deep_chain(4));
    let good = fed.composed_root().cloned();
    fed.add_file("deep", deep_chain(20));
    assert!(matches!(
        fed.report().status,
        CompositionStatus::Failed { .. }
    ));
    assert_eq!(fed.composed_root().cloned(), good);
}

//! End-to-end diff scenarios.

mod common;

use common::{diff_default, foo_bar_schema, foo_with_field, primary_ops};
use schemadiff_core::edits::EditOperation;
use schemadiff_core::schema::{EnumValueDef, FieldDef, Schema, TypeDef};
use schemadiff_core::{diff_schemas, DiffConfig, VertexTag};

// ---------------------------------------------------------------------------
// Scenario A: identical schemas
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_a_identical_schema_costs_nothing() {
    let diff = diff_default(&foo_bar_schema(), &foo_bar_schema());

    assert_eq!(diff.cost(), Some(0));
    assert!(diff.is_identical());
    let optimal = diff.optimal().unwrap();
    assert_eq!(optimal.solutions.len(), 1);
    assert!(optimal.solutions[0].operations.is_empty());
    assert_eq!(diff.identity.source_digest, diff.identity.target_digest);
}

// ---------------------------------------------------------------------------
// Scenario B: field removed
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_b_removed_field_is_deleted() {
    let new = Schema::new().with_type(TypeDef::object("Foo"));
    let diff = diff_default(&foo_bar_schema(), &new);

    // bar, String, Foo -> bar, bar -> String
    assert_eq!(diff.cost(), Some(4));
    let ops = primary_ops(&diff);
    assert_eq!(ops.len(), 4);

    assert!(ops.iter().any(|op| matches!(
        op,
        EditOperation::DeleteVertex { source } if source.key == "Foo.bar" && source.tag == VertexTag::Field
    )));
    assert!(ops.iter().any(|op| matches!(
        op,
        EditOperation::DeleteEdge { source } if source.from == "Foo" && source.to == "Foo.bar" && source.label == "field"
    )));
}

#[test]
fn test_scenario_b_sibling_field_kept() {
    let old = Schema::new().with_type(
        TypeDef::object("Foo")
            .with_field(FieldDef::new("bar", "String"))
            .with_field(FieldDef::new("other", "Int")),
    );
    let new = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("other", "Int")));
    let diff = diff_default(&old, &new);

    assert_eq!(diff.cost(), Some(4));
    let ops = primary_ops(&diff);
    let deleted: Vec<&str> = ops
        .iter()
        .filter_map(|op| match op {
            EditOperation::DeleteVertex { source } => Some(source.key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(deleted, vec!["Foo.bar", "String"]);
}

// ---------------------------------------------------------------------------
// Scenario C: field renamed
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_c_rename_is_single_substitution() {
    for preprocess in [true, false] {
        let config = DiffConfig::default().with_preprocess(preprocess);
        let diff = diff_schemas(&foo_with_field("bar"), &foo_with_field("baz"), &config).unwrap();

        assert_eq!(diff.cost(), Some(1), "preprocess = {}", preprocess);
        let ops = primary_ops(&diff);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            EditOperation::ChangeVertex { source, target, .. } => {
                assert_eq!(source.key, "Foo.bar");
                assert_eq!(target.key, "Foo.baz");
            }
            other => panic!("expected change-vertex, got {:?}", other),
        }
    }
}

#[test]
fn test_scenario_c_preprocessing_resolves_without_search() {
    let diff = diff_default(&foo_with_field("bar"), &foo_with_field("baz"));
    assert_eq!(diff.stats.forced, 3);
    assert_eq!(diff.stats.steps, 0);
}

// ---------------------------------------------------------------------------
// Scenario D: unrelated schemas of equal size
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_d_unrelated_kinds_share_no_edges() {
    let old = Schema::new().with_type(TypeDef::object("A").with_field(FieldDef::new("x", "Int")));
    let new = Schema::new().with_type(
        TypeDef::enumeration("E")
            .with_value(EnumValueDef::new("P"))
            .with_value(EnumValueDef::new("Q")),
    );
    let diff = diff_default(&old, &new);

    // No tag is shared, so every vertex goes through a placeholder:
    // 3 deletions, 3 insertions, 2 edges deleted, 2 edges inserted
    assert_eq!(diff.identity.padded_size, 6);
    assert_eq!(diff.cost(), Some(10));
    let optimal = diff.optimal().unwrap();
    assert_eq!(optimal.solutions.len(), 1);

    let ops = primary_ops(&diff);
    let count = |pred: fn(&EditOperation) -> bool| ops.iter().filter(|op| pred(op)).count();
    assert_eq!(count(|op| matches!(op, EditOperation::DeleteVertex { .. })), 3);
    assert_eq!(count(|op| matches!(op, EditOperation::InsertVertex { .. })), 3);
    assert_eq!(count(|op| matches!(op, EditOperation::DeleteEdge { .. })), 2);
    assert_eq!(count(|op| matches!(op, EditOperation::InsertEdge { .. })), 2);
    assert!(!ops.iter().any(|op| matches!(
        op,
        EditOperation::ChangeVertex { .. } | EditOperation::ChangeEdge { .. }
    )));
}

#[test]
fn test_scenario_d_unrelated_scalars_substituted() {
    let old = Schema::new()
        .with_type(TypeDef::scalar("Alpha"))
        .with_type(TypeDef::scalar("Beta"));
    let new = Schema::new()
        .with_type(TypeDef::scalar("Gamma"))
        .with_type(TypeDef::scalar("Delta"));
    let diff = diff_default(&old, &new);

    assert_eq!(diff.cost(), Some(2));
    let optimal = diff.optimal().unwrap();
    // Either pairing costs 2
    assert_eq!(optimal.solutions.len(), 2);
    assert!(!optimal.ties_truncated);
    for solution in &optimal.solutions {
        assert_eq!(solution.operations.len(), 2);
        assert!(solution
            .operations
            .iter()
            .all(|op| matches!(op, EditOperation::ChangeVertex { .. })));
    }
    assert_eq!(optimal.mappings().len(), optimal.edit_operation_lists().len());
}

#[test]
fn test_scenario_d_tie_cap_truncates() {
    let old = Schema::new()
        .with_type(TypeDef::scalar("Alpha"))
        .with_type(TypeDef::scalar("Beta"));
    let new = Schema::new()
        .with_type(TypeDef::scalar("Gamma"))
        .with_type(TypeDef::scalar("Delta"));
    let config = DiffConfig::default().with_max_tied_solutions(1);
    let diff = diff_schemas(&old, &new, &config).unwrap();

    let optimal = diff.optimal().unwrap();
    assert_eq!(optimal.cost, 2);
    assert_eq!(optimal.solutions.len(), 1);
    assert!(optimal.ties_truncated);
}

#[test]
fn test_default_config_keeps_every_tie() {
    let scalars = |names: &[&str]| {
        names
            .iter()
            .fold(Schema::new(), |schema, name| schema.with_type(TypeDef::scalar(*name)))
    };
    let old = scalars(&["A1", "A2", "A3", "A4", "A5"]);
    let new = scalars(&["B1", "B2", "B3", "B4", "B5"]);
    let diff = diff_default(&old, &new);

    // every one of the 5! pairings renames all five scalars
    let optimal = diff.optimal().unwrap();
    assert_eq!(optimal.cost, 5);
    assert_eq!(optimal.solutions.len(), 120);
    assert!(!optimal.ties_truncated);
}

// ---------------------------------------------------------------------------
// Type kind change
// ---------------------------------------------------------------------------

#[test]
fn test_kind_change_keeps_members_mapped() {
    let fields = |type_def: TypeDef| {
        type_def
            .with_field(FieldDef::new("a", "Int"))
            .with_field(FieldDef::new("b", "Int"))
    };
    let old = Schema::new().with_type(fields(TypeDef::object("Foo")));
    let new = Schema::new().with_type(fields(TypeDef::interface("Foo")));
    let diff = diff_default(&old, &new);

    // object Foo deleted, interface Foo inserted, both field edges re-attached
    assert_eq!(diff.cost(), Some(6));
    assert_eq!(diff.optimal().unwrap().solutions.len(), 1);
    let ops = primary_ops(&diff);
    assert!(ops.iter().any(|op| matches!(
        op,
        EditOperation::DeleteVertex { source } if source.key == "Foo" && source.tag == VertexTag::Object
    )));
    assert!(ops.iter().any(|op| matches!(
        op,
        EditOperation::InsertVertex { target } if target.key == "Foo" && target.tag == VertexTag::Interface
    )));
    assert!(!ops.iter().any(|op| matches!(
        op,
        EditOperation::DeleteVertex { source } if source.tag == VertexTag::Field
    )));
    assert!(!ops.iter().any(|op| matches!(
        op,
        EditOperation::DeleteEdge { source } if source.label.starts_with("type:")
    )));
}

// ---------------------------------------------------------------------------
// Larger evolution
// ---------------------------------------------------------------------------

#[test]
fn test_library_evolution_cost() {
    let diff = diff_default(&common::library_schema(), &common::evolved_library_schema());

    // rename 1, nullability 1, enum value 2, union member 1, input field 3
    assert_eq!(diff.cost(), Some(8));
    assert!(diff.is_complete());
    assert_eq!(primary_ops(&diff).len(), 8);
}

#[test]
fn test_placeholders_are_not_permuted() {
    let old = Schema::new().with_type(
        TypeDef::object("Foo")
            .with_field(FieldDef::new("a", "Int"))
            .with_field(FieldDef::new("b", "Int"))
            .with_field(FieldDef::new("c", "Int")),
    );
    let new = Schema::new().with_type(TypeDef::object("Foo"));

    // 3 fields, Int, 3 containment edges, 3 type edges
    let removed = diff_default(&old, &new);
    assert_eq!(removed.cost(), Some(10));
    assert_eq!(removed.optimal().unwrap().solutions.len(), 1);

    let added = diff_default(&new, &old);
    assert_eq!(added.cost(), Some(10));
    assert_eq!(added.optimal().unwrap().solutions.len(), 1);
}

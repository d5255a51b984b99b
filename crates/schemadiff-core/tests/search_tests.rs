//! Preprocessing, exact search and budget handling.

mod common;

use common::{evolved_library_schema, library_schema};
use schemadiff_core::config::{CancellationToken, DiffConfig, SearchBudget};
use schemadiff_core::ged::{
    isolate_vertices, search_mappings, CompatibilityClass, CostModel, SearchOutcome,
};
use schemadiff_core::graph::{build_graph, GraphSide};
use schemadiff_core::schema::{FieldDef, Schema, TypeDef};
use schemadiff_core::{DiffOutcome, SchemaDiffer, StopReason};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `type Foo { <a>: String  <b>: Int }`: two open fields on each side
fn two_field_schema(a: &str, b: &str) -> Schema {
    Schema::new().with_type(
        TypeDef::object("Foo")
            .with_field(FieldDef::new(a, "String"))
            .with_field(FieldDef::new(b, "Int")),
    )
}

fn incomplete_reason(outcome: &DiffOutcome) -> StopReason {
    match outcome {
        DiffOutcome::Incomplete(incomplete) => incomplete.reason,
        DiffOutcome::Optimal(_) => panic!("expected an incomplete diff"),
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

#[test]
fn test_padding_keeps_classes_balanced() {
    let source = build_graph(&library_schema(), GraphSide::Source).unwrap();
    let target = build_graph(&evolved_library_schema(), GraphSide::Target).unwrap();
    let iso = isolate_vertices(&source, &target, true).unwrap();

    assert_eq!(iso.source.len(), iso.target.len());
    assert_eq!(iso.size(), iso.source.len());

    let mut source_classes = iso.source_classes.clone();
    let mut target_classes = iso.target_classes.clone();
    source_classes.sort();
    target_classes.sort();
    assert_eq!(source_classes, target_classes);
}

#[test]
fn test_placeholder_keeps_padded_class() {
    let source = build_graph(&library_schema(), GraphSide::Source).unwrap();
    let target = build_graph(&evolved_library_schema(), GraphSide::Target).unwrap();
    let iso = isolate_vertices(&source, &target, true).unwrap();

    // Genre gains a value on the target side, so the source is padded
    for index in source.len()..iso.size() {
        let vertex = iso.source.vertex(index as u32);
        assert!(vertex.is_isolated());
        assert_ne!(
            iso.source_classes[index],
            CompatibilityClass::of(&iso.source, index as u32)
        );
    }
}

#[test]
fn test_forced_assignments_respect_classes() {
    let source = build_graph(&library_schema(), GraphSide::Source).unwrap();
    let target = build_graph(&evolved_library_schema(), GraphSide::Target).unwrap();
    let iso = isolate_vertices(&source, &target, true).unwrap();

    assert!(iso.forced > 0);
    for (u, v) in iso.fixed.pairs() {
        assert_eq!(iso.source_classes[u as usize], iso.target_classes[v as usize]);
        assert!(iso.possible[u as usize].is_empty());
    }
    for u in iso.open_vertices() {
        let candidates = &iso.possible[u as usize];
        assert!(candidates.len() > 1);
        assert!(candidates.windows(2).all(|w| w[0] < w[1]));
    }
}

// ---------------------------------------------------------------------------
// Exact search
// ---------------------------------------------------------------------------

#[test]
fn test_search_mappings_are_optimal_and_total() {
    let source = build_graph(&library_schema(), GraphSide::Source).unwrap();
    let target = build_graph(&evolved_library_schema(), GraphSide::Target).unwrap();
    let iso = isolate_vertices(&source, &target, true).unwrap();
    let result = search_mappings(&iso, &DiffConfig::default(), None).unwrap();

    let costs = CostModel::new(&iso.source, &iso.target).unwrap();
    match result.outcome {
        SearchOutcome::Complete { cost, mappings, .. } => {
            assert_eq!(cost, 8);
            assert!(!mappings.is_empty());
            for mapping in &mappings {
                assert!(mapping.is_total());
                assert_eq!(costs.mapping_cost(mapping).unwrap(), cost);
                for (u, v) in iso.fixed.pairs() {
                    assert_eq!(mapping.get(u), Some(v));
                }
            }
        }
        other => panic!("expected a complete search, got {:?}", other),
    }
    assert!(result.stats.leaves >= 1);
}

#[test]
fn test_preprocessing_does_not_change_cost() {
    let old = library_schema();
    let new = evolved_library_schema();
    for preprocess in [true, false] {
        let config = DiffConfig::default().with_preprocess(preprocess);
        let diff = SchemaDiffer::new(config).diff(&old, &new).unwrap();
        assert_eq!(diff.cost(), Some(8), "preprocess = {}", preprocess);
    }
}

#[test]
fn test_bound_prunes_branches() {
    let old = library_schema();
    let new = evolved_library_schema();
    let config = DiffConfig::default().with_preprocess(false);
    let diff = SchemaDiffer::new(config).diff(&old, &new).unwrap();
    assert!(diff.stats.pruned > 0);
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

#[test]
fn test_step_limit_yields_incomplete() {
    let config = DiffConfig::default().with_budget(SearchBudget::steps(0));
    let diff = SchemaDiffer::new(config)
        .diff(&two_field_schema("a", "b"), &two_field_schema("c", "d"))
        .unwrap();

    assert!(!diff.is_complete());
    assert!(!diff.is_identical());
    assert_eq!(diff.cost(), None);
    assert_eq!(incomplete_reason(&diff.outcome), StopReason::StepLimit);
}

#[test]
fn test_time_limit_yields_incomplete() {
    let config = DiffConfig::default().with_budget(SearchBudget::millis(0));
    let diff = SchemaDiffer::new(config)
        .diff(&two_field_schema("a", "b"), &two_field_schema("c", "d"))
        .unwrap();

    assert_eq!(incomplete_reason(&diff.outcome), StopReason::TimeLimit);
}

#[test]
fn test_cancelled_token_yields_incomplete() {
    let token = CancellationToken::new();
    token.cancel();
    let diff = SchemaDiffer::default()
        .with_cancellation(token)
        .diff(&two_field_schema("a", "b"), &two_field_schema("c", "d"))
        .unwrap();

    assert_eq!(incomplete_reason(&diff.outcome), StopReason::Cancelled);
}

#[test]
fn test_incomplete_solutions_price_correctly() {
    let old = library_schema();
    let new = evolved_library_schema();
    let config = DiffConfig::default()
        .with_preprocess(false)
        .with_budget(SearchBudget::steps(60));
    let diff = SchemaDiffer::new(config).diff(&old, &new).unwrap();

    if let DiffOutcome::Incomplete(incomplete) = &diff.outcome {
        assert_eq!(incomplete.reason, StopReason::StepLimit);
        assert!(incomplete.steps > 0);
        let costs = CostModel::new(&diff.source_graph, &diff.target_graph).unwrap();
        for solution in &incomplete.solutions {
            assert_eq!(
                Some(costs.mapping_cost(&solution.mapping).unwrap()),
                incomplete.best_cost
            );
            assert!(incomplete.best_cost.unwrap() >= 8);
        }
    }
}

#[test]
fn test_resolved_diff_ignores_zero_budget() {
    // Every class is a singleton, so nothing is left to search
    let config = DiffConfig::default().with_budget(SearchBudget::steps(0));
    let diff = SchemaDiffer::new(config)
        .diff(&common::foo_with_field("bar"), &common::foo_with_field("baz"))
        .unwrap();
    assert_eq!(diff.cost(), Some(1));
}

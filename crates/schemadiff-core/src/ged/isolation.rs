//! Padding and forced-assignment preprocessing.
//!
//! Vertices are partitioned into compatibility classes by tag. A source
//! vertex may only map to a target vertex of its own class, so padding
//! balances every class separately with isolated placeholders; a total
//! bijection then always exists. Where a vertex sits (an object field versus
//! an interface field) does not restrict it: containment and type references
//! are priced as edges by the cost model. The fixpoint fixes every source vertex left with a single
//! admissible target. Such an assignment holds in every admissible
//! bijection, so fixing it cannot lose an optimum.

use crate::errors::{Result, SchemaDiffError};
use crate::ged::mapping::Mapping;
use crate::graph::{SchemaGraph, VertexTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Vertices of one class may substitute for each other
///
/// A vertex of another tag is only reachable through a placeholder, so a
/// type whose kind changes is deleted and re-inserted while its members keep
/// their images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompatibilityClass {
    pub tag: VertexTag,
}

impl CompatibilityClass {
    pub fn of(graph: &SchemaGraph, index: u32) -> Self {
        Self {
            tag: graph.vertex(index).tag,
        }
    }
}

/// Output of preprocessing
#[derive(Debug, Clone)]
pub struct IsolatedVertices {
    /// Source graph padded with placeholders
    pub source: SchemaGraph,
    /// Target graph padded with placeholders
    pub target: SchemaGraph,
    /// Class of every padded source vertex; placeholders carry the class they pad
    pub source_classes: Vec<CompatibilityClass>,
    pub target_classes: Vec<CompatibilityClass>,
    /// Forced partial mapping
    pub fixed: Mapping,
    /// Remaining admissible targets per source vertex, ascending; empty once fixed
    pub possible: Vec<Vec<u32>>,
    /// Number of assignments fixed by the fixpoint
    pub forced: usize,
}

impl IsolatedVertices {
    pub fn size(&self) -> usize {
        self.source.len()
    }

    /// Source vertices the search still has to assign
    pub fn open_vertices(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.size() as u32).filter(move |&u| self.fixed.get(u).is_none())
    }

    pub fn is_resolved(&self) -> bool {
        self.fixed.is_total()
    }
}

/// Pad both graphs and, when `preprocess` is set, fix forced assignments
///
/// # Errors
///
/// Internal invariant violations only: unequal padded sizes, a fixed mapping
/// larger than the graphs, or a source vertex with no admissible target.
pub fn isolate_vertices(
    source: &SchemaGraph,
    target: &SchemaGraph,
    preprocess: bool,
) -> Result<IsolatedVertices> {
    let mut source_classes: Vec<_> = (0..source.len() as u32)
        .map(|i| CompatibilityClass::of(source, i))
        .collect();
    let mut target_classes: Vec<_> = (0..target.len() as u32)
        .map(|i| CompatibilityClass::of(target, i))
        .collect();

    let mut balance: BTreeMap<CompatibilityClass, (usize, usize)> = BTreeMap::new();
    for class in &source_classes {
        balance.entry(*class).or_default().0 += 1;
    }
    for class in &target_classes {
        balance.entry(*class).or_default().1 += 1;
    }
    for (class, (s, t)) in &balance {
        if s < t {
            source_classes.extend(std::iter::repeat(*class).take(t - s));
        } else {
            target_classes.extend(std::iter::repeat(*class).take(s - t));
        }
    }

    let source = source.padded(source_classes.len() - source.len());
    let target = target.padded(target_classes.len() - target.len());
    if source.len() != target.len() {
        return Err(SchemaDiffError::GraphSizeMismatch {
            source_size: source.len(),
            target_size: target.len(),
        });
    }
    let size = source.len();

    let mut targets_by_class: BTreeMap<CompatibilityClass, Vec<u32>> = BTreeMap::new();
    for (v, class) in target_classes.iter().enumerate() {
        targets_by_class.entry(*class).or_default().push(v as u32);
    }
    let mut possible: Vec<Vec<u32>> = source_classes
        .iter()
        .map(|class| targets_by_class.get(class).cloned().unwrap_or_default())
        .collect();

    let mut fixed = Mapping::new(size);
    let mut forced = 0;
    if preprocess {
        loop {
            let mut changed = false;
            for u in 0..size as u32 {
                if fixed.get(u).is_some() {
                    continue;
                }
                let candidates = &mut possible[u as usize];
                candidates.retain(|&v| !fixed.is_target_used(v));
                match candidates.as_slice() {
                    [] => {
                        return Err(SchemaDiffError::NoPossibleMapping {
                            vertex: source.vertex(u).key.clone(),
                        })
                    }
                    [only] => {
                        fixed.insert(u, *only)?;
                        candidates.clear();
                        forced += 1;
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                break;
            }
        }
    } else if let Some(u) = possible.iter().position(Vec::is_empty) {
        return Err(SchemaDiffError::NoPossibleMapping {
            vertex: source.vertex(u as u32).key.clone(),
        });
    }

    if fixed.len() > size {
        return Err(SchemaDiffError::MappingOverflow {
            size: fixed.len(),
            capacity: size,
        });
    }

    debug!(
        padded_size = size,
        classes = balance.len(),
        forced,
        open = size - fixed.len(),
        "isolation preprocessing done"
    );

    Ok(IsolatedVertices {
        source,
        target,
        source_classes,
        target_classes,
        fixed,
        possible,
        forced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, GraphSide};
    use crate::schema::{FieldDef, Schema, TypeDef};

    fn graphs(old: &Schema, new: &Schema) -> (SchemaGraph, SchemaGraph) {
        (
            build_graph(old, GraphSide::Source).unwrap(),
            build_graph(new, GraphSide::Target).unwrap(),
        )
    }

    #[test]
    fn test_pads_each_class() {
        let old = Schema::new().with_type(
            TypeDef::object("Foo")
                .with_field(FieldDef::new("a", "Int"))
                .with_field(FieldDef::new("b", "Int")),
        );
        let new = Schema::new()
            .with_type(TypeDef::object("Foo").with_field(FieldDef::new("a", "Int")))
            .with_type(TypeDef::scalar("Date"));
        let (s, t) = graphs(&old, &new);
        let iso = isolate_vertices(&s, &t, true).unwrap();
        // source: Foo, a, b, Int + a scalar placeholder
        // target: Date, Foo, a, Int + a field placeholder
        assert_eq!(iso.size(), 5);
        assert_eq!(iso.source.real_len(), 4);
        assert_eq!(iso.target.real_len(), 4);
        assert_eq!(iso.source_classes.len(), iso.target_classes.len());
    }

    #[test]
    fn test_singleton_classes_are_forced() {
        let old = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("bar", "String")));
        let new = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("baz", "String")));
        let (s, t) = graphs(&old, &new);
        let iso = isolate_vertices(&s, &t, true).unwrap();
        assert!(iso.is_resolved());
        assert_eq!(iso.forced, 3);
        assert_eq!(iso.open_vertices().count(), 0);
    }

    #[test]
    fn test_fields_compatible_across_owner_kinds() {
        let old = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("a", "Int")));
        let new = Schema::new().with_type(TypeDef::interface("Foo").with_field(FieldDef::new("a", "Int")));
        let (s, t) = graphs(&old, &new);
        let iso = isolate_vertices(&s, &t, true).unwrap();

        let source_field = s.vertex_by_key("Foo.a").unwrap().id.index;
        let target_field = t.vertex_by_key("Foo.a").unwrap().id.index;
        assert_eq!(
            CompatibilityClass::of(&s, source_field),
            CompatibilityClass::of(&t, target_field)
        );
        assert_eq!(iso.fixed.get(source_field), Some(target_field));
    }

    #[test]
    fn test_disabled_preprocessing_fixes_nothing() {
        let old = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("bar", "String")));
        let (s, t) = graphs(&old, &old);
        let iso = isolate_vertices(&s, &t, false).unwrap();
        assert!(iso.fixed.is_empty());
        assert_eq!(iso.forced, 0);
        assert!(iso.possible.iter().all(|p| p.len() == 1));
    }
}

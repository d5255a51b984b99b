use crate::edits::model::{EdgeRef, EditOperation, EditSolution, PropertyChange, VertexRef};
use crate::errors::Result;
use crate::ged::cost::{CostModel, RawEdit};
use crate::ged::Mapping;
use crate::graph::{SchemaGraph, Vertex};
use std::collections::BTreeSet;

/// Materialize the edit list of every winning mapping
///
/// Solutions keep the order in which the search produced the mappings.
///
/// # Errors
///
/// `IncompleteMapping` if any mapping is not total over the padded graphs.
pub fn reconstruct(costs: &CostModel<'_>, mappings: Vec<Mapping>) -> Result<Vec<EditSolution>> {
    mappings
        .into_iter()
        .map(|mapping| {
            let operations = edit_operations(costs, &mapping)?;
            Ok(EditSolution {
                mapping,
                operations,
            })
        })
        .collect()
}

/// Edit list of one total mapping; its length is the mapping's cost
///
/// # Errors
///
/// `IncompleteMapping` if the mapping is partial.
pub fn edit_operations(costs: &CostModel<'_>, mapping: &Mapping) -> Result<Vec<EditOperation>> {
    let source = costs.source();
    let target = costs.target();
    let operations = costs
        .raw_edits(mapping)?
        .into_iter()
        .map(|edit| match edit {
            RawEdit::InsertVertex { target: v } => EditOperation::InsertVertex {
                target: vertex_ref(target.vertex(v)),
            },
            RawEdit::DeleteVertex { source: u } => EditOperation::DeleteVertex {
                source: vertex_ref(source.vertex(u)),
            },
            RawEdit::ChangeVertex {
                source: u,
                target: v,
            } => EditOperation::ChangeVertex {
                source: vertex_ref(source.vertex(u)),
                target: vertex_ref(target.vertex(v)),
                changed_properties: property_changes(source.vertex(u), target.vertex(v)),
            },
            RawEdit::DeleteEdge { source_edge } => EditOperation::DeleteEdge {
                source: edge_ref(source, source_edge),
            },
            RawEdit::ChangeEdge {
                source_edge,
                target_edge,
            } => EditOperation::ChangeEdge {
                source: edge_ref(source, source_edge),
                target: edge_ref(target, target_edge),
            },
            RawEdit::InsertEdge { target_edge } => EditOperation::InsertEdge {
                target: edge_ref(target, target_edge),
            },
        })
        .collect();
    Ok(operations)
}

fn vertex_ref(vertex: &Vertex) -> VertexRef {
    VertexRef {
        id: vertex.id,
        key: vertex.key.clone(),
        tag: vertex.tag,
    }
}

fn edge_ref(graph: &SchemaGraph, index: usize) -> EdgeRef {
    let edge = &graph.edges()[index];
    EdgeRef {
        from: graph.vertex(edge.from).key.clone(),
        to: graph.vertex(edge.to).key.clone(),
        label: edge.label.clone(),
    }
}

/// Property-level delta; a tag change is reported as the pseudo-property `tag`
fn property_changes(old: &Vertex, new: &Vertex) -> Vec<PropertyChange> {
    let mut changes = Vec::new();
    if old.tag != new.tag {
        changes.push(PropertyChange {
            name: "tag".to_string(),
            old: Some(old.tag.to_string()),
            new: Some(new.tag.to_string()),
        });
    }
    let names: BTreeSet<&String> = old.properties.keys().chain(new.properties.keys()).collect();
    for name in names {
        let before = old.properties.get(name);
        let after = new.properties.get(name);
        if before != after {
            changes.push(PropertyChange {
                name: name.clone(),
                old: before.cloned(),
                new: after.cloned(),
            });
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ged::isolate_vertices;
    use crate::graph::{build_graph, GraphSide};
    use crate::schema::{FieldDef, Schema, TypeDef};

    #[test]
    fn test_rename_reports_name_property() {
        let old = Schema::new().with_type(
            TypeDef::object("Foo").with_field(FieldDef::new("bar", "String").with_description("d")),
        );
        let new = Schema::new().with_type(
            TypeDef::object("Foo").with_field(FieldDef::new("baz", "String").with_description("d")),
        );
        let s = build_graph(&old, GraphSide::Source).unwrap();
        let t = build_graph(&new, GraphSide::Target).unwrap();
        let iso = isolate_vertices(&s, &t, true).unwrap();
        let costs = CostModel::new(&iso.source, &iso.target).unwrap();

        let ops = edit_operations(&costs, &iso.fixed).unwrap();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            EditOperation::ChangeVertex {
                source,
                target,
                changed_properties,
            } => {
                assert_eq!(source.key, "Foo.bar");
                assert_eq!(target.key, "Foo.baz");
                assert_eq!(
                    changed_properties,
                    &vec![PropertyChange {
                        name: "name".to_string(),
                        old: Some("bar".to_string()),
                        new: Some("baz".to_string()),
                    }]
                );
            }
            other => panic!("unexpected operation {:?}", other),
        }
    }
}

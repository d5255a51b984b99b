//! Edit operation output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Operations carry the identities of the affected vertices and edges, so
//! they stay meaningful without the graphs they were computed from.

use crate::ged::{Mapping, StopReason};
use crate::graph::{VertexId, VertexTag};
use serde::{Deserialize, Serialize};

/// Identity of a vertex in one of the two graphs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VertexRef {
    /// Arena id, namespaced by graph side
    pub id: VertexId,
    /// Schema path of the vertex (e.g. `Foo.bar`)
    pub key: String,
    /// Structural role
    pub tag: VertexTag,
}

/// Identity of an edge, by endpoint keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeRef {
    /// Key of the source endpoint
    pub from: String,
    /// Key of the target endpoint
    pub to: String,
    /// Relationship label (`field`, `implements`, `type:[Int!]`, ...)
    pub label: String,
}

/// One property whose value differs across a changed vertex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyChange {
    pub name: String,
    /// Value in the old schema, absent if the property was added
    pub old: Option<String>,
    /// Value in the new schema, absent if the property was removed
    pub new: Option<String>,
}

/// A single unit-cost edit turning the old graph into the new one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    /// A vertex exists only in the new graph
    InsertVertex { target: VertexRef },
    /// A vertex exists only in the old graph
    DeleteVertex { source: VertexRef },
    /// A vertex was substituted by one with different properties
    ChangeVertex {
        source: VertexRef,
        target: VertexRef,
        changed_properties: Vec<PropertyChange>,
    },
    /// An edge exists only in the new graph
    InsertEdge { target: EdgeRef },
    /// An edge exists only in the old graph
    DeleteEdge { source: EdgeRef },
    /// An edge between corresponding endpoints changed its label
    ChangeEdge { source: EdgeRef, target: EdgeRef },
}

impl EditOperation {
    /// One-line human-readable description
    pub fn description(&self) -> String {
        match self {
            EditOperation::InsertVertex { target } => {
                format!("insert {} '{}'", target.tag, target.key)
            }
            EditOperation::DeleteVertex { source } => {
                format!("delete {} '{}'", source.tag, source.key)
            }
            EditOperation::ChangeVertex {
                source,
                target,
                changed_properties,
            } => {
                let names: Vec<&str> = changed_properties.iter().map(|p| p.name.as_str()).collect();
                if source.key == target.key {
                    format!("change {} '{}' ({})", source.tag, source.key, names.join(", "))
                } else {
                    format!(
                        "change {} '{}' to '{}' ({})",
                        source.tag,
                        source.key,
                        target.key,
                        names.join(", ")
                    )
                }
            }
            EditOperation::InsertEdge { target } => {
                format!("insert edge {} -[{}]-> {}", target.from, target.label, target.to)
            }
            EditOperation::DeleteEdge { source } => {
                format!("delete edge {} -[{}]-> {}", source.from, source.label, source.to)
            }
            EditOperation::ChangeEdge { source, target } => format!(
                "change edge {} -> {} from '{}' to '{}'",
                source.from, source.to, source.label, target.label
            ),
        }
    }

    pub fn is_vertex_operation(&self) -> bool {
        matches!(
            self,
            EditOperation::InsertVertex { .. }
                | EditOperation::DeleteVertex { .. }
                | EditOperation::ChangeVertex { .. }
        )
    }
}

/// One optimal mapping together with the edits it induces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditSolution {
    /// Bijection over the padded vertex sets
    pub mapping: Mapping,
    /// Edits in emission order; `operations.len()` equals the solution cost
    pub operations: Vec<EditOperation>,
}

/// Every mapping tied at the proven minimum cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptimalEdit {
    /// Minimum edit distance; 0 means structurally identical
    pub cost: u64,
    /// Tied-optimal solutions, in discovery order; never empty
    pub solutions: Vec<EditSolution>,
    /// True if more ties may exist beyond the configured cap
    pub ties_truncated: bool,
}

impl OptimalEdit {
    pub fn mappings(&self) -> Vec<&Mapping> {
        self.solutions.iter().map(|s| &s.mapping).collect()
    }

    /// Parallel to [`Self::mappings`]
    pub fn edit_operation_lists(&self) -> Vec<&[EditOperation]> {
        self.solutions.iter().map(|s| s.operations.as_slice()).collect()
    }

    /// The first solution found
    pub fn primary(&self) -> Option<&EditSolution> {
        self.solutions.first()
    }
}

/// Best solutions known when the search budget ran out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncompleteDiff {
    /// Cost of `solutions`, an upper bound on the true distance; `None` if no
    /// complete mapping was reached
    pub best_cost: Option<u64>,
    /// Solutions tied at `best_cost`, not proven optimal
    pub solutions: Vec<EditSolution>,
    /// Which limit stopped the search
    pub reason: StopReason,
    /// Steps taken before stopping
    pub steps: u64,
}

//! Edit cost of vertex mappings.
//!
//! Unit costs throughout: a vertex pair with different tag or properties
//! costs 1 (a placeholder on either side makes it an insertion or deletion),
//! and so does every edge that is deleted, inserted or relabelled. The edge
//! pass walks source edges first and then only the target edges with no
//! source preimage, so a relabel is never counted as delete plus insert.

use crate::errors::{Result, SchemaDiffError};
use crate::ged::mapping::Mapping;
use crate::graph::SchemaGraph;

/// One unit of edit cost, by arena index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawEdit {
    InsertVertex { target: u32 },
    DeleteVertex { source: u32 },
    ChangeVertex { source: u32, target: u32 },
    DeleteEdge { source_edge: usize },
    ChangeEdge { source_edge: usize, target_edge: usize },
    InsertEdge { target_edge: usize },
}

/// Cost oracle over a pair of equally sized graphs
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    source: &'a SchemaGraph,
    target: &'a SchemaGraph,
}

impl<'a> CostModel<'a> {
    /// # Errors
    ///
    /// `GraphSizeMismatch` unless both graphs have been padded to equal size.
    pub fn new(source: &'a SchemaGraph, target: &'a SchemaGraph) -> Result<Self> {
        if source.len() != target.len() {
            return Err(SchemaDiffError::GraphSizeMismatch {
                source_size: source.len(),
                target_size: target.len(),
            });
        }
        Ok(Self { source, target })
    }

    pub fn source(&self) -> &'a SchemaGraph {
        self.source
    }

    pub fn target(&self) -> &'a SchemaGraph {
        self.target
    }

    pub fn size(&self) -> usize {
        self.source.len()
    }

    pub fn vertex_cost(&self, u: u32, v: u32) -> u64 {
        u64::from(!self.source.vertex(u).same_content(self.target.vertex(v)))
    }

    /// Cost added by extending `partial` with `u -> v`
    ///
    /// Prices the vertex pair plus every edge, on either graph, between `u`
    /// (resp. `v`) and an already assigned vertex, self-loops included.
    /// `u` and `v` must both be unassigned in `partial`. Summing this over
    /// any assignment order of a total mapping yields [`Self::mapping_cost`].
    pub fn incremental_cost(&self, partial: &Mapping, u: u32, v: u32) -> u64 {
        let mut cost = self.vertex_cost(u, v);

        for edge in self.source.outgoing(u) {
            let image = if edge.to == u {
                Some(v)
            } else {
                partial.get(edge.to)
            };
            if let Some(x) = image {
                if self.target.label_between(v, x) != Some(edge.label.as_str()) {
                    cost += 1;
                }
            }
        }
        for edge in self.source.incoming(u) {
            if edge.from == u {
                continue;
            }
            if let Some(x) = partial.get(edge.from) {
                if self.target.label_between(x, v) != Some(edge.label.as_str()) {
                    cost += 1;
                }
            }
        }

        for edge in self.target.outgoing(v) {
            let preimage = if edge.to == v {
                Some(u)
            } else {
                partial.get_inverse(edge.to)
            };
            if let Some(w) = preimage {
                if self.source.edge_index_between(u, w).is_none() {
                    cost += 1;
                }
            }
        }
        for edge in self.target.incoming(v) {
            if edge.from == v {
                continue;
            }
            if let Some(w) = partial.get_inverse(edge.from) {
                if self.source.edge_index_between(w, u).is_none() {
                    cost += 1;
                }
            }
        }

        cost
    }

    /// Exact cost of a total mapping
    ///
    /// # Errors
    ///
    /// `IncompleteMapping` if the mapping is partial or sized for other graphs.
    pub fn mapping_cost(&self, mapping: &Mapping) -> Result<u64> {
        Ok(self.raw_edits(mapping)?.len() as u64)
    }

    /// Every unit of cost of a total mapping, in emission order
    ///
    /// Vertex edits by source index, then source-edge edits in edge order,
    /// then target-edge insertions in edge order.
    pub(crate) fn raw_edits(&self, mapping: &Mapping) -> Result<Vec<RawEdit>> {
        if mapping.size() != self.size() || !mapping.is_total() {
            return Err(SchemaDiffError::IncompleteMapping {
                mapped: mapping.len(),
                expected: self.size(),
            });
        }

        let mut edits = Vec::new();
        for (u, v) in mapping.pairs() {
            let source_vertex = self.source.vertex(u);
            let target_vertex = self.target.vertex(v);
            match (source_vertex.is_isolated(), target_vertex.is_isolated()) {
                (true, true) => {}
                (true, false) => edits.push(RawEdit::InsertVertex { target: v }),
                (false, true) => edits.push(RawEdit::DeleteVertex { source: u }),
                (false, false) => {
                    if !source_vertex.same_content(target_vertex) {
                        edits.push(RawEdit::ChangeVertex {
                            source: u,
                            target: v,
                        });
                    }
                }
            }
        }

        for (i, edge) in self.source.edges().iter().enumerate() {
            let (from, to) = match (mapping.get(edge.from), mapping.get(edge.to)) {
                (Some(from), Some(to)) => (from, to),
                _ => {
                    return Err(SchemaDiffError::Internal {
                        message: "total mapping left an edge endpoint unmapped".to_string(),
                    })
                }
            };
            match self.target.edge_index_between(from, to) {
                None => edits.push(RawEdit::DeleteEdge { source_edge: i }),
                Some(j) if self.target.edges()[j].label != edge.label => {
                    edits.push(RawEdit::ChangeEdge {
                        source_edge: i,
                        target_edge: j,
                    })
                }
                Some(_) => {}
            }
        }

        for (j, edge) in self.target.edges().iter().enumerate() {
            let preimage = mapping
                .get_inverse(edge.from)
                .zip(mapping.get_inverse(edge.to));
            let matched = preimage.is_some_and(|(from, to)| {
                self.source.edge_index_between(from, to).is_some()
            });
            if !matched {
                edits.push(RawEdit::InsertEdge { target_edge: j });
            }
        }

        Ok(edits)
    }
}

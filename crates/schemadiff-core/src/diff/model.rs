//! Schema diff output types.
//!
//! `DiffOutcome` and everything below it implement `Serialize, Deserialize,
//! PartialEq`, so outcomes can be stored and compared across runs.

use crate::analysis::SchemaChange;
use crate::edits::{EditOperation, EditSolution, IncompleteDiff, OptimalEdit};
use crate::ged::SearchStats;
use crate::graph::SchemaGraph;
use serde::{Deserialize, Serialize};

/// Content digests of both graphs, before padding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffIdentity {
    /// Digest of the old schema's graph
    pub source_digest: String,
    /// Digest of the new schema's graph
    pub target_digest: String,
    /// Vertex count of the old schema's graph
    pub source_vertices: usize,
    /// Vertex count of the new schema's graph
    pub target_vertices: usize,
    /// Common vertex count after padding
    pub padded_size: usize,
}

/// Result of one diff call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiffOutcome {
    /// Search exhausted; the cost is the proven minimum
    Optimal(OptimalEdit),
    /// Search budget ran out; the best result found is an upper bound only
    Incomplete(IncompleteDiff),
}

/// A computed diff together with the graphs it refers to.
///
/// The graphs are the padded graphs the search ran on, so every vertex id in
/// the edit operations resolves against them.
#[derive(Debug, Clone)]
pub struct SchemaDiff {
    pub identity: DiffIdentity,
    pub source_graph: SchemaGraph,
    pub target_graph: SchemaGraph,
    pub outcome: DiffOutcome,
    pub stats: SearchStats,
}

impl SchemaDiff {
    /// Proven minimum cost, if the search completed
    pub fn cost(&self) -> Option<u64> {
        self.optimal().map(|o| o.cost)
    }

    pub fn optimal(&self) -> Option<&OptimalEdit> {
        match &self.outcome {
            DiffOutcome::Optimal(optimal) => Some(optimal),
            DiffOutcome::Incomplete(_) => None,
        }
    }

    pub fn incomplete(&self) -> Option<&IncompleteDiff> {
        match &self.outcome {
            DiffOutcome::Optimal(_) => None,
            DiffOutcome::Incomplete(incomplete) => Some(incomplete),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, DiffOutcome::Optimal(_))
    }

    /// True only for a completed diff at cost 0
    ///
    /// An incomplete diff is never reported identical, whatever it found.
    pub fn is_identical(&self) -> bool {
        self.cost() == Some(0)
    }

    /// Tied-optimal solutions, or the best-known ones of an incomplete diff
    pub fn solutions(&self) -> &[EditSolution] {
        match &self.outcome {
            DiffOutcome::Optimal(optimal) => &optimal.solutions,
            DiffOutcome::Incomplete(incomplete) => &incomplete.solutions,
        }
    }

    /// Operations of the first solution, optimal or best-known
    pub fn primary_operations(&self) -> &[EditOperation] {
        self.solutions()
            .first()
            .map(|s| s.operations.as_slice())
            .unwrap_or(&[])
    }
}

/// A diff together with the schema changes of its first solution.
#[derive(Debug, Clone)]
pub struct AnalyzedDiff {
    pub diff: SchemaDiff,
    pub changes: Vec<SchemaChange>,
}

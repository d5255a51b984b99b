//! schemadiff core - minimum-cost structural diffing of typed schemas
//!
//! This crate computes the graph edit distance between two versions of a
//! typed schema and reconstructs the concrete edit operations, including:
//! - A structural schema model behind the read-only `SchemaView` boundary
//! - Deterministic schema → graph construction
//! - Per-tag padding and forced-assignment preprocessing
//! - Exact branch-and-bound search with a matching lower bound and budgets
//! - Edit operation reconstruction for every tied-optimal mapping
//! - A structural change analyzer interface for downstream classification
//!
//! ```
//! use schemadiff_core::schema::{FieldDef, Schema, TypeDef};
//! use schemadiff_core::{diff_schemas, DiffConfig};
//!
//! let old = Schema::new().with_type(
//!     TypeDef::object("Foo")
//!         .with_field(FieldDef::new("bar", "String"))
//!         .with_field(FieldDef::new("other", "Int")),
//! );
//! let new = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("other", "Int")));
//!
//! let diff = diff_schemas(&old, &new, &DiffConfig::default()).unwrap();
//! assert_eq!(diff.cost(), Some(4));
//! ```

pub mod analysis;
pub mod config;
pub mod diff;
pub mod edits;
pub mod errors;
pub mod ged;
pub mod graph;
pub mod logging_facility;
pub mod schema;

pub use schemadiff_core_types as core_types;

// Re-export commonly used types
pub use analysis::{SchemaChange, SchemaChangeAnalyzer, SchemaChangeKind, StructuralChangeAnalyzer};
pub use config::{CancellationToken, DiffConfig, SearchBudget};
pub use diff::{
    diff_schemas, render_human_summary, AnalyzedDiff, DiffOutcome, SchemaDiff, SchemaDiffer,
};
pub use edits::{EditOperation, EditSolution, IncompleteDiff, OptimalEdit};
pub use errors::{ExError, ExErrorKind, Result, SchemaDiffError};
pub use ged::{Mapping, SearchStats, StopReason};
pub use graph::{GraphSide, SchemaGraph, VertexTag};
pub use schema::{Schema, SchemaView};

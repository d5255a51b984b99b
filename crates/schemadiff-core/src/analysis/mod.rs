//! Downstream classification of edit operations.
//!
//! The diff core stops at a minimal, faithful edit list. Turning edits into
//! schema-level changes (and deciding which of those break clients) belongs
//! to a [`SchemaChangeAnalyzer`]. [`StructuralChangeAnalyzer`] is the
//! default: it names each change but never judges it.

pub mod model;
pub mod structural;

pub use model::{SchemaChange, SchemaChangeKind};
pub use structural::StructuralChangeAnalyzer;

use crate::edits::EditOperation;
use crate::schema::SchemaView;

/// Classifies raw edit operations into schema changes
pub trait SchemaChangeAnalyzer {
    /// `old` and `new` are the schemas the operations were computed from;
    /// vertex keys in the operations are paths into them.
    fn analyze_edits(
        &self,
        operations: &[EditOperation],
        old: &dyn SchemaView,
        new: &dyn SchemaView,
    ) -> Vec<SchemaChange>;
}

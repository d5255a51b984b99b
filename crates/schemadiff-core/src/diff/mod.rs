//! Schema diff engine.
//!
//! Computes the minimum-cost structural edit distance between two schema
//! snapshots and the concrete edit operations realizing it.
//!
//! ## Entry point
//!
//! ```ignore
//! use schemadiff_core::diff::{SchemaDiffer, render_human_summary};
//!
//! let diff = SchemaDiffer::new(config).diff(&old, &new)?;
//! println!("{}", render_human_summary(&diff));
//! ```
//!
//! ## Guarantees
//!
//! - **Optimality**: a `DiffOutcome::Optimal` cost is the proven minimum over
//!   tag-preserving bijections, and every tied solution is listed unless a
//!   tie cap is configured.
//! - **Determinism**: identical inputs produce identical outcomes, including
//!   solution order.
//! - **Honest degradation**: a search stopped by its budget is reported as
//!   `DiffOutcome::Incomplete`, never as a smaller or zero-cost result.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{diff_schemas, SchemaDiffer};
pub use human_summary::render_human_summary;
pub use model::{AnalyzedDiff, DiffIdentity, DiffOutcome, SchemaDiff};

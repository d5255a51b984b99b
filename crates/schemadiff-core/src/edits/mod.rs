//! Edit operations reconstructed from optimal mappings.

pub mod model;
pub mod reconstruct;

pub use model::{
    EdgeRef, EditOperation, EditSolution, IncompleteDiff, OptimalEdit, PropertyChange, VertexRef,
};
pub use reconstruct::{edit_operations, reconstruct};

//! Schema graphs: arena-stored directed labelled graphs built from schemas.

pub mod builder;
mod digest;
pub mod model;

pub use builder::build_graph;
pub use model::{
    is_containment_label, Edge, GraphSide, SchemaGraph, Vertex, VertexId, VertexTag,
    LABEL_ARGUMENT, LABEL_DIRECTIVE, LABEL_FIELD, LABEL_IMPLEMENTS, LABEL_INPUT_FIELD,
    LABEL_MEMBER, LABEL_TYPE_PREFIX, LABEL_VALUE, PROP_ARGUMENTS, PROP_DEFAULT,
    PROP_DESCRIPTION, PROP_LOCATIONS, PROP_NAME, PROP_REPEATABLE,
};

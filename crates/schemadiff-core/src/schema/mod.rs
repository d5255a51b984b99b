//! Schema input boundary.
//!
//! The diff core consumes schemas through [`SchemaView`], a read-only
//! structural view able to enumerate types, fields, arguments, enum values,
//! directive definitions and directive applications in a deterministic order.
//! [`Schema`] is the in-crate implementation; it is serde-friendly so schemas
//! can be kept as JSON fixtures.

pub mod model;
pub mod type_ref;
pub mod validation;

pub use model::{
    DirectiveApplication, DirectiveDef, EnumValueDef, FieldDef, InputValueDef, Schema, SchemaView,
    TypeDef, TypeKind,
};
pub use type_ref::TypeRef;
pub use validation::{is_builtin_scalar, validate_schema, BUILTIN_SCALARS};

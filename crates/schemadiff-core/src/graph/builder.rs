//! Schema → graph conversion.
//!
//! Every independently changeable element becomes a vertex:
//!
//! | Element               | Key                 | Tag                |
//! |-----------------------|---------------------|--------------------|
//! | named type            | `Foo`               | per `TypeKind`     |
//! | field                 | `Foo.bar`           | `Field`            |
//! | argument              | `Foo.bar(id)`       | `Argument`         |
//! | input field           | `Filter.limit`      | `InputField`       |
//! | enum value            | `Color.RED`         | `EnumValue`        |
//! | directive definition  | `@auth`             | `Directive`        |
//! | directive argument    | `@auth(role)`       | `Argument`         |
//! | applied directive     | `Foo.bar@auth[0]`   | `AppliedDirective` |
//!
//! Type references become `type:<shape>` edges from the referencing element
//! to the named type. The shape is the wrapper structure with the name elided
//! (`[_!]!`), so nullability and list wrapping live on the edge while the
//! referenced type is the edge's endpoint.

use crate::errors::{Result, SchemaDiffError};
use crate::graph::model::{
    GraphAssembler, GraphSide, SchemaGraph, VertexTag, LABEL_ARGUMENT, LABEL_DIRECTIVE,
    LABEL_FIELD, LABEL_IMPLEMENTS, LABEL_INPUT_FIELD, LABEL_MEMBER, LABEL_TYPE_PREFIX,
    LABEL_VALUE, PROP_ARGUMENTS, PROP_DEFAULT, PROP_DESCRIPTION, PROP_LOCATIONS, PROP_NAME,
    PROP_REPEATABLE,
};
use crate::schema::{
    is_builtin_scalar, validate_schema, DirectiveApplication, InputValueDef, SchemaView,
    TypeDef, TypeKind, TypeRef,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Build the graph of one schema snapshot
///
/// Types are emitted in name order, then directive definitions in name order,
/// then members in declaration order. Built-in scalars get a vertex the first
/// time they are referenced.
///
/// # Errors
///
/// Any precondition failure from [`validate_schema`].
pub fn build_graph<S: SchemaView + ?Sized>(schema: &S, side: GraphSide) -> Result<SchemaGraph> {
    validate_schema(schema)?;

    let mut types: Vec<&TypeDef> = schema.type_definitions().iter().collect();
    types.sort_by(|a, b| a.name.cmp(&b.name));
    let mut directives: Vec<_> = schema.directive_definitions().iter().collect();
    directives.sort_by(|a, b| a.name.cmp(&b.name));

    let mut builder = Builder {
        asm: GraphAssembler::new(side),
    };

    for type_def in &types {
        builder.asm.add_vertex(
            type_def.name.clone(),
            tag_for(type_def.kind),
            named_props(&type_def.name, type_def.description.as_deref()),
        )?;
    }
    for directive in &directives {
        let mut props = named_props(&directive.name, directive.description.as_deref());
        props.insert(PROP_LOCATIONS.to_string(), directive.locations.join(", "));
        props.insert(PROP_REPEATABLE.to_string(), directive.repeatable.to_string());
        builder
            .asm
            .add_vertex(format!("@{}", directive.name), VertexTag::Directive, props)?;
    }

    for type_def in &types {
        builder.add_members(type_def)?;
    }
    for directive in &directives {
        let key = format!("@{}", directive.name);
        let owner = builder.index_of(&key)?;
        builder.add_input_values(owner, &key, &directive.arguments, VertexTag::Argument)?;
    }

    let graph = builder.asm.finish();
    debug!(
        side = ?side,
        vertices = graph.len(),
        edges = graph.edge_count(),
        "schema graph built"
    );
    Ok(graph)
}

struct Builder {
    asm: GraphAssembler,
}

impl Builder {
    fn index_of(&self, key: &str) -> Result<u32> {
        self.asm.lookup(key).ok_or_else(|| SchemaDiffError::Internal {
            message: format!("vertex '{}' missing after type emission", key),
        })
    }

    /// Vertex of a named type, creating built-in scalars on first use
    fn type_vertex(&mut self, name: &str) -> Result<u32> {
        if let Some(index) = self.asm.lookup(name) {
            return Ok(index);
        }
        if is_builtin_scalar(name) {
            return self
                .asm
                .add_vertex(name.to_string(), VertexTag::Scalar, named_props(name, None));
        }
        self.index_of(name)
    }

    fn add_type_edge(&mut self, from: u32, raw: &str) -> Result<()> {
        let type_ref = TypeRef::parse(raw)?;
        let to = self.type_vertex(type_ref.named_type())?;
        self.asm
            .add_edge(from, to, format!("{}{}", LABEL_TYPE_PREFIX, type_ref.shape()))
    }

    fn add_members(&mut self, type_def: &TypeDef) -> Result<()> {
        let owner_key = type_def.name.as_str();
        let owner = self.index_of(owner_key)?;

        match type_def.kind {
            TypeKind::Object | TypeKind::Interface => {
                for field in &type_def.fields {
                    let key = format!("{}.{}", owner_key, field.name);
                    let index = self.asm.add_vertex(
                        key.clone(),
                        VertexTag::Field,
                        named_props(&field.name, field.description.as_deref()),
                    )?;
                    self.asm.add_edge(owner, index, LABEL_FIELD)?;
                    self.add_type_edge(index, &field.type_ref)?;
                    self.add_input_values(index, &key, &field.arguments, VertexTag::Argument)?;
                    self.add_applications(index, &key, &field.directives)?;
                }
                for interface in &type_def.interfaces {
                    let to = self.index_of(interface)?;
                    self.asm.add_edge(owner, to, LABEL_IMPLEMENTS)?;
                }
            }
            TypeKind::Union => {
                for member in &type_def.members {
                    let to = self.index_of(member)?;
                    self.asm.add_edge(owner, to, LABEL_MEMBER)?;
                }
            }
            TypeKind::Enum => {
                for value in &type_def.enum_values {
                    let key = format!("{}.{}", owner_key, value.name);
                    let index = self.asm.add_vertex(
                        key.clone(),
                        VertexTag::EnumValue,
                        named_props(&value.name, value.description.as_deref()),
                    )?;
                    self.asm.add_edge(owner, index, LABEL_VALUE)?;
                    self.add_applications(index, &key, &value.directives)?;
                }
            }
            TypeKind::InputObject => {
                self.add_input_values(
                    owner,
                    owner_key,
                    &type_def.input_fields,
                    VertexTag::InputField,
                )?;
            }
            TypeKind::Scalar => {}
        }

        self.add_applications(owner, owner_key, &type_def.directives)
    }

    /// Arguments (`owner(name)`) or input fields (`owner.name`)
    fn add_input_values(
        &mut self,
        owner: u32,
        owner_key: &str,
        values: &[InputValueDef],
        tag: VertexTag,
    ) -> Result<()> {
        for value in values {
            let (key, label) = match tag {
                VertexTag::InputField => {
                    (format!("{}.{}", owner_key, value.name), LABEL_INPUT_FIELD)
                }
                _ => (format!("{}({})", owner_key, value.name), LABEL_ARGUMENT),
            };
            let mut props = named_props(&value.name, value.description.as_deref());
            if let Some(default) = &value.default_value {
                props.insert(PROP_DEFAULT.to_string(), default.clone());
            }
            let index = self.asm.add_vertex(key.clone(), tag, props)?;
            self.asm.add_edge(owner, index, label)?;
            self.add_type_edge(index, &value.type_ref)?;
            self.add_applications(index, &key, &value.directives)?;
        }
        Ok(())
    }

    fn add_applications(
        &mut self,
        owner: u32,
        owner_key: &str,
        applications: &[DirectiveApplication],
    ) -> Result<()> {
        for (position, application) in applications.iter().enumerate() {
            let mut props = named_props(&application.name, None);
            if !application.arguments.is_empty() {
                props.insert(PROP_ARGUMENTS.to_string(), application.canonical_arguments());
            }
            let index = self.asm.add_vertex(
                format!("{}@{}[{}]", owner_key, application.name, position),
                VertexTag::AppliedDirective,
                props,
            )?;
            self.asm.add_edge(owner, index, LABEL_DIRECTIVE)?;
        }
        Ok(())
    }
}

fn tag_for(kind: TypeKind) -> VertexTag {
    match kind {
        TypeKind::Object => VertexTag::Object,
        TypeKind::Interface => VertexTag::Interface,
        TypeKind::Union => VertexTag::Union,
        TypeKind::Enum => VertexTag::Enum,
        TypeKind::InputObject => VertexTag::InputObject,
        TypeKind::Scalar => VertexTag::Scalar,
    }
}

fn named_props(name: &str, description: Option<&str>) -> BTreeMap<String, String> {
    let mut props = BTreeMap::new();
    props.insert(PROP_NAME.to_string(), name.to_string());
    if let Some(description) = description {
        props.insert(PROP_DESCRIPTION.to_string(), description.to_string());
    }
    props
}

//! Structural schema model.
//!
//! Only what can change independently is modelled: types, fields, arguments,
//! input fields, enum values, interface/union membership, directive
//! definitions and directive applications. Type references are kept in SDL
//! notation (`"[String!]!"`) and parsed during validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only structural view over a typed schema
///
/// Implementations must enumerate definitions in a stable order: building a
/// graph twice from the same view has to produce the same content.
pub trait SchemaView {
    /// Type definitions in declaration order
    fn type_definitions(&self) -> &[TypeDef];

    /// Directive definitions in declaration order
    fn directive_definitions(&self) -> &[DirectiveDef];

    fn find_type(&self, name: &str) -> Option<&TypeDef> {
        self.type_definitions().iter().find(|t| t.name == name)
    }
}

/// Kind of a named type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    Scalar,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::Enum => "enum",
            TypeKind::InputObject => "input object",
            TypeKind::Scalar => "scalar",
        }
    }

    /// Kinds that declare output fields
    pub fn has_fields(&self) -> bool {
        matches!(self, TypeKind::Object | TypeKind::Interface)
    }
}

/// A schema snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub directives: Vec<DirectiveDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_def: TypeDef) -> Self {
        self.types.push(type_def);
        self
    }

    pub fn with_directive(mut self, directive: DirectiveDef) -> Self {
        self.directives.push(directive);
        self
    }
}

impl SchemaView for Schema {
    fn type_definitions(&self) -> &[TypeDef] {
        &self.types
    }

    fn directive_definitions(&self) -> &[DirectiveDef] {
        &self.directives
    }
}

/// A named type definition
///
/// Member lists that do not apply to `kind` (e.g. `fields` on an enum) are
/// ignored by the graph builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_fields: Vec<InputValueDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValueDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveApplication>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            fields: Vec::new(),
            input_fields: Vec::new(),
            enum_values: Vec::new(),
            interfaces: Vec::new(),
            members: Vec::new(),
            directives: Vec::new(),
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Object)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn union(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Union)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Enum)
    }

    pub fn input_object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::InputObject)
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Scalar)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_input_field(mut self, input_field: InputValueDef) -> Self {
        self.input_fields.push(input_field);
        self
    }

    pub fn with_value(mut self, value: EnumValueDef) -> Self {
        self.enum_values.push(value);
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn with_directive(mut self, directive: DirectiveApplication) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// An output field of an object or interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<InputValueDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveApplication>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            description: None,
            arguments: Vec::new(),
            directives: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_argument(mut self, argument: InputValueDef) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_directive(mut self, directive: DirectiveApplication) -> Self {
        self.directives.push(directive);
        self
    }
}

/// An argument or input-object field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValueDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveApplication>,
}

impl InputValueDef {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            description: None,
            default_value: None,
            directives: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_directive(mut self, directive: DirectiveApplication) -> Self {
        self.directives.push(directive);
        self
    }
}

/// A value of an enum type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveApplication>,
}

impl EnumValueDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            directives: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_directive(mut self, directive: DirectiveApplication) -> Self {
        self.directives.push(directive);
        self
    }
}

/// A directive applied to a schema element, e.g. `@deprecated(reason: "old")`
///
/// Argument values are kept as literal source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveApplication {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub arguments: BTreeMap<String, String>,
}

impl DirectiveApplication {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Canonical `name: value` rendering, sorted by argument name
    pub fn canonical_arguments(&self) -> String {
        self.arguments
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A directive definition, e.g. `directive @auth(role: String) on FIELD_DEFINITION`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<InputValueDef>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub repeatable: bool,
}

impl DirectiveDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            locations: Vec::new(),
            repeatable: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_argument(mut self, argument: InputValueDef) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }

    pub fn repeatable(mut self, repeatable: bool) -> Self {
        self.repeatable = repeatable;
        self
    }
}

use crate::schema::TypeKind;
use serde::{Deserialize, Serialize};

/// Structural category of a schema change
///
/// Names what changed, never whether it breaks clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaChangeKind {
    TypeAdded,
    TypeRemoved,
    TypeRenamed,
    TypeChanged,
    FieldAdded,
    FieldRemoved,
    FieldRenamed,
    FieldChanged,
    FieldTypeChanged,
    ArgumentAdded,
    ArgumentRemoved,
    ArgumentRenamed,
    ArgumentChanged,
    ArgumentTypeChanged,
    InputFieldAdded,
    InputFieldRemoved,
    InputFieldRenamed,
    InputFieldChanged,
    InputFieldTypeChanged,
    EnumValueAdded,
    EnumValueRemoved,
    EnumValueRenamed,
    EnumValueChanged,
    DirectiveDefinitionAdded,
    DirectiveDefinitionRemoved,
    DirectiveDefinitionRenamed,
    DirectiveDefinitionChanged,
    DirectiveApplied,
    DirectiveRemoved,
    DirectiveApplicationChanged,
    InterfaceAdded,
    InterfaceRemoved,
    UnionMemberAdded,
    UnionMemberRemoved,
    /// An element moved to a different owner
    MemberMoved,
}

/// One semantic-level change resolved back to schema paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaChange {
    pub kind: SchemaChangeKind,
    /// Path in the old schema, absent for additions
    pub old_path: Option<String>,
    /// Path in the new schema, absent for removals
    pub new_path: Option<String>,
    pub description: String,
    /// Kind of the named type the path is rooted at, if it is defined
    pub entity_kind: Option<TypeKind>,
}

impl SchemaChange {
    /// The new path if present, else the old one
    pub fn path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or_default()
    }
}

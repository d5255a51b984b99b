//! Default analyzer: names the structural change behind each edit.
//!
//! Edge edits implied by a vertex insertion or deletion are folded into the
//! vertex change: containment edges touching it, and the references it makes
//! (the type edge of a removed field, say). A reference to an inserted or
//! deleted type is still reported on the referencing element; when a type
//! edge is deleted and another inserted on the same element, the pair is one
//! type change.

use crate::analysis::model::{SchemaChange, SchemaChangeKind};
use crate::analysis::SchemaChangeAnalyzer;
use crate::edits::{EdgeRef, EditOperation, PropertyChange, VertexRef};
use crate::graph::{
    is_containment_label, VertexTag, LABEL_IMPLEMENTS, LABEL_MEMBER, LABEL_TYPE_PREFIX, PROP_NAME,
};
use crate::schema::{SchemaView, TypeKind};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralChangeAnalyzer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Type,
    Field,
    Argument,
    InputField,
    EnumValue,
    DirectiveDefinition,
    DirectiveApplication,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delta {
    Added,
    Removed,
    Renamed,
    Changed,
}

impl Element {
    fn of(tag: VertexTag) -> Option<Self> {
        match tag {
            VertexTag::Object
            | VertexTag::Interface
            | VertexTag::Union
            | VertexTag::Enum
            | VertexTag::InputObject
            | VertexTag::Scalar => Some(Element::Type),
            VertexTag::Field => Some(Element::Field),
            VertexTag::Argument => Some(Element::Argument),
            VertexTag::InputField => Some(Element::InputField),
            VertexTag::EnumValue => Some(Element::EnumValue),
            VertexTag::Directive => Some(Element::DirectiveDefinition),
            VertexTag::AppliedDirective => Some(Element::DirectiveApplication),
            VertexTag::Isolated => None,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Element::Type => "type",
            Element::Field => "field",
            Element::Argument => "argument",
            Element::InputField => "input field",
            Element::EnumValue => "enum value",
            Element::DirectiveDefinition => "directive",
            Element::DirectiveApplication => "directive application",
        }
    }

    fn kind(self, delta: Delta) -> SchemaChangeKind {
        use SchemaChangeKind as K;
        match (self, delta) {
            (Element::Type, Delta::Added) => K::TypeAdded,
            (Element::Type, Delta::Removed) => K::TypeRemoved,
            (Element::Type, Delta::Renamed) => K::TypeRenamed,
            (Element::Type, Delta::Changed) => K::TypeChanged,
            (Element::Field, Delta::Added) => K::FieldAdded,
            (Element::Field, Delta::Removed) => K::FieldRemoved,
            (Element::Field, Delta::Renamed) => K::FieldRenamed,
            (Element::Field, Delta::Changed) => K::FieldChanged,
            (Element::Argument, Delta::Added) => K::ArgumentAdded,
            (Element::Argument, Delta::Removed) => K::ArgumentRemoved,
            (Element::Argument, Delta::Renamed) => K::ArgumentRenamed,
            (Element::Argument, Delta::Changed) => K::ArgumentChanged,
            (Element::InputField, Delta::Added) => K::InputFieldAdded,
            (Element::InputField, Delta::Removed) => K::InputFieldRemoved,
            (Element::InputField, Delta::Renamed) => K::InputFieldRenamed,
            (Element::InputField, Delta::Changed) => K::InputFieldChanged,
            (Element::EnumValue, Delta::Added) => K::EnumValueAdded,
            (Element::EnumValue, Delta::Removed) => K::EnumValueRemoved,
            (Element::EnumValue, Delta::Renamed) => K::EnumValueRenamed,
            (Element::EnumValue, Delta::Changed) => K::EnumValueChanged,
            (Element::DirectiveDefinition, Delta::Added) => K::DirectiveDefinitionAdded,
            (Element::DirectiveDefinition, Delta::Removed) => K::DirectiveDefinitionRemoved,
            (Element::DirectiveDefinition, Delta::Renamed) => K::DirectiveDefinitionRenamed,
            (Element::DirectiveDefinition, Delta::Changed) => K::DirectiveDefinitionChanged,
            (Element::DirectiveApplication, Delta::Added) => K::DirectiveApplied,
            (Element::DirectiveApplication, Delta::Removed) => K::DirectiveRemoved,
            (Element::DirectiveApplication, _) => K::DirectiveApplicationChanged,
        }
    }

    fn type_changed_kind(self) -> SchemaChangeKind {
        match self {
            Element::Argument => SchemaChangeKind::ArgumentTypeChanged,
            Element::InputField => SchemaChangeKind::InputFieldTypeChanged,
            _ => SchemaChangeKind::FieldTypeChanged,
        }
    }
}

impl SchemaChangeAnalyzer for StructuralChangeAnalyzer {
    fn analyze_edits(
        &self,
        operations: &[EditOperation],
        old: &dyn SchemaView,
        new: &dyn SchemaView,
    ) -> Vec<SchemaChange> {
        let mut inserted: HashSet<&str> = HashSet::new();
        let mut deleted: HashSet<&str> = HashSet::new();
        let mut renamed: HashMap<&str, &str> = HashMap::new();
        for op in operations {
            match op {
                EditOperation::InsertVertex { target } => {
                    inserted.insert(&target.key);
                }
                EditOperation::DeleteVertex { source } => {
                    deleted.insert(&source.key);
                }
                EditOperation::ChangeVertex { source, target, .. } => {
                    renamed.insert(&source.key, &target.key);
                }
                _ => {}
            }
        }

        // Deleted type edge index -> inserted type edge on the same element
        let mut retargeted: HashMap<usize, &EdgeRef> = HashMap::new();
        let mut paired: HashSet<usize> = HashSet::new();
        for (i, op) in operations.iter().enumerate() {
            let EditOperation::DeleteEdge { source } = op else {
                continue;
            };
            if !is_type_edge(source) || implied(source, &deleted) {
                continue;
            }
            let owner = renamed
                .get(source.from.as_str())
                .copied()
                .unwrap_or(source.from.as_str());
            let counterpart = operations.iter().enumerate().find_map(|(j, op)| match op {
                EditOperation::InsertEdge { target }
                    if is_type_edge(target)
                        && target.from == owner
                        && !implied(target, &inserted)
                        && !paired.contains(&j) =>
                {
                    Some((j, target))
                }
                _ => None,
            });
            if let Some((j, target)) = counterpart {
                paired.insert(j);
                retargeted.insert(i, target);
            }
        }

        let mut changes = Vec::new();
        for (i, op) in operations.iter().enumerate() {
            let change = match op {
                EditOperation::InsertVertex { target } => {
                    vertex_change(Delta::Added, None, Some(target), &[], old, new)
                }
                EditOperation::DeleteVertex { source } => {
                    vertex_change(Delta::Removed, Some(source), None, &[], old, new)
                }
                EditOperation::ChangeVertex {
                    source,
                    target,
                    changed_properties,
                } => {
                    let delta = if changed_properties.iter().any(|p| p.name == PROP_NAME) {
                        Delta::Renamed
                    } else {
                        Delta::Changed
                    };
                    vertex_change(delta, Some(source), Some(target), changed_properties, old, new)
                }
                EditOperation::InsertEdge { target } => {
                    if implied(target, &inserted) || paired.contains(&i) {
                        None
                    } else {
                        edge_change(None, Some(target), old, new)
                    }
                }
                EditOperation::DeleteEdge { source } => {
                    if implied(source, &deleted) {
                        None
                    } else {
                        edge_change(Some(source), retargeted.get(&i).copied(), old, new)
                    }
                }
                EditOperation::ChangeEdge { source, target } => {
                    edge_change(Some(source), Some(target), old, new)
                }
            };
            if let Some(change) = change {
                if !changes.contains(&change) {
                    changes.push(change);
                }
            }
        }
        changes
    }
}

/// Containment edges go with either endpoint, references with their owner
fn implied(edge: &EdgeRef, touched: &HashSet<&str>) -> bool {
    touched.contains(edge.from.as_str())
        || (is_containment_label(&edge.label) && touched.contains(edge.to.as_str()))
}

fn is_type_edge(edge: &EdgeRef) -> bool {
    edge.label.starts_with(LABEL_TYPE_PREFIX)
}

fn vertex_change(
    delta: Delta,
    source: Option<&VertexRef>,
    target: Option<&VertexRef>,
    properties: &[PropertyChange],
    old: &dyn SchemaView,
    new: &dyn SchemaView,
) -> Option<SchemaChange> {
    let tag = target.or(source)?.tag;
    let element = Element::of(tag)?;
    let old_path = source.map(|v| v.key.clone());
    let new_path = target.map(|v| v.key.clone());
    let noun = element.noun();

    let description = match (delta, &old_path, &new_path) {
        (Delta::Added, _, Some(path)) => format!("{} '{}' added", noun, path),
        (Delta::Removed, Some(path), _) => format!("{} '{}' removed", noun, path),
        (Delta::Renamed, Some(from), Some(to)) => {
            format!("{} '{}' renamed to '{}'", noun, from, to)
        }
        (_, _, path) => {
            let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
            format!(
                "{} '{}' changed ({})",
                noun,
                path.as_deref().unwrap_or_default(),
                names.join(", ")
            )
        }
    };

    Some(SchemaChange {
        kind: element.kind(delta),
        entity_kind: resolve_entity(new_path.as_deref(), new)
            .or_else(|| resolve_entity(old_path.as_deref(), old)),
        old_path,
        new_path,
        description,
    })
}

fn edge_change(
    source: Option<&EdgeRef>,
    target: Option<&EdgeRef>,
    old: &dyn SchemaView,
    new: &dyn SchemaView,
) -> Option<SchemaChange> {
    let edge = target.or(source)?;
    let added = source.is_none();
    let old_from = source.map(|e| e.from.clone());
    let new_from = target.map(|e| e.from.clone());

    let (kind, old_path, new_path, description) = if edge.label == LABEL_IMPLEMENTS {
        let description = if added {
            format!("'{}' now implements '{}'", edge.from, edge.to)
        } else {
            format!("'{}' no longer implements '{}'", edge.from, edge.to)
        };
        let kind = if added {
            SchemaChangeKind::InterfaceAdded
        } else {
            SchemaChangeKind::InterfaceRemoved
        };
        (kind, old_from, new_from, description)
    } else if edge.label == LABEL_MEMBER {
        let description = if added {
            format!("'{}' added to union '{}'", edge.to, edge.from)
        } else {
            format!("'{}' removed from union '{}'", edge.to, edge.from)
        };
        let kind = if added {
            SchemaChangeKind::UnionMemberAdded
        } else {
            SchemaChangeKind::UnionMemberRemoved
        };
        (kind, old_from, new_from, description)
    } else if let Some(shape) = edge.label.strip_prefix(LABEL_TYPE_PREFIX) {
        let element = referencing_element(&edge.from, old, new);
        let description = match (source, target) {
            (Some(s), Some(t)) => format!(
                "type of '{}' changed from '{}' to '{}'",
                t.from,
                render_shape(s),
                render_shape(t)
            ),
            (None, Some(t)) => format!("type of '{}' now references '{}' ({})", t.from, t.to, shape),
            _ => format!("type of '{}' no longer references '{}'", edge.from, edge.to),
        };
        (element.type_changed_kind(), old_from, new_from, description)
    } else if is_containment_label(&edge.label) {
        let description = if added {
            format!("'{}' attached to '{}'", edge.to, edge.from)
        } else {
            format!("'{}' detached from '{}'", edge.to, edge.from)
        };
        (
            SchemaChangeKind::MemberMoved,
            source.map(|e| e.to.clone()),
            target.map(|e| e.to.clone()),
            description,
        )
    } else {
        return None;
    };

    Some(SchemaChange {
        kind,
        entity_kind: resolve_entity(new_path.as_deref(), new)
            .or_else(|| resolve_entity(old_path.as_deref(), old)),
        old_path,
        new_path,
        description,
    })
}

/// Type reference as written, rebuilt from the edge's shape and endpoint
fn render_shape(edge: &EdgeRef) -> String {
    edge.label
        .strip_prefix(LABEL_TYPE_PREFIX)
        .unwrap_or(&edge.label)
        .replacen('_', &edge.to, 1)
}

/// Element owning a type reference, from its key and owner kind
fn referencing_element(key: &str, old: &dyn SchemaView, new: &dyn SchemaView) -> Element {
    if key.ends_with(')') {
        return Element::Argument;
    }
    let owner_kind = root_type(key).and_then(|root| {
        new.find_type(root)
            .or_else(|| old.find_type(root))
            .map(|t| t.kind)
    });
    match owner_kind {
        Some(TypeKind::InputObject) => Element::InputField,
        _ => Element::Field,
    }
}

/// Named type a vertex key is rooted at; `None` for directive definitions
pub(crate) fn root_type(key: &str) -> Option<&str> {
    if key.starts_with('@') {
        return None;
    }
    let end = key.find(['.', '(', '@']).unwrap_or(key.len());
    Some(&key[..end])
}

fn resolve_entity(path: Option<&str>, schema: &dyn SchemaView) -> Option<TypeKind> {
    let root = root_type(path?)?;
    schema.find_type(root).map(|t| t.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_type() {
        assert_eq!(root_type("Foo"), Some("Foo"));
        assert_eq!(root_type("Foo.bar(id)"), Some("Foo"));
        assert_eq!(root_type("Foo@key[0]"), Some("Foo"));
        assert_eq!(root_type("@auth(role)"), None);
    }

    #[test]
    fn test_render_shape() {
        let edge = EdgeRef {
            from: "Foo.bar".to_string(),
            to: "String".to_string(),
            label: "type:[_!]!".to_string(),
        };
        assert_eq!(render_shape(&edge), "[String!]!");
    }
}

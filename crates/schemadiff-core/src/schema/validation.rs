//! Precondition checks run before any graph is built.

use crate::errors::{Result, SchemaDiffError};
use crate::schema::model::{
    DirectiveApplication, InputValueDef, SchemaView, TypeDef, TypeKind,
};
use crate::schema::type_ref::{is_valid_name, TypeRef};
use std::collections::{HashMap, HashSet};

/// Scalars that may be referenced without a definition
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// Validate a schema view
///
/// # Errors
///
/// Returns the first precondition failure found, scanning types in
/// declaration order and then directive definitions.
pub fn validate_schema<S: SchemaView + ?Sized>(schema: &S) -> Result<()> {
    let mut kinds: HashMap<&str, TypeKind> = HashMap::new();
    for type_def in schema.type_definitions() {
        require_name(&type_def.name, "type definition")?;
        if kinds.insert(type_def.name.as_str(), type_def.kind).is_some() {
            return Err(SchemaDiffError::DuplicateType {
                name: type_def.name.clone(),
            });
        }
    }

    let mut directive_names = HashSet::new();
    for directive in schema.directive_definitions() {
        require_name(&directive.name, "directive definition")?;
        if !directive_names.insert(directive.name.as_str()) {
            return Err(SchemaDiffError::DuplicateDirective {
                name: directive.name.clone(),
            });
        }
    }

    for type_def in schema.type_definitions() {
        validate_type(type_def, &kinds)?;
    }

    for directive in schema.directive_definitions() {
        let owner = format!("@{}", directive.name);
        validate_input_values(&owner, "argument", &directive.arguments, &kinds)?;
    }

    Ok(())
}

fn validate_type(type_def: &TypeDef, kinds: &HashMap<&str, TypeKind>) -> Result<()> {
    let owner = type_def.name.as_str();
    validate_applications(owner, &type_def.directives)?;

    match type_def.kind {
        TypeKind::Object | TypeKind::Interface => {
            let mut seen = HashSet::new();
            for field in &type_def.fields {
                let path = format!("{}.{}", owner, field.name);
                require_name(&field.name, &path)?;
                if !seen.insert(field.name.as_str()) {
                    return Err(duplicate_member(owner, "field", &field.name));
                }
                check_type_ref(&path, &field.type_ref, kinds)?;
                validate_input_values(&path, "argument", &field.arguments, kinds)?;
                validate_applications(&path, &field.directives)?;
            }
            for interface in &type_def.interfaces {
                match kinds.get(interface.as_str()) {
                    Some(TypeKind::Interface) => {}
                    Some(_) => {
                        return Err(SchemaDiffError::InvalidInterface {
                            type_name: owner.to_string(),
                            interface: interface.clone(),
                        })
                    }
                    None => return Err(unknown(owner, interface)),
                }
            }
            check_unique(owner, "interface", type_def.interfaces.iter())?;
        }
        TypeKind::Union => {
            for member in &type_def.members {
                match kinds.get(member.as_str()) {
                    Some(TypeKind::Object) => {}
                    Some(_) => {
                        return Err(SchemaDiffError::InvalidUnionMember {
                            union_name: owner.to_string(),
                            member: member.clone(),
                        })
                    }
                    None => return Err(unknown(owner, member)),
                }
            }
            check_unique(owner, "member", type_def.members.iter())?;
        }
        TypeKind::Enum => {
            let mut seen = HashSet::new();
            for value in &type_def.enum_values {
                let path = format!("{}.{}", owner, value.name);
                require_name(&value.name, &path)?;
                if !seen.insert(value.name.as_str()) {
                    return Err(duplicate_member(owner, "enum value", &value.name));
                }
                validate_applications(&path, &value.directives)?;
            }
        }
        TypeKind::InputObject => {
            validate_input_values(owner, "input field", &type_def.input_fields, kinds)?;
        }
        TypeKind::Scalar => {}
    }
    Ok(())
}

fn validate_input_values(
    owner: &str,
    member_kind: &str,
    values: &[InputValueDef],
    kinds: &HashMap<&str, TypeKind>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for value in values {
        let path = format!("{}({})", owner, value.name);
        require_name(&value.name, &path)?;
        if !seen.insert(value.name.as_str()) {
            return Err(duplicate_member(owner, member_kind, &value.name));
        }
        check_type_ref(&path, &value.type_ref, kinds)?;
        validate_applications(&path, &value.directives)?;
    }
    Ok(())
}

// Applied directives need not be defined in the schema (built-ins such as
// @deprecated are usually implicit); only their names are checked.
fn validate_applications(owner: &str, applications: &[DirectiveApplication]) -> Result<()> {
    for application in applications {
        require_name(&application.name, &format!("directive applied to {}", owner))?;
    }
    Ok(())
}

fn check_type_ref(
    referenced_by: &str,
    raw: &str,
    kinds: &HashMap<&str, TypeKind>,
) -> Result<()> {
    let parsed = TypeRef::parse(raw)?;
    let name = parsed.named_type();
    if kinds.contains_key(name) || is_builtin_scalar(name) {
        Ok(())
    } else {
        Err(unknown(referenced_by, name))
    }
}

fn check_unique<'a>(
    owner: &str,
    member_kind: &str,
    names: impl Iterator<Item = &'a String>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(duplicate_member(owner, member_kind, name));
        }
    }
    Ok(())
}

// Vertex keys are built from names with `.`, `(`, `@` and `[` as
// separators, so a name must not contain any of them.
fn require_name(name: &str, context: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SchemaDiffError::EmptyName {
            context: context.to_string(),
        });
    }
    if !is_valid_name(name) {
        return Err(SchemaDiffError::InvalidName {
            context: context.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

fn duplicate_member(owner: &str, member_kind: &str, name: &str) -> SchemaDiffError {
    SchemaDiffError::DuplicateMember {
        owner: owner.to_string(),
        member_kind: member_kind.to_string(),
        name: name.to_string(),
    }
}

fn unknown(referenced_by: &str, name: &str) -> SchemaDiffError {
    SchemaDiffError::UnknownTypeReference {
        referenced_by: referenced_by.to_string(),
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::model::{FieldDef, Schema};

    #[test]
    fn test_builtin_scalars_need_no_definition() {
        let schema = Schema::new().with_type(
            TypeDef::object("Foo")
                .with_field(FieldDef::new("id", "ID!"))
                .with_field(FieldDef::new("tags", "[String!]")),
        );
        assert!(validate_schema(&schema).is_ok());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = Schema::new().with_type(
            TypeDef::object("Foo")
                .with_field(FieldDef::new("bar", "String"))
                .with_field(FieldDef::new("bar", "Int")),
        );
        let err = validate_schema(&schema).unwrap_err();
        assert_eq!(
            err,
            SchemaDiffError::DuplicateMember {
                owner: "Foo".to_string(),
                member_kind: "field".to_string(),
                name: "bar".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_argument_name_reports_path() {
        let schema = Schema::new().with_type(
            TypeDef::object("Foo")
                .with_field(FieldDef::new("bar", "String").with_argument(InputValueDef::new("", "Int"))),
        );
        assert_eq!(
            validate_schema(&schema).unwrap_err(),
            SchemaDiffError::EmptyName {
                context: "Foo.bar()".to_string()
            }
        );
    }

    #[test]
    fn test_union_of_scalar_rejected() {
        let schema = Schema::new()
            .with_type(TypeDef::scalar("Date"))
            .with_type(TypeDef::union("Thing").with_member("Date"));
        assert!(matches!(
            validate_schema(&schema),
            Err(SchemaDiffError::InvalidUnionMember { .. })
        ));
    }

    #[test]
    fn test_name_colliding_with_member_key_rejected() {
        let schema = Schema::new()
            .with_type(TypeDef::object("Foo").with_field(FieldDef::new("bar", "Int")))
            .with_type(TypeDef::scalar("Foo.bar"));
        assert_eq!(
            validate_schema(&schema).unwrap_err(),
            SchemaDiffError::InvalidName {
                context: "type definition".to_string(),
                name: "Foo.bar".to_string(),
            }
        );
    }

    #[test]
    fn test_member_names_follow_identifier_rules() {
        for bad in ["by(id)", "@auth", "9lives", "has space"] {
            let schema = Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new(bad, "Int")));
            assert!(
                matches!(validate_schema(&schema), Err(SchemaDiffError::InvalidName { .. })),
                "expected rejection for {:?}",
                bad
            );
        }
        let ok = Schema::new().with_type(TypeDef::object("_Foo").with_field(FieldDef::new("bar_2", "Int")));
        assert!(validate_schema(&ok).is_ok());
    }
}

//! Wrapped type references (`String`, `[Int!]`, `[ID!]!`).

use crate::errors::{Result, SchemaDiffError};
use std::fmt;

/// A possibly-wrapped reference to a named type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Parse SDL wrapper notation
    ///
    /// # Errors
    ///
    /// `InvalidTypeReference` for empty input, unbalanced brackets, a doubled
    /// `!`, an invalid name, or nesting deeper than [`MAX_WRAPPER_DEPTH`].
    pub fn parse(input: &str) -> Result<Self> {
        parse_inner(input.trim()).map_err(|reason| SchemaDiffError::InvalidTypeReference {
            input: input.to_string(),
            reason,
        })
    }

    /// Innermost named type
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Wrapper structure with the named type elided, e.g. `[_!]!`
    pub fn shape(&self) -> String {
        match self {
            TypeRef::Named(_) => "_".to_string(),
            TypeRef::List(inner) => format!("[{}]", inner.shape()),
            TypeRef::NonNull(inner) => format!("{}!", inner.shape()),
        }
    }
}

/// Deepest list/non-null nesting accepted
pub const MAX_WRAPPER_DEPTH: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    List,
    NonNull,
}

// Wrappers are peeled outside-in and re-applied inside-out, so nesting never
// costs stack depth.
fn parse_inner(input: &str) -> std::result::Result<TypeRef, String> {
    let mut wrappers = Vec::new();
    let mut s = input;
    loop {
        s = s.trim();
        if s.is_empty() {
            return Err("empty type reference".to_string());
        }
        let (wrapper, rest) = if let Some(rest) = s.strip_suffix('!') {
            if wrappers.last() == Some(&Wrapper::NonNull) {
                return Err("non-null applied twice".to_string());
            }
            (Wrapper::NonNull, rest)
        } else if let Some(rest) = s.strip_prefix('[') {
            let body = rest
                .strip_suffix(']')
                .ok_or_else(|| "unterminated list type".to_string())?;
            (Wrapper::List, body)
        } else {
            break;
        };
        if wrappers.len() == MAX_WRAPPER_DEPTH {
            return Err(format!("more than {} nested wrappers", MAX_WRAPPER_DEPTH));
        }
        wrappers.push(wrapper);
        s = rest;
    }

    if !is_valid_name(s) {
        return Err(format!("invalid type name '{}'", s));
    }
    Ok(wrappers
        .into_iter()
        .rev()
        .fold(TypeRef::Named(s.to_string()), |inner, wrapper| match wrapper {
            Wrapper::List => TypeRef::List(Box::new(inner)),
            Wrapper::NonNull => TypeRef::NonNull(Box::new(inner)),
        }))
}

/// `[_A-Za-z][_0-9A-Za-z]*`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_wrappers() {
        let t = TypeRef::parse("[String!]!").unwrap();
        assert_eq!(
            t,
            TypeRef::NonNull(Box::new(TypeRef::List(Box::new(TypeRef::NonNull(
                Box::new(TypeRef::named("String"))
            )))))
        );
        assert_eq!(t.named_type(), "String");
        assert!(t.is_non_null());
        assert_eq!(t.to_string(), "[String!]!");
        assert_eq!(t.shape(), "[_!]!");
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let t = TypeRef::parse("  [ Int ] ").unwrap();
        assert_eq!(t.to_string(), "[Int]");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "[String", "String!!", "1Foo", "Foo-Bar", "[]"] {
            let err = TypeRef::parse(bad).unwrap_err();
            assert!(
                matches!(err, SchemaDiffError::InvalidTypeReference { .. }),
                "expected rejection for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_nesting_depth_is_capped() {
        let at_limit = format!("{}Int{}", "[".repeat(MAX_WRAPPER_DEPTH), "]".repeat(MAX_WRAPPER_DEPTH));
        assert_eq!(TypeRef::parse(&at_limit).unwrap().named_type(), "Int");

        let deep = format!("{}Int{}", "[".repeat(100_000), "]".repeat(100_000));
        let err = TypeRef::parse(&deep).unwrap_err();
        assert!(matches!(err, SchemaDiffError::InvalidTypeReference { reason, .. } if reason.contains("nested")));
    }
}

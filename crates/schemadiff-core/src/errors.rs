use schemadiff_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using SchemaDiffError
pub type Result<T> = std::result::Result<T, SchemaDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Two families of kinds exist. Precondition kinds describe malformed input
/// rejected before a graph is built; the caller can fix the schema and retry.
/// Internal kinds describe a broken invariant inside graph construction,
/// preprocessing or search. Those abort the diff instead of returning a result
/// that might be wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Preconditions
    InvalidInput,
    DuplicateDefinition,
    UnknownReference,
    InvalidConfig,

    // Internal consistency
    InvariantViolation,
    CostMismatch,

    // Integration
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::DuplicateDefinition => "ERR_DUPLICATE_DEFINITION",
            ExErrorKind::UnknownReference => "ERR_UNKNOWN_REFERENCE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::CostMismatch => "ERR_COST_MISMATCH",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds that signal a defect in this crate rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvariantViolation
                | ExErrorKind::CostMismatch
                | ExErrorKind::Internal
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus whatever context
/// the failing operation could attach (vertex key, correlation ids).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (a schema path or vertex key)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Prefix the existing message, e.g. with the side of the diff it concerns
    pub fn with_message_prefix(mut self, prefix: &str) -> Self {
        self.message = if self.message.is_empty() {
            prefix.to_string()
        } else {
            format!("{}: {}", prefix, self.message)
        };
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Concrete failures raised while validating, building and diffing schemas
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaDiffError {
    // ===== Precondition Errors =====
    /// A type, field, argument or value has an empty name
    #[error("Empty name in {context}")]
    EmptyName { context: String },

    /// A name is not an identifier (`[_A-Za-z][_0-9A-Za-z]*`)
    #[error("Invalid name '{name}' in {context}")]
    InvalidName { context: String, name: String },

    /// Two type definitions share a name
    #[error("Duplicate type definition: {name}")]
    DuplicateType { name: String },

    /// Two directive definitions share a name
    #[error("Duplicate directive definition: @{name}")]
    DuplicateDirective { name: String },

    /// Two members of one owner share a name
    #[error("Duplicate {member_kind} '{name}' in {owner}")]
    DuplicateMember {
        owner: String,
        member_kind: String,
        name: String,
    },

    /// A type reference names a type that is neither defined nor built in
    #[error("{referenced_by} references unknown type '{name}'")]
    UnknownTypeReference { referenced_by: String, name: String },

    /// Type reference syntax could not be parsed
    #[error("Invalid type reference '{input}': {reason}")]
    InvalidTypeReference { input: String, reason: String },

    /// A union lists a member that is not an object type
    #[error("Union {union_name} lists '{member}', which is not an object type")]
    InvalidUnionMember { union_name: String, member: String },

    /// A type implements something that is not an interface
    #[error("{type_name} implements '{interface}', which is not an interface")]
    InvalidInterface {
        type_name: String,
        interface: String,
    },

    /// Diff configuration rejected
    #[error("Invalid diff configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Internal Consistency Errors =====
    /// Two edges connect the same ordered vertex pair
    #[error("Duplicate edge {from} -> {to}")]
    DuplicateEdge { from: String, to: String },

    /// Graphs entered search without being padded to equal size
    #[error("Graph size mismatch: source has {source_size} vertices, target has {target_size}")]
    GraphSizeMismatch {
        source_size: usize,
        target_size: usize,
    },

    /// A fixed mapping grew beyond the graph size
    #[error("Mapping of size {size} exceeds graph size {capacity}")]
    MappingOverflow { size: usize, capacity: usize },

    /// Mapping would send two source vertices to one target, or one source twice
    #[error("Non-injective mapping: source {source_index} -> target {target_index}")]
    NonInjectiveMapping {
        source_index: u32,
        target_index: u32,
    },

    /// Mapping index beyond the graph's arena
    #[error("Mapping index {index} out of range for graph of size {size}")]
    MappingOutOfRange { index: u32, size: usize },

    /// Preprocessing left a source vertex with no admissible target
    #[error("No possible mapping left for vertex {vertex}")]
    NoPossibleMapping { vertex: String },

    /// A cost or edit list was requested for a partial mapping
    #[error("Mapping is not total: {mapped} of {expected} vertices mapped")]
    IncompleteMapping { mapped: usize, expected: usize },

    /// Incremental search cost disagrees with the exact cost model
    #[error("Cost mismatch: search accumulated {accumulated}, cost model computed {exact}")]
    CostMismatch { accumulated: u64, exact: u64 },

    /// Catch-all for defects that should be unreachable
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from SchemaDiffError to the canonical ExError
impl From<SchemaDiffError> for ExError {
    fn from(err: SchemaDiffError) -> Self {
        let message = err.to_string();
        match err {
            SchemaDiffError::EmptyName { context } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(context)
                .with_message(message),

            SchemaDiffError::InvalidName { name, .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(name)
                .with_message(message),

            SchemaDiffError::InvalidTypeReference { input, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(input)
                    .with_message(message)
            }

            SchemaDiffError::InvalidUnionMember { union_name, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(union_name)
                    .with_message(message)
            }

            SchemaDiffError::InvalidInterface { type_name, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(type_name)
                    .with_message(message)
            }

            SchemaDiffError::DuplicateType { name } => {
                ExError::new(ExErrorKind::DuplicateDefinition)
                    .with_entity_id(name)
                    .with_message(message)
            }

            SchemaDiffError::DuplicateDirective { name } => {
                ExError::new(ExErrorKind::DuplicateDefinition)
                    .with_entity_id(format!("@{}", name))
                    .with_message(message)
            }

            SchemaDiffError::DuplicateMember { owner, .. } => {
                ExError::new(ExErrorKind::DuplicateDefinition)
                    .with_entity_id(owner)
                    .with_message(message)
            }

            SchemaDiffError::UnknownTypeReference { referenced_by, .. } => {
                ExError::new(ExErrorKind::UnknownReference)
                    .with_entity_id(referenced_by)
                    .with_message(message)
            }

            SchemaDiffError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            SchemaDiffError::DuplicateEdge { from, .. } => {
                ExError::new(ExErrorKind::InvariantViolation)
                    .with_op("build_graph")
                    .with_entity_id(from)
                    .with_message(message)
            }

            SchemaDiffError::GraphSizeMismatch { .. }
            | SchemaDiffError::MappingOverflow { .. }
            | SchemaDiffError::NonInjectiveMapping { .. }
            | SchemaDiffError::MappingOutOfRange { .. }
            | SchemaDiffError::IncompleteMapping { .. } => {
                ExError::new(ExErrorKind::InvariantViolation).with_message(message)
            }

            SchemaDiffError::NoPossibleMapping { vertex } => {
                ExError::new(ExErrorKind::InvariantViolation)
                    .with_op("isolate_vertices")
                    .with_entity_id(vertex)
                    .with_message(message)
            }

            SchemaDiffError::CostMismatch { .. } => ExError::new(ExErrorKind::CostMismatch)
                .with_op("search_mappings")
                .with_message(message),

            SchemaDiffError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_kinds_are_flagged() {
        assert!(ExErrorKind::InvariantViolation.is_internal());
        assert!(ExErrorKind::CostMismatch.is_internal());
        assert!(!ExErrorKind::InvalidInput.is_internal());
        assert!(!ExErrorKind::UnknownReference.is_internal());
    }

    #[test]
    fn test_display_includes_code_and_entity() {
        let err = ExError::new(ExErrorKind::UnknownReference)
            .with_op("build_graph")
            .with_entity_id("Foo.bar")
            .with_message("unknown type 'Baz'");
        let s = err.to_string();
        assert!(s.starts_with("[ERR_UNKNOWN_REFERENCE]"));
        assert!(s.contains("build_graph"));
        assert!(s.contains("Foo.bar"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;
        let inner = ExError::new(ExErrorKind::Internal).with_message("inner");
        let outer = ExError::new(ExErrorKind::InvariantViolation).with_source(inner);
        assert_eq!(outer.source_error().map(|e| e.kind()), Some(ExErrorKind::Internal));
        assert!(outer.source().is_some());
    }
}

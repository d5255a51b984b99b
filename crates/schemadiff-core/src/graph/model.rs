use crate::errors::{Result, SchemaDiffError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// Property keys
pub const PROP_NAME: &str = "name";
pub const PROP_DESCRIPTION: &str = "description";
pub const PROP_DEFAULT: &str = "default";
pub const PROP_ARGUMENTS: &str = "arguments";
pub const PROP_LOCATIONS: &str = "locations";
pub const PROP_REPEATABLE: &str = "repeatable";

// Edge labels
pub const LABEL_FIELD: &str = "field";
pub const LABEL_ARGUMENT: &str = "argument";
pub const LABEL_INPUT_FIELD: &str = "input-field";
pub const LABEL_VALUE: &str = "value";
pub const LABEL_DIRECTIVE: &str = "directive";
pub const LABEL_IMPLEMENTS: &str = "implements";
pub const LABEL_MEMBER: &str = "member";
pub const LABEL_TYPE_PREFIX: &str = "type:";

/// True for labels that attach a child element to its owner
pub fn is_containment_label(label: &str) -> bool {
    matches!(
        label,
        LABEL_FIELD | LABEL_ARGUMENT | LABEL_INPUT_FIELD | LABEL_VALUE | LABEL_DIRECTIVE
    )
}

/// Structural role of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VertexTag {
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    Scalar,
    Directive,
    Field,
    Argument,
    InputField,
    EnumValue,
    AppliedDirective,
    Isolated,
}

impl VertexTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            VertexTag::Object => "object",
            VertexTag::Interface => "interface",
            VertexTag::Union => "union",
            VertexTag::Enum => "enum",
            VertexTag::InputObject => "input-object",
            VertexTag::Scalar => "scalar",
            VertexTag::Directive => "directive",
            VertexTag::Field => "field",
            VertexTag::Argument => "argument",
            VertexTag::InputField => "input-field",
            VertexTag::EnumValue => "enum-value",
            VertexTag::AppliedDirective => "applied-directive",
            VertexTag::Isolated => "isolated",
        }
    }

    /// Named types (the roots of vertex keys)
    pub fn is_named_type(&self) -> bool {
        matches!(
            self,
            VertexTag::Object
                | VertexTag::Interface
                | VertexTag::Union
                | VertexTag::Enum
                | VertexTag::InputObject
                | VertexTag::Scalar
        )
    }
}

impl fmt::Display for VertexTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a diff a graph belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphSide {
    Source,
    Target,
}

/// Arena index namespaced by graph side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId {
    pub side: GraphSide,
    pub index: u32,
}

impl VertexId {
    pub fn new(side: GraphSide, index: u32) -> Self {
        Self { side, index }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.side {
            GraphSide::Source => "s",
            GraphSide::Target => "t",
        };
        write!(f, "{}:{}", prefix, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    /// Readable schema path, unique within the graph
    pub key: String,
    pub tag: VertexTag,
    pub properties: BTreeMap<String, String>,
}

impl Vertex {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.property(PROP_NAME)
    }

    pub fn is_isolated(&self) -> bool {
        self.tag == VertexTag::Isolated
    }

    /// Same tag and identical properties
    pub fn same_content(&self, other: &Vertex) -> bool {
        self.tag == other.tag && self.properties == other.properties
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: u32,
    pub to: u32,
    pub label: String,
}

/// Immutable directed labelled graph over arena-indexed vertices
///
/// Vertex `i` of the arena has id `VertexId { side, index: i }`. At most one
/// edge connects an ordered vertex pair.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    side: GraphSide,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    pair_index: HashMap<(u32, u32), usize>,
    key_index: HashMap<String, u32>,
}

impl SchemaGraph {
    pub fn side(&self) -> GraphSide {
        self.side
    }

    /// Vertex count, placeholders included
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Panics if `index` is out of range, like slice indexing
    pub fn vertex(&self, index: u32) -> &Vertex {
        &self.vertices[index as usize]
    }

    pub fn vertex_by_key(&self, key: &str) -> Option<&Vertex> {
        self.key_index.get(key).map(|&i| self.vertex(i))
    }

    pub fn outgoing(&self, index: u32) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing[index as usize].iter().map(|&e| &self.edges[e])
    }

    pub fn incoming(&self, index: u32) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming[index as usize].iter().map(|&e| &self.edges[e])
    }

    pub fn edge_index_between(&self, from: u32, to: u32) -> Option<usize> {
        self.pair_index.get(&(from, to)).copied()
    }

    pub fn label_between(&self, from: u32, to: u32) -> Option<&str> {
        self.edge_index_between(from, to)
            .map(|e| self.edges[e].label.as_str())
    }

    /// Number of real (non-placeholder) vertices
    pub fn real_len(&self) -> usize {
        self.vertices.iter().filter(|v| !v.is_isolated()).count()
    }

    /// Copy of this graph with `extra` isolated placeholders appended
    ///
    /// Existing indices are preserved.
    pub fn padded(&self, extra: usize) -> SchemaGraph {
        let mut graph = self.clone();
        let start = graph.vertices.len();
        for n in 0..extra {
            let index = (start + n) as u32;
            let key = format!("#isolated{}", start + n);
            graph.key_index.insert(key.clone(), index);
            graph.vertices.push(Vertex {
                id: VertexId::new(self.side, index),
                key,
                tag: VertexTag::Isolated,
                properties: BTreeMap::new(),
            });
            graph.outgoing.push(Vec::new());
            graph.incoming.push(Vec::new());
        }
        graph
    }
}

/// Incremental construction of a `SchemaGraph`
pub(crate) struct GraphAssembler {
    side: GraphSide,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    pair_index: HashMap<(u32, u32), usize>,
    key_index: HashMap<String, u32>,
}

impl GraphAssembler {
    pub(crate) fn new(side: GraphSide) -> Self {
        Self {
            side,
            vertices: Vec::new(),
            edges: Vec::new(),
            pair_index: HashMap::new(),
            key_index: HashMap::new(),
        }
    }

    pub(crate) fn lookup(&self, key: &str) -> Option<u32> {
        self.key_index.get(key).copied()
    }

    pub(crate) fn add_vertex(
        &mut self,
        key: String,
        tag: VertexTag,
        properties: BTreeMap<String, String>,
    ) -> Result<u32> {
        if self.key_index.contains_key(&key) {
            return Err(SchemaDiffError::Internal {
                message: format!("vertex key '{}' emitted twice", key),
            });
        }
        let index = self.vertices.len() as u32;
        self.key_index.insert(key.clone(), index);
        self.vertices.push(Vertex {
            id: VertexId::new(self.side, index),
            key,
            tag,
            properties,
        });
        Ok(index)
    }

    pub(crate) fn add_edge(&mut self, from: u32, to: u32, label: impl Into<String>) -> Result<()> {
        if self.pair_index.contains_key(&(from, to)) {
            return Err(SchemaDiffError::DuplicateEdge {
                from: self.vertices[from as usize].key.clone(),
                to: self.vertices[to as usize].key.clone(),
            });
        }
        self.pair_index.insert((from, to), self.edges.len());
        self.edges.push(Edge {
            from,
            to,
            label: label.into(),
        });
        Ok(())
    }

    pub(crate) fn finish(self) -> SchemaGraph {
        let n = self.vertices.len();
        let mut outgoing = vec![Vec::new(); n];
        let mut incoming = vec![Vec::new(); n];
        for (i, edge) in self.edges.iter().enumerate() {
            outgoing[edge.from as usize].push(i);
            incoming[edge.to as usize].push(i);
        }
        SchemaGraph {
            side: self.side,
            vertices: self.vertices,
            edges: self.edges,
            outgoing,
            incoming,
            pair_index: self.pair_index,
            key_index: self.key_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(name: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(PROP_NAME.to_string(), name.to_string())])
    }

    fn small_graph() -> SchemaGraph {
        let mut asm = GraphAssembler::new(GraphSide::Source);
        let foo = asm.add_vertex("Foo".into(), VertexTag::Object, props("Foo")).unwrap();
        let bar = asm.add_vertex("Foo.bar".into(), VertexTag::Field, props("bar")).unwrap();
        asm.add_edge(foo, bar, LABEL_FIELD).unwrap();
        asm.finish()
    }

    #[test]
    fn test_adjacency_indices() {
        let g = small_graph();
        assert_eq!(g.len(), 2);
        assert_eq!(g.outgoing(0).count(), 1);
        assert_eq!(g.incoming(1).count(), 1);
        assert_eq!(g.label_between(0, 1), Some(LABEL_FIELD));
        assert_eq!(g.label_between(1, 0), None);
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let mut asm = GraphAssembler::new(GraphSide::Target);
        let a = asm.add_vertex("A".into(), VertexTag::Object, props("A")).unwrap();
        let b = asm.add_vertex("B".into(), VertexTag::Interface, props("B")).unwrap();
        asm.add_edge(a, b, LABEL_IMPLEMENTS).unwrap();
        let err = asm.add_edge(a, b, "type:B").unwrap_err();
        assert!(matches!(err, SchemaDiffError::DuplicateEdge { .. }));
    }

    #[test]
    fn test_padding_preserves_indices() {
        let g = small_graph().padded(2);
        assert_eq!(g.len(), 4);
        assert_eq!(g.real_len(), 2);
        assert_eq!(g.vertex(1).key, "Foo.bar");
        assert!(g.vertex(3).is_isolated());
        assert_eq!(g.vertex(3).id.to_string(), "s:3");
        assert_eq!(g.outgoing(3).count(), 0);
    }
}

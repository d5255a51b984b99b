use crate::graph::model::SchemaGraph;
use sha2::{Digest, Sha256};

impl SchemaGraph {
    /// SHA-256 over the canonical vertex and edge content
    ///
    /// Arena indices and the graph side do not contribute, so two builds of
    /// the same schema share a digest even if emission order differs.
    pub fn content_digest(&self) -> String {
        let mut lines: Vec<String> = Vec::with_capacity(self.len() + self.edge_count());
        for vertex in self.vertices() {
            let props = vertex
                .properties
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(";");
            lines.push(format!("v|{}|{}|{}", vertex.key, vertex.tag, props));
        }
        for edge in self.edges() {
            lines.push(format!(
                "e|{}|{}|{}",
                self.vertex(edge.from).key,
                self.vertex(edge.to).key,
                edge.label
            ));
        }
        lines.sort();

        let mut hasher = Sha256::new();
        for line in &lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{build_graph, GraphSide};
    use crate::schema::{FieldDef, Schema, TypeDef};

    fn schema() -> Schema {
        Schema::new()
            .with_type(TypeDef::object("B").with_field(FieldDef::new("x", "Int")))
            .with_type(TypeDef::object("A").with_field(FieldDef::new("y", "B")))
    }

    #[test]
    fn test_digest_ignores_side() {
        let s = build_graph(&schema(), GraphSide::Source).unwrap();
        let t = build_graph(&schema(), GraphSide::Target).unwrap();
        assert_eq!(s.content_digest(), t.content_digest());
        assert_eq!(s.content_digest().len(), 64);
    }

    #[test]
    fn test_digest_ignores_declaration_order() {
        let mut reversed = schema();
        reversed.types.reverse();
        let a = build_graph(&schema(), GraphSide::Source).unwrap();
        let b = build_graph(&reversed, GraphSide::Source).unwrap();
        assert_eq!(a.content_digest(), b.content_digest());
    }

    #[test]
    fn test_digest_sees_description_change() {
        let mut changed = schema();
        changed.types[0].description = Some("doc".to_string());
        let a = build_graph(&schema(), GraphSide::Source).unwrap();
        let b = build_graph(&changed, GraphSide::Source).unwrap();
        assert_ne!(a.content_digest(), b.content_digest());
    }
}

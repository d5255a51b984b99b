use schemadiff_core::schema::{
    DirectiveApplication, DirectiveDef, EnumValueDef, FieldDef, InputValueDef, Schema, TypeDef,
};
use schemadiff_core::{diff_schemas, DiffConfig, EditOperation, SchemaDiff};

/// `type Foo { bar: String }`
#[allow(dead_code)]
pub fn foo_bar_schema() -> Schema {
    Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new("bar", "String")))
}

/// `type Foo { <name>: String }`
#[allow(dead_code)]
pub fn foo_with_field(name: &str) -> Schema {
    Schema::new().with_type(TypeDef::object("Foo").with_field(FieldDef::new(name, "String")))
}

/// Small library schema touching every element kind
///
/// ```graphql
/// directive @auth(role: String) on FIELD_DEFINITION
/// interface Node { id: ID! }
/// type Book implements Node { id: ID!  title: String!  author: Author }
/// type Author implements Node { id: ID!  name: String  books(limit: Int = 10): [Book!]! @auth(role: "reader") }
/// enum Genre { FICTION SCIENCE }
/// union SearchResult = Book | Author
/// input BookFilter { genre: Genre  title: String }
/// ```
#[allow(dead_code)]
pub fn library_schema() -> Schema {
    Schema::new()
        .with_directive(
            DirectiveDef::new("auth")
                .with_argument(InputValueDef::new("role", "String"))
                .with_location("FIELD_DEFINITION"),
        )
        .with_type(TypeDef::interface("Node").with_field(FieldDef::new("id", "ID!")))
        .with_type(
            TypeDef::object("Book")
                .implements("Node")
                .with_field(FieldDef::new("id", "ID!"))
                .with_field(FieldDef::new("title", "String!"))
                .with_field(FieldDef::new("author", "Author")),
        )
        .with_type(
            TypeDef::object("Author")
                .implements("Node")
                .with_field(FieldDef::new("id", "ID!"))
                .with_field(FieldDef::new("name", "String"))
                .with_field(
                    FieldDef::new("books", "[Book!]!")
                        .with_argument(InputValueDef::new("limit", "Int").with_default("10"))
                        .with_directive(
                            DirectiveApplication::new("auth").with_argument("role", "\"reader\""),
                        ),
                ),
        )
        .with_type(
            TypeDef::enumeration("Genre")
                .with_value(EnumValueDef::new("FICTION"))
                .with_value(EnumValueDef::new("SCIENCE")),
        )
        .with_type(
            TypeDef::union("SearchResult")
                .with_member("Book")
                .with_member("Author"),
        )
        .with_type(
            TypeDef::input_object("BookFilter")
                .with_input_field(InputValueDef::new("genre", "Genre"))
                .with_input_field(InputValueDef::new("title", "String")),
        )
}

/// `library_schema` after five independent edits:
/// - `Author.name` renamed to `fullName`
/// - `Book.title` made nullable
/// - `Genre.HISTORY` added
/// - `Author` dropped from `SearchResult`
/// - `BookFilter.limit: Int` added
#[allow(dead_code)]
pub fn evolved_library_schema() -> Schema {
    let mut schema = library_schema();
    for type_def in &mut schema.types {
        match type_def.name.as_str() {
            "Author" => {
                if let Some(field) = type_def.fields.iter_mut().find(|f| f.name == "name") {
                    field.name = "fullName".to_string();
                }
            }
            "Book" => {
                if let Some(field) = type_def.fields.iter_mut().find(|f| f.name == "title") {
                    field.type_ref = "String".to_string();
                }
            }
            "Genre" => type_def.enum_values.push(EnumValueDef::new("HISTORY")),
            "SearchResult" => type_def.members.retain(|m| m != "Author"),
            "BookFilter" => type_def
                .input_fields
                .push(InputValueDef::new("limit", "Int")),
            _ => {}
        }
    }
    schema
}

/// Diff with the default configuration, panicking on error
#[allow(dead_code)]
pub fn diff_default(old: &Schema, new: &Schema) -> SchemaDiff {
    diff_schemas(old, new, &DiffConfig::default()).unwrap()
}

/// Operations of the first optimal solution
#[allow(dead_code)]
pub fn primary_ops(diff: &SchemaDiff) -> Vec<EditOperation> {
    diff.optimal().unwrap().solutions[0].operations.clone()
}

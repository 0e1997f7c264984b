//! SDL rendering for a finished schema.

use std::fmt::Write;

use super::registry::{BUILTIN_SCALARS, Schema};
use super::types::{FieldDef, TypeDef, TypeKind};

/// Renders every non-builtin type in registration order, followed by a
/// `schema` block naming the root types.
pub(crate) fn render(schema: &Schema) -> String {
    let mut out = String::new();

    for def in schema.types() {
        if def.kind == TypeKind::Scalar && BUILTIN_SCALARS.contains(&def.name.as_str()) {
            continue;
        }
        render_type(&mut out, def);
        out.push('\n');
    }

    out.push_str("schema {\n");
    let _ = writeln!(out, "  query: {}", schema.query_type_name());
    if let Some(mutation) = schema.mutation_type_name() {
        let _ = writeln!(out, "  mutation: {mutation}");
    }
    out.push_str("}\n");
    out
}

fn render_type(out: &mut String, def: &TypeDef) {
    render_description(out, def.description.as_deref(), "");

    let keyword = match def.kind {
        TypeKind::Object => "type",
        TypeKind::Input => "input",
        TypeKind::Scalar => {
            let _ = writeln!(out, "scalar {}", def.name);
            return;
        }
    };

    let _ = writeln!(out, "{keyword} {} {{", def.name);
    for field in &def.fields {
        render_field(out, field);
    }
    out.push_str("}\n");
}

fn render_field(out: &mut String, field: &FieldDef) {
    render_description(out, field.description.as_deref(), "  ");

    let _ = write!(out, "  {}", field.name);
    if !field.arguments.is_empty() {
        let args = field
            .arguments
            .iter()
            .map(|a| format!("{}: {}", a.name, a.ty))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "({args})");
    }
    let _ = writeln!(out, ": {}", field.ty);
}

fn render_description(out: &mut String, description: Option<&str>, indent: &str) {
    if let Some(text) = description {
        let _ = writeln!(out, "{indent}\"\"\"{text}\"\"\"");
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{ArgumentDef, FieldDef, SchemaRegistry, TypeDef, TypeRef};

    #[test]
    fn test_render_sdl() {
        let schema = SchemaRegistry::new()
            .with_type(
                TypeDef::object("Author")
                    .description("A person who wrote a book")
                    .field(FieldDef::new("firstName", TypeRef::named(TypeRef::STRING))),
            )
            .unwrap()
            .with_type(
                TypeDef::object("Query").field(
                    FieldDef::new("author", TypeRef::named("Author"))
                        .argument(ArgumentDef::new("id", TypeRef::named_nn(TypeRef::ID))),
                ),
            )
            .unwrap()
            .query_type("Query")
            .finish()
            .unwrap();

        let sdl = schema.sdl();
        assert!(sdl.contains("\"\"\"A person who wrote a book\"\"\"\ntype Author {\n  firstName: String\n}"));
        assert!(sdl.contains("  author(id: ID!): Author\n"));
        assert!(sdl.ends_with("schema {\n  query: Query\n}\n"));
        assert!(!sdl.contains("scalar String"));
    }
}

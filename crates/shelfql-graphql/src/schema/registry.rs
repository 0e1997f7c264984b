//! Schema registry.
//!
//! [`SchemaRegistry`] collects type definitions at startup. Calling
//! [`SchemaRegistry::finish`] validates that the type graph is closed and
//! freezes the registry into a [`Schema`], the only form the executor
//! accepts. An invalid registry therefore can never serve a request.

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::sdl;
use super::types::{FieldDef, TypeDef, TypeKind, TypeRef};
use crate::error::SchemaError;
use crate::selection::OperationType;

/// Scalars every registry starts with.
pub const BUILTIN_SCALARS: [&str; 5] = [
    TypeRef::ID,
    TypeRef::STRING,
    TypeRef::INT,
    TypeRef::FLOAT,
    TypeRef::BOOLEAN,
];

const INPUT_POSITION: &str = "input";
const OUTPUT_POSITION: &str = "output";

/// Mutable collection of type definitions used while building a schema.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    types: IndexMap<String, TypeDef>,
    query_type: Option<String>,
    mutation_type: Option<String>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Creates a registry holding only the built-in scalars.
    #[must_use]
    pub fn new() -> Self {
        let types = BUILTIN_SCALARS
            .iter()
            .map(|name| ((*name).to_string(), TypeDef::scalar(*name)))
            .collect();
        Self {
            types,
            query_type: None,
            mutation_type: None,
        }
    }

    /// Registers a type definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateType` if the name is already taken.
    pub fn register(&mut self, def: TypeDef) -> Result<(), SchemaError> {
        if self.types.contains_key(&def.name) {
            return Err(SchemaError::DuplicateType(def.name));
        }
        trace!(type_name = %def.name, kind = %def.kind, "Registering type");
        self.types.insert(def.name.clone(), def);
        Ok(())
    }

    /// Registers a type definition, builder style.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateType` if the name is already taken.
    pub fn with_type(mut self, def: TypeDef) -> Result<Self, SchemaError> {
        self.register(def)?;
        Ok(self)
    }

    /// Names the query root type.
    pub fn set_query_type(&mut self, name: impl Into<String>) {
        self.query_type = Some(name.into());
    }

    /// Names the mutation root type.
    pub fn set_mutation_type(&mut self, name: impl Into<String>) {
        self.mutation_type = Some(name.into());
    }

    #[must_use]
    pub fn query_type(mut self, name: impl Into<String>) -> Self {
        self.set_query_type(name);
        self
    }

    #[must_use]
    pub fn mutation_type(mut self, name: impl Into<String>) -> Self {
        self.set_mutation_type(name);
        self
    }

    /// Looks a type up by name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownType` if no such type is registered.
    pub fn lookup(&self, type_name: &str) -> Result<&TypeDef, SchemaError> {
        self.types
            .get(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))
    }

    /// Looks a field up on a registered type.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownType` if the type is missing, and
    /// `SchemaError::UnknownField` if the type exists without the field.
    pub fn field_of(&self, type_name: &str, field_name: &str) -> Result<&FieldDef, SchemaError> {
        self.lookup(type_name)?
            .field_def(field_name)
            .ok_or_else(|| SchemaError::UnknownField {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
            })
    }

    /// Iterates over every type in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Checks that the type graph is closed.
    ///
    /// Every field result type, argument type and input field type must name
    /// a registered type of a kind allowed in that position: output fields
    /// never return input objects, and arguments and input fields never take
    /// object types. Field names must be unique per type and the root types
    /// must be registered object types. Each reference is checked on its own,
    /// so a single pass is enough even when types refer to each other in
    /// cycles.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in registration order.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for def in self.types.values() {
            for (index, field) in def.fields.iter().enumerate() {
                if def.fields[..index].iter().any(|f| f.name == field.name) {
                    return Err(SchemaError::DuplicateField {
                        type_name: def.name.clone(),
                        field_name: field.name.clone(),
                    });
                }

                // Input object fields are inputs; everything else on an
                // object or scalar is an output, and arguments are inputs.
                let field_position = if def.kind == TypeKind::Input {
                    INPUT_POSITION
                } else {
                    OUTPUT_POSITION
                };
                let referenced = std::iter::once((&field.ty, field_position))
                    .chain(field.arguments.iter().map(|a| (&a.ty, INPUT_POSITION)));
                for (ty, position) in referenced {
                    self.check_reference(def, field, ty.type_name(), position)?;
                }
            }
        }

        let query = self.query_type.as_deref().ok_or(SchemaError::MissingQueryType)?;
        self.validate_root(query)?;
        if let Some(mutation) = self.mutation_type.as_deref() {
            self.validate_root(mutation)?;
        }

        Ok(())
    }

    fn check_reference(
        &self,
        owner: &TypeDef,
        field: &FieldDef,
        name: &str,
        position: &'static str,
    ) -> Result<(), SchemaError> {
        let referenced = self
            .types
            .get(name)
            .ok_or_else(|| SchemaError::DanglingTypeReference {
                type_name: owner.name.clone(),
                field_name: field.name.clone(),
                referenced: name.to_string(),
            })?;
        let misplaced = if position == INPUT_POSITION {
            referenced.kind == TypeKind::Object
        } else {
            referenced.kind == TypeKind::Input
        };
        if misplaced {
            return Err(SchemaError::MisplacedTypeReference {
                type_name: owner.name.clone(),
                field_name: field.name.clone(),
                referenced: name.to_string(),
                kind: referenced.kind,
                position,
            });
        }
        Ok(())
    }

    fn validate_root(&self, name: &str) -> Result<(), SchemaError> {
        let def = self.lookup(name)?;
        if def.kind != TypeKind::Object {
            return Err(SchemaError::InvalidRootType(name.to_string()));
        }
        Ok(())
    }

    /// Validates the registry and freezes it into a [`Schema`].
    ///
    /// # Errors
    ///
    /// Returns any error reported by [`SchemaRegistry::validate`].
    pub fn finish(self) -> Result<Schema, SchemaError> {
        self.validate()?;
        debug!(
            types = self.types.len(),
            query = ?self.query_type,
            mutation = ?self.mutation_type,
            "Schema validated"
        );
        Ok(Schema { registry: self })
    }
}

/// A validated, immutable schema.
///
/// A `Schema` is read-only and can be shared across concurrent executions
/// behind an `Arc` without synchronization.
#[derive(Debug, Clone)]
pub struct Schema {
    registry: SchemaRegistry,
}

impl Schema {
    /// Looks a type up by name.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownType` if no such type is registered.
    pub fn lookup(&self, type_name: &str) -> Result<&TypeDef, SchemaError> {
        self.registry.lookup(type_name)
    }

    /// Looks a field up on a registered type.
    ///
    /// # Errors
    ///
    /// See [`SchemaRegistry::field_of`].
    pub fn field_of(&self, type_name: &str, field_name: &str) -> Result<&FieldDef, SchemaError> {
        self.registry.field_of(type_name, field_name)
    }

    /// Returns the root type for an operation kind, if the schema has one.
    #[must_use]
    pub fn root(&self, kind: OperationType) -> Option<&TypeDef> {
        let name = match kind {
            OperationType::Query => self.registry.query_type.as_deref(),
            OperationType::Mutation => self.registry.mutation_type.as_deref(),
        }?;
        self.registry.types.get(name)
    }

    /// Name of the query root type.
    #[must_use]
    pub fn query_type_name(&self) -> &str {
        self.registry.query_type.as_deref().unwrap_or("Query")
    }

    /// Name of the mutation root type, if any.
    #[must_use]
    pub fn mutation_type_name(&self) -> Option<&str> {
        self.registry.mutation_type.as_deref()
    }

    /// Iterates over every type in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.registry.types()
    }

    /// Renders the schema as GraphQL SDL.
    #[must_use]
    pub fn sdl(&self) -> String {
        sdl::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ArgumentDef;

    fn book() -> TypeDef {
        TypeDef::object("Book")
            .field(FieldDef::new("id", TypeRef::named_nn(TypeRef::ID)))
            .field(FieldDef::new("author", TypeRef::named("Author")))
    }

    fn author() -> TypeDef {
        TypeDef::object("Author").field(FieldDef::new("firstName", TypeRef::named(TypeRef::STRING)))
    }

    fn query() -> TypeDef {
        TypeDef::object("Query").field(FieldDef::new("books", TypeRef::named_list("Book")))
    }

    #[test]
    fn test_register_duplicate_type() {
        let mut registry = SchemaRegistry::new();
        registry.register(book()).unwrap();
        assert_eq!(
            registry.register(book()),
            Err(SchemaError::DuplicateType("Book".into()))
        );
        assert_eq!(
            registry.register(TypeDef::scalar("String")),
            Err(SchemaError::DuplicateType("String".into()))
        );
    }

    #[test]
    fn test_lookup_and_field_of() {
        let registry = SchemaRegistry::new().with_type(book()).unwrap();

        assert_eq!(registry.lookup("Book").unwrap().name, "Book");
        assert_eq!(
            registry.lookup("Magazine"),
            Err(SchemaError::UnknownType("Magazine".into()))
        );
        assert_eq!(registry.field_of("Book", "id").unwrap().name, "id");
        assert_eq!(
            registry.field_of("Book", "isbn"),
            Err(SchemaError::UnknownField {
                type_name: "Book".into(),
                field_name: "isbn".into()
            })
        );
        assert!(matches!(
            registry.field_of("Magazine", "id"),
            Err(SchemaError::UnknownType(_))
        ));
    }

    #[test]
    fn test_validate_dangling_reference() {
        let registry = SchemaRegistry::new()
            .with_type(book())
            .unwrap()
            .with_type(query())
            .unwrap()
            .query_type("Query");

        assert_eq!(
            registry.validate(),
            Err(SchemaError::DanglingTypeReference {
                type_name: "Book".into(),
                field_name: "author".into(),
                referenced: "Author".into(),
            })
        );

        let registry = registry.with_type(author()).unwrap();
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_validate_closed_graph_iff_all_types_registered() {
        let candidates = [book(), author(), query()];
        // Every subset that keeps Query must validate exactly when both Book
        // and Author are present.
        for mask in 0..4u8 {
            let mut registry = SchemaRegistry::new().query_type("Query");
            let with_book = mask & 1 != 0;
            let with_author = mask & 2 != 0;
            if with_book {
                registry.register(candidates[0].clone()).unwrap();
            }
            if with_author {
                registry.register(candidates[1].clone()).unwrap();
            }
            registry.register(candidates[2].clone()).unwrap();

            let closed = with_book && with_author;
            assert_eq!(registry.validate().is_ok(), closed, "mask {mask}");
        }
    }

    #[test]
    fn test_validate_argument_types() {
        let registry = SchemaRegistry::new()
            .with_type(author())
            .unwrap()
            .with_type(
                TypeDef::object("Query").field(
                    FieldDef::new("author", TypeRef::named("Author"))
                        .argument(ArgumentDef::new("filter", TypeRef::named("AuthorFilter"))),
                ),
            )
            .unwrap()
            .query_type("Query");

        assert!(matches!(
            registry.validate(),
            Err(SchemaError::DanglingTypeReference { referenced, .. }) if referenced == "AuthorFilter"
        ));
    }

    #[test]
    fn test_validate_type_kind_positions() {
        let filter = TypeDef::input("AuthorFilter")
            .field(FieldDef::new("lastName", TypeRef::named(TypeRef::STRING)));

        // Input object as a field result
        let registry = SchemaRegistry::new()
            .with_type(filter.clone())
            .unwrap()
            .with_type(
                TypeDef::object("Query")
                    .field(FieldDef::new("filter", TypeRef::named("AuthorFilter"))),
            )
            .unwrap()
            .query_type("Query");
        assert_eq!(
            registry.validate(),
            Err(SchemaError::MisplacedTypeReference {
                type_name: "Query".into(),
                field_name: "filter".into(),
                referenced: "AuthorFilter".into(),
                kind: TypeKind::Input,
                position: "output",
            })
        );

        // Object type as an argument
        let registry = SchemaRegistry::new()
            .with_type(author())
            .unwrap()
            .with_type(
                TypeDef::object("Query").field(
                    FieldDef::new("author", TypeRef::named("Author"))
                        .argument(ArgumentDef::new("like", TypeRef::named("Author"))),
                ),
            )
            .unwrap()
            .query_type("Query");
        assert!(matches!(
            registry.validate(),
            Err(SchemaError::MisplacedTypeReference { kind: TypeKind::Object, position: "input", .. })
        ));

        // Object type inside an input object
        let registry = SchemaRegistry::new()
            .with_type(author())
            .unwrap()
            .with_type(
                TypeDef::input("AuthorFilter").field(FieldDef::new("author", TypeRef::named("Author"))),
            )
            .unwrap()
            .with_type(TypeDef::object("Query").field(FieldDef::new("authors", TypeRef::named_list("Author"))))
            .unwrap()
            .query_type("Query");
        assert!(matches!(
            registry.validate(),
            Err(SchemaError::MisplacedTypeReference { type_name, .. }) if type_name == "AuthorFilter"
        ));

        // Inputs as arguments and scalars anywhere are fine
        let registry = SchemaRegistry::new()
            .with_type(author())
            .unwrap()
            .with_type(filter)
            .unwrap()
            .with_type(
                TypeDef::object("Query").field(
                    FieldDef::new("authors", TypeRef::named_list("Author"))
                        .argument(ArgumentDef::new("filter", TypeRef::named("AuthorFilter"))),
                ),
            )
            .unwrap()
            .query_type("Query");
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_field() {
        let registry = SchemaRegistry::new()
            .with_type(
                TypeDef::object("Query")
                    .field(FieldDef::new("books", TypeRef::named(TypeRef::INT)))
                    .field(FieldDef::new("books", TypeRef::named(TypeRef::STRING))),
            )
            .unwrap()
            .query_type("Query");

        assert!(matches!(
            registry.validate(),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_validate_roots() {
        let registry = SchemaRegistry::new();
        assert_eq!(registry.validate(), Err(SchemaError::MissingQueryType));

        let registry = SchemaRegistry::new().query_type("Query");
        assert_eq!(
            registry.validate(),
            Err(SchemaError::UnknownType("Query".into()))
        );

        let registry = SchemaRegistry::new()
            .with_type(TypeDef::input("Query"))
            .unwrap()
            .query_type("Query");
        assert_eq!(
            registry.validate(),
            Err(SchemaError::InvalidRootType("Query".into()))
        );
    }

    #[test]
    fn test_finish_exposes_roots() {
        let schema = SchemaRegistry::new()
            .with_type(book())
            .unwrap()
            .with_type(author())
            .unwrap()
            .with_type(query())
            .unwrap()
            .query_type("Query")
            .finish()
            .unwrap();

        assert_eq!(schema.root(OperationType::Query).unwrap().name, "Query");
        assert!(schema.root(OperationType::Mutation).is_none());
        assert_eq!(schema.query_type_name(), "Query");
        assert!(schema.mutation_type_name().is_none());
    }
}

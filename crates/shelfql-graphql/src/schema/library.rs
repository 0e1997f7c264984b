//! The book/author schema served by shelfql.

use super::registry::{Schema, SchemaRegistry};
use super::types::{ArgumentDef, FieldDef, TypeDef, TypeRef};
use crate::error::SchemaError;

pub const QUERY: &str = "Query";
pub const MUTATION: &str = "Mutation";
pub const BOOK: &str = "Book";
pub const AUTHOR: &str = "Author";
pub const BOOK_REQUEST: &str = "BookRequest";
pub const AUTHOR_REQUEST: &str = "AuthorRequest";

/// Builds the library schema registry without finishing it.
///
/// # Errors
///
/// Returns `SchemaError::DuplicateType` if a type is declared twice.
pub fn library_registry() -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new();

    registry.register(
        TypeDef::object(BOOK)
            .description("A book in the library")
            .field(FieldDef::new("id", TypeRef::named_nn(TypeRef::ID)))
            .field(FieldDef::new("title", TypeRef::named(TypeRef::STRING)))
            .field(FieldDef::new("author", TypeRef::named(AUTHOR))),
    )?;

    registry.register(
        TypeDef::object(AUTHOR)
            .description("A person who wrote a book")
            .field(FieldDef::new("userId", TypeRef::named_nn(TypeRef::ID)))
            .field(FieldDef::new("firstName", TypeRef::named(TypeRef::STRING)))
            .field(FieldDef::new("lastName", TypeRef::named(TypeRef::STRING))),
    )?;

    registry.register(
        TypeDef::input(AUTHOR_REQUEST)
            .field(FieldDef::new("firstName", TypeRef::named(TypeRef::STRING)))
            .field(FieldDef::new("lastName", TypeRef::named(TypeRef::STRING))),
    )?;

    registry.register(
        TypeDef::input(BOOK_REQUEST)
            .field(FieldDef::new("title", TypeRef::named(TypeRef::STRING)))
            .field(FieldDef::new("author", TypeRef::named(AUTHOR_REQUEST))),
    )?;

    registry.register(
        TypeDef::object(QUERY)
            .field(FieldDef::new("books", TypeRef::named_list(BOOK)).description("All books"))
            .field(
                FieldDef::new("authors", TypeRef::named_list(AUTHOR)).description("All authors"),
            )
            .field(
                FieldDef::new("author", TypeRef::named(AUTHOR))
                    .argument(ArgumentDef::new("id", TypeRef::named_nn(TypeRef::ID)))
                    .description("Author by identifier, null when there is none"),
            ),
    )?;

    registry.register(
        TypeDef::object(MUTATION).field(
            FieldDef::new("createBook", TypeRef::named(BOOK))
                .argument(ArgumentDef::new("request", TypeRef::named(BOOK_REQUEST))),
        ),
    )?;

    registry.set_query_type(QUERY);
    registry.set_mutation_type(MUTATION);
    Ok(registry)
}

/// Builds and validates the library schema.
///
/// # Errors
///
/// Returns any `SchemaError` raised while registering or validating types.
pub fn library_schema() -> Result<Schema, SchemaError> {
    library_registry()?.finish()
}

//! Schema registry and type system.
//!
//! The schema is built once at startup:
//! 1. Types are registered on a [`SchemaRegistry`]
//! 2. Root types are named
//! 3. [`SchemaRegistry::finish`] checks the type graph is closed and returns
//!    an immutable [`Schema`]
//!
//! The [`Schema`] is then shared by every request.

mod library;
mod registry;
mod sdl;
mod types;

pub use library::{
    AUTHOR, AUTHOR_REQUEST, BOOK, BOOK_REQUEST, MUTATION, QUERY, library_registry, library_schema,
};
pub use registry::{BUILTIN_SCALARS, Schema, SchemaRegistry};
pub use types::{ArgumentDef, FieldDef, TypeDef, TypeKind, TypeRef};

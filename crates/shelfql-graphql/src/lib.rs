//! # shelfql-graphql
//!
//! The typed field-resolution engine behind the shelfql library server.
//!
//! A request travels through four pieces:
//!
//! 1. [`parser`] lowers GraphQL text into an [`Operation`] (a selection tree)
//! 2. [`execution::validate_operation`] checks the tree against the [`Schema`]
//! 3. [`Executor`] walks the tree, calling resolvers from the [`ResolverTable`]
//! 4. The result tree is returned with any field-scoped errors
//!
//! ## Endpoints
//!
//! - `POST /graphql` - GraphQL endpoint
//! - `GET /graphql` - GraphQL (query via URL param)
//! - `GET /graphql/schema` - schema SDL
//!
//! ## Configuration
//!
//! Add to `shelfql.toml`:
//!
//! ```toml
//! [graphql]
//! enabled = true
//! max_depth = 15
//! expose_schema = true
//! request_timeout_ms = 30000
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Schema registry and the library schema
//! - [`resolvers`] - Resolver table and the library resolvers
//! - [`execution`] - Validation, execution and observability hooks
//! - [`selection`] - Request model
//! - [`parser`] - Query text parsing
//! - [`handler`] - Axum HTTP handlers
//! - [`error`] - Error types

pub mod config;
pub mod context;
pub mod error;
pub mod execution;
pub mod handler;
pub mod parser;
pub mod resolvers;
pub mod schema;
pub mod selection;

use std::sync::Arc;

use shelfql_storage::DynStorage;

pub use config::GraphQLConfig;
pub use context::{RequestContext, RequestContextBuilder};
pub use error::{ExecutionError, GraphQLError, ResolverError, SchemaError};
pub use execution::{
    CallCounter, ExecutionHooks, ExecutionResponse, Executor, ResponsePath, TracingHooks,
};
pub use handler::{GraphQLState, graphql_handler, graphql_handler_get, schema_handler};
pub use parser::parse_operation;
pub use resolvers::{FieldResolver, ResolverContext, ResolverTable, library_resolvers};
pub use schema::{Schema, SchemaRegistry, library_schema};
pub use selection::{Arguments, Operation, OperationType, SelectionNode};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;

/// Builds an executor serving the library schema from `storage`, with
/// tracing hooks and the depth limit from `config`.
///
/// # Errors
///
/// Returns a `SchemaError` if the schema is invalid or a resolver is bound
/// to an undeclared field.
pub fn library_executor(
    storage: DynStorage,
    config: &GraphQLConfig,
) -> std::result::Result<Executor, SchemaError> {
    let schema = Arc::new(library_schema()?);
    Ok(Executor::new(schema, library_resolvers(storage))?
        .with_max_depth(config.max_depth)
        .with_hooks(Arc::new(TracingHooks)))
}

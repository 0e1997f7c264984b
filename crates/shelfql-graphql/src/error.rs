//! Error types for GraphQL operations.
//!
//! Errors fall into four groups:
//!
//! - [`SchemaError`]: schema construction failures. These are fatal at
//!   startup; a schema that fails validation never reaches the executor.
//! - [`ExecutionError`]: per-request failures raised by the execution engine.
//! - [`ResolverError`]: failures raised inside a field resolver. The engine
//!   wraps them in [`ExecutionError::ResolverExecution`].
//! - [`GraphQLError`]: transport-facing errors, converted to HTTP responses.
//!
//! A lookup that finds nothing is not an error: resolvers return
//! `Value::Null` for that case.

use std::fmt;

use shelfql_storage::StorageError;

use crate::execution::ResponsePath;
use crate::schema::TypeKind;

/// Errors raised while building or validating a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A type with this name is already registered.
    #[error("type '{0}' is already registered")]
    DuplicateType(String),

    /// A type declares two fields with the same name.
    #[error("type '{type_name}' declares field '{field_name}' more than once")]
    DuplicateField {
        type_name: String,
        field_name: String,
    },

    /// No type with this name is registered.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// The type exists but has no such field.
    #[error("type '{type_name}' has no field '{field_name}'")]
    UnknownField {
        type_name: String,
        field_name: String,
    },

    /// A field or argument references a type that is not registered.
    #[error("field '{type_name}.{field_name}' references unknown type '{referenced}'")]
    DanglingTypeReference {
        type_name: String,
        field_name: String,
        referenced: String,
    },

    /// A field or argument references a type of the wrong kind: an input
    /// object in output position, or an object type in input position.
    #[error(
        "field '{type_name}.{field_name}' uses {kind} type '{referenced}' in {position} position"
    )]
    MisplacedTypeReference {
        type_name: String,
        field_name: String,
        referenced: String,
        kind: TypeKind,
        position: &'static str,
    },

    /// No query root type was configured.
    #[error("schema has no query root type")]
    MissingQueryType,

    /// A root operation type is not an object type.
    #[error("root type '{0}' must be an object type")]
    InvalidRootType(String),
}

/// Errors raised inside a field resolver.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// A free-form failure.
    #[error("{0}")]
    Message(String),

    /// An argument value could not be used.
    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// The parent value does not have the expected shape.
    #[error("invalid parent value: {0}")]
    InvalidParent(String),

    /// The data access layer failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A record could not be converted to or from JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ResolverError {
    /// Creates a free-form resolver error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Creates an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the execution engine for a single request.
///
/// Request-shape errors are detected before any resolver runs and fail the
/// whole request. Field errors ([`ExecutionError::is_field_error`]) are scoped
/// to the response path that failed.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The schema has no root type for the requested operation.
    #[error("schema does not support {0} operations")]
    UnknownOperation(String),

    /// The operation selects no fields.
    #[error("operation selects no fields")]
    EmptySelection,

    /// A selected field's type is not registered.
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// The selected field is not declared on its parent type.
    #[error("type '{type_name}' has no field '{field_name}'")]
    UnknownField {
        type_name: String,
        field_name: String,
    },

    /// An argument is not declared on the field.
    #[error("field '{type_name}.{field_name}' has no argument '{argument}'")]
    UnknownArgument {
        type_name: String,
        field_name: String,
        argument: String,
    },

    /// A non-null argument was not provided.
    #[error("field '{type_name}.{field_name}' requires argument '{argument}'")]
    MissingArgument {
        type_name: String,
        field_name: String,
        argument: String,
    },

    /// A scalar field was given a sub-selection.
    #[error("field '{type_name}.{field_name}' is a scalar and cannot have a sub-selection")]
    UnexpectedChildSelection {
        type_name: String,
        field_name: String,
    },

    /// An object field was selected without a sub-selection.
    #[error("field '{type_name}.{field_name}' of type '{field_type}' requires a sub-selection")]
    MissingSubSelection {
        type_name: String,
        field_name: String,
        field_type: String,
    },

    /// The selection is nested deeper than allowed.
    #[error("query depth {actual} exceeds maximum allowed {max}")]
    DepthExceeded { actual: usize, max: usize },

    /// No resolver is registered and the parent has no such property.
    #[error("no resolver for '{type_name}.{field_name}' and the parent value has no such property")]
    MissingDefaultField {
        type_name: String,
        field_name: String,
        path: ResponsePath,
    },

    /// A list field resolved to something other than a list.
    #[error("field '{type_name}.{field_name}' is a list but resolved to a non-list value")]
    ListExpected {
        type_name: String,
        field_name: String,
        path: ResponsePath,
    },

    /// A resolver failed.
    #[error("resolver for '{type_name}.{field_name}' failed: {source}")]
    ResolverExecution {
        type_name: String,
        field_name: String,
        path: ResponsePath,
        #[source]
        source: ResolverError,
    },
}

impl ExecutionError {
    /// Returns true if the error is scoped to one field of the response.
    #[must_use]
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            Self::MissingDefaultField { .. }
                | Self::ListExpected { .. }
                | Self::ResolverExecution { .. }
        )
    }

    /// Returns the response path of a field error.
    #[must_use]
    pub fn path(&self) -> Option<&ResponsePath> {
        match self {
            Self::MissingDefaultField { path, .. }
            | Self::ListExpected { path, .. }
            | Self::ResolverExecution { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownOperation(_) => "UNKNOWN_OPERATION",
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::UnknownType(_) => "UNKNOWN_TYPE",
            Self::UnknownField { .. } => "UNKNOWN_FIELD",
            Self::UnknownArgument { .. } => "UNKNOWN_ARGUMENT",
            Self::MissingArgument { .. } => "MISSING_ARGUMENT",
            Self::UnexpectedChildSelection { .. } => "UNEXPECTED_CHILD_SELECTION",
            Self::MissingSubSelection { .. } => "MISSING_SUB_SELECTION",
            Self::DepthExceeded { .. } => "DEPTH_EXCEEDED",
            Self::MissingDefaultField { .. } => "MISSING_DEFAULT_FIELD",
            Self::ListExpected { .. } => "LIST_EXPECTED",
            Self::ResolverExecution { .. } => "RESOLVER_ERROR",
        }
    }
}

/// Errors returned to HTTP clients.
#[derive(Debug)]
pub enum GraphQLError {
    /// GraphQL endpoints are switched off.
    Disabled,

    /// Invalid query syntax or an unsupported language feature.
    InvalidQuery(String),

    /// The request was rejected by the execution engine.
    Execution(ExecutionError),

    /// Execution did not finish in time.
    Timeout {
        /// Configured limit in milliseconds.
        limit_ms: u64,
    },

    /// Internal server error.
    Internal(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "GraphQL API is disabled"),
            Self::InvalidQuery(msg) => write!(f, "Invalid GraphQL query: {msg}"),
            Self::Execution(err) => write!(f, "{err}"),
            Self::Timeout { limit_ms } => {
                write!(f, "GraphQL execution exceeded {limit_ms}ms")
            }
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for GraphQLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Execution(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ExecutionError> for GraphQLError {
    fn from(err: ExecutionError) -> Self {
        Self::Execution(err)
    }
}

impl GraphQLError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Disabled => 404,
            Self::InvalidQuery(_) => 400,
            Self::Execution(err) if err.is_field_error() => 500,
            Self::Execution(_) => 400,
            Self::Timeout { .. } => 504,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Disabled => "DISABLED",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Execution(err) => err.error_code(),
            Self::Timeout { .. } => "TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Converts the error to a GraphQL response body with `data: null`.
    #[must_use]
    pub fn to_response_body(&self) -> serde_json::Value {
        serde_json::json!({
            "data": null,
            "errors": [{
                "message": self.to_string(),
                "extensions": {
                    "code": self.error_code()
                }
            }]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GraphQLError::Disabled.status_code(), 404);
        assert_eq!(GraphQLError::InvalidQuery("test".into()).status_code(), 400);
        assert_eq!(
            GraphQLError::Execution(ExecutionError::EmptySelection).status_code(),
            400
        );
        assert_eq!(GraphQLError::Timeout { limit_ms: 10 }.status_code(), 504);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GraphQLError::Execution(ExecutionError::UnknownField {
                type_name: "Query".into(),
                field_name: "magazines".into(),
            })
            .error_code(),
            "UNKNOWN_FIELD"
        );
        assert_eq!(
            GraphQLError::InvalidQuery("x".into()).error_code(),
            "INVALID_QUERY"
        );
    }

    #[test]
    fn test_field_error_classification() {
        let err = ExecutionError::MissingDefaultField {
            type_name: "Book".into(),
            field_name: "isbn".into(),
            path: ResponsePath::root().child("books").index(0).child("isbn"),
        };
        assert!(err.is_field_error());
        assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("books.0.isbn"));

        let err = ExecutionError::DepthExceeded { actual: 20, max: 15 };
        assert!(!err.is_field_error());
        assert!(err.path().is_none());
    }

    #[test]
    fn test_resolver_error_wraps_storage() {
        let err: ResolverError = StorageError::connection_error("refused").into();
        assert_eq!(err.to_string(), "Connection error: refused");
    }

    #[test]
    fn test_response_body() {
        let body = GraphQLError::InvalidQuery("unexpected token".into()).to_response_body();
        assert!(body["data"].is_null());
        assert_eq!(body["errors"][0]["extensions"]["code"], "INVALID_QUERY");
        assert_eq!(
            body["errors"][0]["message"],
            "Invalid GraphQL query: unexpected token"
        );
    }
}

//! Per-request execution context.
//!
//! The context is built once per incoming request and shared, behind an
//! `Arc`, with every resolver call of that request. It carries no mutable
//! state.
//!
//! # Example
//!
//! ```ignore
//! use shelfql_graphql::RequestContext;
//!
//! let context = RequestContext::builder()
//!     .with_request_id("req-123")
//!     .with_operation_name(Some("ListBooks".to_string()))
//!     .build()?;
//! ```

/// Request-scoped data visible to resolvers and execution hooks.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID for tracing and correlation.
    pub request_id: String,

    /// Name of the executed operation, when the document names it.
    pub operation_name: Option<String>,
}

impl RequestContext {
    /// Creates a context with only a request ID.
    #[must_use]
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            operation_name: None,
        }
    }

    /// Creates a new builder for RequestContext.
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }
}

/// Builder for constructing RequestContext.
#[derive(Debug, Default)]
pub struct RequestContextBuilder {
    request_id: Option<String>,
    operation_name: Option<String>,
}

impl RequestContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation_name(mut self, name: Option<String>) -> Self {
        self.operation_name = name;
        self
    }

    /// Builds the RequestContext.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<RequestContext, ContextBuilderError> {
        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        Ok(RequestContext {
            request_id,
            operation_name: self.operation_name,
        })
    }
}

/// Errors that can occur when building a RequestContext.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

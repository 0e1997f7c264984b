//! Axum HTTP handlers for GraphQL endpoints.
//!
//! - `POST /graphql` - execute a query or mutation from a JSON body
//! - `GET /graphql` - execute a query passed as URL parameters
//! - `GET /graphql/schema` - the schema as SDL
//!
//! Request-shape errors are answered with `400` and `data: null`. Field
//! errors leave the rest of the result intact and are answered with `200`.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GraphQLConfig;
use crate::context::RequestContext;
use crate::error::GraphQLError;
use crate::execution::{Executor, FieldError};
use crate::parser::parse_operation;

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    pub executor: Arc<Executor>,
    pub config: GraphQLConfig,
}

impl GraphQLState {
    #[must_use]
    pub fn new(executor: Arc<Executor>, config: GraphQLConfig) -> Self {
        Self { executor, config }
    }
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    /// The GraphQL query string.
    pub query: String,

    /// Optional operation name for multi-operation documents.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Variables are accepted in the body but only an empty set is allowed.
    pub variables: Option<serde_json::Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    pub query: Option<String>,

    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Variables as a JSON string.
    pub variables: Option<String>,
}

/// GraphQL response body.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    pub data: serde_json::Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// Handles `POST /graphql`.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    debug!("Processing GraphQL request");
    execute_graphql(state, headers, request).await
}

/// Handles `GET /graphql`.
pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> Response {
    let request = match params_to_request(params) {
        Ok(req) => req,
        Err(e) => return error_response(GraphQLError::InvalidQuery(e.to_string())),
    };

    debug!("Processing GraphQL GET request");
    execute_graphql(state, headers, request).await
}

/// Handles `GET /graphql/schema`.
pub async fn schema_handler(State(state): State<GraphQLState>) -> Response {
    if !state.config.enabled || !state.config.expose_schema {
        return error_response(GraphQLError::Disabled);
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.executor.schema().sdl(),
    )
        .into_response()
}

/// Executes a GraphQL request.
async fn execute_graphql(state: GraphQLState, headers: HeaderMap, request: GraphQLRequest) -> Response {
    if !state.config.enabled {
        return error_response(GraphQLError::Disabled);
    }

    if has_variables(request.variables.as_ref()) {
        return error_response(GraphQLError::InvalidQuery(
            "variables are not supported".into(),
        ));
    }

    // Extract request ID from headers (set by middleware)
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let operation = match parse_operation(&request.query, request.operation_name.as_deref()) {
        Ok(op) => op,
        Err(e) => {
            debug!(request_id = %request_id, error = %e, "Rejected GraphQL query");
            return error_response(e);
        }
    };

    let context = match RequestContext::builder()
        .with_request_id(request_id)
        .with_operation_name(operation.name.clone())
        .build()
    {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => return error_response(GraphQLError::Internal(e.to_string())),
    };

    debug!(query = %request.query, "Executing GraphQL query");
    let limit = state.config.request_timeout();
    let outcome = tokio::time::timeout(limit, state.executor.execute(&operation, context.clone())).await;

    match outcome {
        Ok(Ok(response)) => {
            if !response.is_ok() {
                warn!(
                    request_id = %context.request_id,
                    errors = response.errors.len(),
                    "GraphQL execution finished with field errors"
                );
            }
            let body = GraphQLResponse {
                errors: response.field_errors(),
                data: response.data,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Ok(Err(e)) => {
            debug!(request_id = %context.request_id, error = %e, "GraphQL request rejected");
            error_response(e.into())
        }
        Err(_) => {
            warn!(
                request_id = %context.request_id,
                limit_ms = state.config.request_timeout_ms,
                "GraphQL execution timed out"
            );
            error_response(GraphQLError::Timeout {
                limit_ms: state.config.request_timeout_ms,
            })
        }
    }
}

fn has_variables(variables: Option<&serde_json::Value>) -> bool {
    match variables {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Object(map)) => !map.is_empty(),
        Some(_) => true,
    }
}

/// Converts GET query params to a GraphQL request.
fn params_to_request(params: GraphQLQueryParams) -> Result<GraphQLRequest, serde_json::Error> {
    let variables = if let Some(vars_str) = params.variables {
        Some(serde_json::from_str(&vars_str)?)
    } else {
        None
    };

    Ok(GraphQLRequest {
        query: params.query.unwrap_or_default(),
        operation_name: params.operation_name,
        variables,
    })
}

/// Returns an error response.
fn error_response(error: GraphQLError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error.to_response_body()),
    )
        .into_response()
}

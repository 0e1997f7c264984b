use axum::{Json, response::IntoResponse};
use serde::Serialize;
use serde_json::json;
use shelfql_storage::LibraryStorage;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "service": "shelfql",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/graphql", "/graphql/schema", "/health", "/healthz"],
    }))
}

/// Plain-text liveness probe.
pub async fn health() -> &'static str {
    "Ok"
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
}

pub async fn healthz(
    axum::extract::State(storage): axum::extract::State<shelfql_storage::DynStorage>,
) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        storage: storage.backend_name(),
    })
}

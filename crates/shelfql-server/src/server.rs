use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use shelfql_db_memory::{InMemoryStorage, SeedData};
use shelfql_graphql::{
    GraphQLState, graphql_handler, graphql_handler_get, library_executor, schema_handler,
};
use shelfql_storage::{DynStorage, LibraryStorage};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::{AppConfig, CorsConfig},
    handlers, middleware as app_middleware,
};

pub struct ShelfqlServer {
    addr: SocketAddr,
    app: Router,
}

/// Opens the configured library store: the seed file when set, else the
/// bundled sample library.
pub fn build_storage(cfg: &AppConfig) -> anyhow::Result<DynStorage> {
    let seed = match cfg.storage.seed_file.as_deref() {
        Some(path) => SeedData::from_path(path)
            .with_context(|| format!("failed to load seed file {path}"))?,
        None => SeedData::sample().context("bundled sample library is invalid")?,
    };
    let storage = InMemoryStorage::from_seed(seed)?;
    Ok(Arc::new(storage))
}

pub fn build_cors(cfg: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let origin = if cfg.allows_any() {
        AllowOrigin::from(Any)
    } else {
        let origins = cfg
            .allow_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]))
}

pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let body_limit = cfg.server.body_limit_bytes;

    let storage = build_storage(cfg)?;
    tracing::info!(backend = storage.backend_name(), "library storage ready");

    let executor = library_executor(storage.clone(), &cfg.graphql)?;
    let graphql_state = GraphQLState::new(Arc::new(executor), cfg.graphql.clone());

    let graphql = Router::new()
        .route("/graphql", get(graphql_handler_get).post(graphql_handler))
        .route("/graphql/schema", get(schema_handler))
        .with_state(graphql_state);

    let probes = Router::new()
        .route("/healthz", get(handlers::healthz))
        .with_state(storage);

    let app = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(graphql)
        .merge(probes)
        // Layers wrap outward: request id runs before the trace span is made
        .layer(build_cors(&cfg.cors)?)
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit));

    Ok(app)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<ShelfqlServer> {
        let app = build_app(&self.config).await?;
        Ok(ShelfqlServer {
            addr: self.addr,
            app,
        })
    }
}

impl ShelfqlServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn router_answers_health_with_request_id() {
        let app = build_app(&AppConfig::default()).await.unwrap();
        let res = app
            .oneshot(
                axum::http::Request::get("/health")
                    .header("x-request-id", "abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), axum::http::StatusCode::OK);
        assert_eq!(res.headers()["x-request-id"], "abc");
    }

    #[test]
    fn cors_rejects_malformed_origin() {
        let cfg = CorsConfig {
            allow_origins: vec!["http://ok.example".into(), "bad\norigin".into()],
        };
        assert!(build_cors(&cfg).is_err());
    }

    #[tokio::test]
    async fn missing_seed_file_fails_startup() {
        let mut cfg = AppConfig::default();
        cfg.storage.seed_file = Some("/nonexistent/library.json".into());
        assert!(build_app(&cfg).await.is_err());
    }

    #[tokio::test]
    async fn sample_storage_by_default() {
        let storage = build_storage(&AppConfig::default()).unwrap();
        assert_eq!(storage.list_books().await.unwrap().len(), 2);
    }
}

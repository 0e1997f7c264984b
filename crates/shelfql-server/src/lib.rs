//! HTTP server for the shelfql library: configuration, tracing, router
//! assembly and graceful shutdown around `shelfql-graphql`.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::{AppConfig, CorsConfig, LoggingConfig, ServerConfig, StorageConfig};
pub use observability::init_tracing;
pub use server::{ServerBuilder, ShelfqlServer, build_app};

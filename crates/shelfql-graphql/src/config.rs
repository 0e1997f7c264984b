//! GraphQL configuration.
//!
//! Configuration can be specified in `shelfql.toml` under the `[graphql]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [graphql]
//! enabled = true
//! max_depth = 15
//! expose_schema = true
//! request_timeout_ms = 30000
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// GraphQL API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Enable GraphQL API endpoints.
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum selection depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Serve the schema as SDL at `GET /graphql/schema`.
    /// Default: true
    #[serde(default = "default_expose_schema")]
    pub expose_schema: bool,

    /// Upper bound for a single execution. The in-flight execution is
    /// dropped, and with it every pending resolver, when the limit is hit.
    /// Default: 30000
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_depth() -> usize {
    15
}

fn default_expose_schema() -> bool {
    true
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_depth: default_max_depth(),
            expose_schema: default_expose_schema(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl GraphQLConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("graphql.max_depth must be > 0".into());
        }
        if self.request_timeout_ms == 0 {
            return Err("graphql.request_timeout_ms must be > 0".into());
        }
        Ok(())
    }

    /// Returns the execution timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

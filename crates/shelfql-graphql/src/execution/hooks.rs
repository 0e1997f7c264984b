//! Observability hooks invoked around each resolved field.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use super::response::ResponsePath;

/// What a hook sees about the field being resolved.
#[derive(Debug, Clone, Copy)]
pub struct FieldInfo<'a> {
    pub type_name: &'a str,
    pub field_name: &'a str,
    pub path: &'a ResponsePath,
    /// True when the field belongs to the query or mutation root type.
    pub is_root: bool,
    pub request_id: &'a str,
}

/// Callbacks invoked by the executor around every field resolution.
///
/// Hooks run inline on the execution task and must not block.
pub trait ExecutionHooks: Send + Sync {
    fn on_field_start(&self, _info: &FieldInfo<'_>) {}

    fn on_field_end(&self, _info: &FieldInfo<'_>, _elapsed: Duration, _failed: bool) {}
}

/// Emits a `tracing` event per resolved field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl ExecutionHooks for TracingHooks {
    fn on_field_start(&self, info: &FieldInfo<'_>) {
        debug!(
            request_id = %info.request_id,
            type_name = %info.type_name,
            field = %info.field_name,
            path = %info.path,
            "Resolving field"
        );
    }

    fn on_field_end(&self, info: &FieldInfo<'_>, elapsed: Duration, failed: bool) {
        if failed {
            warn!(
                request_id = %info.request_id,
                type_name = %info.type_name,
                field = %info.field_name,
                path = %info.path,
                elapsed_us = elapsed.as_micros() as u64,
                "Field resolution failed"
            );
        } else {
            debug!(
                request_id = %info.request_id,
                type_name = %info.type_name,
                field = %info.field_name,
                elapsed_us = elapsed.as_micros() as u64,
                "Field resolved"
            );
        }
    }
}

/// Counts root field resolutions across all requests.
#[derive(Debug, Default)]
pub struct CallCounter {
    total: AtomicU64,
}

impl CallCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of root fields resolved so far.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl ExecutionHooks for CallCounter {
    fn on_field_start(&self, info: &FieldInfo<'_>) {
        if info.is_root {
            let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(field = %info.field_name, total, "Root field call");
        }
    }
}

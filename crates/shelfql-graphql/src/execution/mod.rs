//! Execution engine.
//!
//! - [`validate_operation`] rejects malformed requests before any resolver runs
//! - [`Executor`] resolves a validated selection tree into a result tree
//! - [`ExecutionHooks`] observe every field resolution

mod executor;
mod hooks;
mod response;
mod validate;

pub use executor::{DEFAULT_MAX_DEPTH, Executor};
pub use hooks::{CallCounter, ExecutionHooks, FieldInfo, TracingHooks};
pub use response::{ErrorExtensions, ExecutionResponse, FieldError, PathSegment, ResponsePath};
pub use validate::validate_operation;

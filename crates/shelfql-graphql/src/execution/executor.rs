//! Selection-tree executor.
//!
//! The executor walks a validated selection tree top-down. Each field is
//! resolved through the [`ResolverTable`] with its parent's value, then its
//! children are resolved against the value it produced. Results are
//! assembled bottom-up into a JSON object whose keys follow selection order.
//!
//! Sibling fields of a query are resolved concurrently; root fields of a
//! mutation run one after another. List elements are resolved concurrently
//! and always reassembled in input order.

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::{BoxFuture, FutureExt, join_all};
use serde_json::{Map, Value};
use tracing::debug;

use super::hooks::{ExecutionHooks, FieldInfo};
use super::response::{ExecutionResponse, ResponsePath};
use super::validate::validate_operation;
use crate::context::RequestContext;
use crate::error::{ExecutionError, SchemaError};
use crate::resolvers::{ResolverContext, ResolverTable};
use crate::schema::{FieldDef, Schema, TypeDef, TypeKind, TypeRef};
use crate::selection::{Operation, OperationType, SelectionNode};

/// Default maximum selection depth.
pub const DEFAULT_MAX_DEPTH: usize = 15;

type Resolved = (Value, Vec<ExecutionError>);

/// Executes operations against a finished schema.
///
/// The executor is immutable and can be shared across requests. It holds no
/// locks while resolvers run; dropping the future returned by
/// [`Executor::execute`] cancels every pending resolver.
#[derive(Clone)]
pub struct Executor {
    schema: Arc<Schema>,
    resolvers: Arc<ResolverTable>,
    hooks: Vec<Arc<dyn ExecutionHooks>>,
    max_depth: usize,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("resolvers", &self.resolvers)
            .field("hooks", &self.hooks.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Executor {
    /// Creates an executor, checking that every resolver is bound to a field
    /// the schema declares.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownType` or `SchemaError::UnknownField` for
    /// the first binding with no matching field.
    pub fn new(schema: Arc<Schema>, resolvers: ResolverTable) -> Result<Self, SchemaError> {
        for (type_name, field_name) in resolvers.bindings() {
            schema.field_of(type_name, field_name)?;
        }

        Ok(Self {
            schema,
            resolvers: Arc::new(resolvers),
            hooks: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Adds an observability hook. Hooks run in the order they were added.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn ExecutionHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Executes one operation.
    ///
    /// # Errors
    ///
    /// Returns a request-shape error if validation fails; no resolver runs in
    /// that case. Failures inside individual fields do not fail the call:
    /// they are recorded in [`ExecutionResponse::errors`] and the field is
    /// `null` in the data.
    pub async fn execute(
        &self,
        operation: &Operation,
        request: Arc<RequestContext>,
    ) -> Result<ExecutionResponse, ExecutionError> {
        validate_operation(&self.schema, operation, self.max_depth)?;

        let root = self
            .schema
            .root(operation.kind)
            .ok_or_else(|| ExecutionError::UnknownOperation(operation.kind.to_string()))?;

        debug!(
            request_id = %request.request_id,
            operation = %operation.kind,
            name = ?operation.name,
            fields = operation.selection.len(),
            "Executing operation"
        );

        let run = Run {
            executor: self,
            request,
        };
        let serial = operation.kind == OperationType::Mutation;
        let (data, errors) = run
            .resolve_selection_set(root, &Value::Null, &operation.selection, &ResponsePath::root(), serial, true)
            .await;

        debug!(errors = errors.len(), "Operation finished");
        Ok(ExecutionResponse::new(data, errors))
    }
}

/// State for one execution.
struct Run<'e> {
    executor: &'e Executor,
    request: Arc<RequestContext>,
}

impl<'e> Run<'e> {
    fn resolve_selection_set<'a>(
        &'a self,
        type_def: &'a TypeDef,
        parent: &'a Value,
        nodes: &'a [SelectionNode],
        path: &'a ResponsePath,
        serial: bool,
        is_root: bool,
    ) -> BoxFuture<'a, Resolved> {
        async move {
            let results: Vec<Resolved> = if serial {
                let mut results = Vec::with_capacity(nodes.len());
                for node in nodes {
                    results.push(self.resolve_field(type_def, parent, node, path, is_root).await);
                }
                results
            } else {
                join_all(
                    nodes
                        .iter()
                        .map(|node| self.resolve_field(type_def, parent, node, path, is_root)),
                )
                .await
            };

            let mut object = Map::with_capacity(nodes.len());
            let mut errors = Vec::new();
            for (node, (value, mut field_errors)) in nodes.iter().zip(results) {
                object.insert(node.response_key().to_string(), value);
                errors.append(&mut field_errors);
            }
            (Value::Object(object), errors)
        }
        .boxed()
    }

    fn resolve_field<'a>(
        &'a self,
        type_def: &'a TypeDef,
        parent: &'a Value,
        node: &'a SelectionNode,
        path: &'a ResponsePath,
        is_root: bool,
    ) -> BoxFuture<'a, Resolved> {
        async move {
            let field_path = path.child(node.response_key());

            let Some(field) = type_def.field_def(&node.name) else {
                let err = ExecutionError::UnknownField {
                    type_name: type_def.name.clone(),
                    field_name: node.name.clone(),
                };
                return (Value::Null, vec![err]);
            };

            let info = FieldInfo {
                type_name: &type_def.name,
                field_name: &field.name,
                path: &field_path,
                is_root,
                request_id: &self.request.request_id,
            };
            for hook in &self.executor.hooks {
                hook.on_field_start(&info);
            }
            let started = Instant::now();

            let ctx = ResolverContext::new(
                parent.clone(),
                node.arguments.clone(),
                field_path.clone(),
                Arc::clone(&self.request),
            );
            let resolved = self
                .executor
                .resolvers
                .resolve(&type_def.name, &field.name, ctx)
                .await;

            let elapsed = started.elapsed();
            for hook in &self.executor.hooks {
                hook.on_field_end(&info, elapsed, resolved.is_err());
            }

            match resolved {
                Ok(value) => {
                    let site = FieldSite {
                        parent_type: &type_def.name,
                        field,
                        node,
                    };
                    self.complete_value(site, &field.ty, value, field_path).await
                }
                Err(err) => (Value::Null, vec![err]),
            }
        }
        .boxed()
    }

    /// Shapes a resolved value according to the field's declared type.
    fn complete_value<'a>(
        &'a self,
        site: FieldSite<'a>,
        ty: &'a TypeRef,
        value: Value,
        path: ResponsePath,
    ) -> BoxFuture<'a, Resolved> {
        async move {
            if value.is_null() {
                return (Value::Null, Vec::new());
            }

            match ty {
                TypeRef::NonNull(inner) => self.complete_value(site, inner, value, path).await,
                TypeRef::List(inner) => {
                    let Value::Array(items) = value else {
                        let err = ExecutionError::ListExpected {
                            type_name: site.parent_type.to_string(),
                            field_name: site.field.name.clone(),
                            path,
                        };
                        return (Value::Null, vec![err]);
                    };

                    let results = join_all(items.into_iter().enumerate().map(|(i, item)| {
                        self.complete_value(site, inner, item, path.index(i))
                    }))
                    .await;

                    let mut list = Vec::with_capacity(results.len());
                    let mut errors = Vec::new();
                    for (item, mut item_errors) in results {
                        list.push(item);
                        errors.append(&mut item_errors);
                    }
                    (Value::Array(list), errors)
                }
                TypeRef::Named(name) => match self.executor.schema.lookup(name) {
                    Ok(def) if def.kind == TypeKind::Object => {
                        self.resolve_selection_set(def, &value, &site.node.children, &path, false, false)
                            .await
                    }
                    Ok(_) => (coerce_leaf(name, value), Vec::new()),
                    Err(_) => (
                        Value::Null,
                        vec![ExecutionError::UnknownType(name.clone())],
                    ),
                },
            }
        }
        .boxed()
    }
}

/// The field being completed, carried down through list wrappers.
#[derive(Clone, Copy)]
struct FieldSite<'a> {
    parent_type: &'a str,
    field: &'a FieldDef,
    node: &'a SelectionNode,
}

/// `ID` values are serialized as strings even when stored as numbers.
fn coerce_leaf(type_name: &str, value: Value) -> Value {
    match value {
        Value::Number(n) if type_name == TypeRef::ID => Value::String(n.to_string()),
        other => other,
    }
}

//! Resolver table keyed by `(type, field)`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{FieldResolver, ResolverContext};
use crate::error::ExecutionError;

/// Maps `(type name, field name)` to a resolver.
///
/// The table is filled at startup and read-only afterwards, so it can be
/// shared across requests without locking.
#[derive(Clone, Default)]
pub struct ResolverTable {
    entries: HashMap<String, HashMap<String, Arc<dyn FieldResolver>>>,
}

impl fmt::Debug for ResolverTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.bindings().map(|(t, n)| format!("{t}.{n}")).collect();
        keys.sort();
        f.debug_struct("ResolverTable").field("bindings", &keys).finish()
    }
}

impl ResolverTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a resolver. A later registration for the same key replaces the
    /// earlier one.
    pub fn register<R>(&mut self, type_name: &str, field_name: &str, resolver: R)
    where
        R: FieldResolver + 'static,
    {
        let replaced = self
            .entries
            .entry(type_name.to_string())
            .or_default()
            .insert(field_name.to_string(), Arc::new(resolver))
            .is_some();
        if replaced {
            debug!(type_name, field_name, "Replaced field resolver");
        }
    }

    #[must_use]
    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&Arc<dyn FieldResolver>> {
        self.entries.get(type_name)?.get(field_name)
    }

    #[must_use]
    pub fn contains(&self, type_name: &str, field_name: &str) -> bool {
        self.get(type_name, field_name).is_some()
    }

    /// Iterates over every bound `(type, field)` key.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(type_name, fields)| {
            fields
                .keys()
                .map(move |field| (type_name.as_str(), field.as_str()))
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves one field.
    ///
    /// Calls the bound resolver if there is one. Otherwise reads the property
    /// named `field_name` off the parent value.
    ///
    /// # Errors
    ///
    /// - `ExecutionError::ResolverExecution` wrapping a resolver failure
    /// - `ExecutionError::MissingDefaultField` if there is no resolver and
    ///   the parent has no such property
    pub async fn resolve(
        &self,
        type_name: &str,
        field_name: &str,
        ctx: ResolverContext,
    ) -> Result<Value, ExecutionError> {
        if let Some(resolver) = self.get(type_name, field_name) {
            let path = ctx.path.clone();
            return resolver
                .resolve(ctx)
                .await
                .map_err(|source| ExecutionError::ResolverExecution {
                    type_name: type_name.to_string(),
                    field_name: field_name.to_string(),
                    path,
                    source,
                });
        }

        match ctx.parent.get(field_name) {
            Some(value) => Ok(value.clone()),
            None => Err(ExecutionError::MissingDefaultField {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
                path: ctx.path,
            }),
        }
    }
}

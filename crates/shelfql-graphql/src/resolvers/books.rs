//! Listing resolvers for `Query.books` and `Query.authors`.

use async_trait::async_trait;
use serde_json::Value;
use shelfql_storage::DynStorage;
use tracing::{debug, warn};

use super::{FieldResolver, ResolverContext, to_value};
use crate::error::ResolverError;

/// Resolver for `Query.books`.
pub struct BooksResolver {
    storage: DynStorage,
}

impl BooksResolver {
    #[must_use]
    pub fn new(storage: DynStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl FieldResolver for BooksResolver {
    async fn resolve(&self, ctx: ResolverContext) -> Result<Value, ResolverError> {
        let books = self.storage.list_books().await.map_err(|e| {
            warn!(error = %e, request_id = %ctx.request_id(), "Storage error listing books");
            ResolverError::from(e)
        })?;

        debug!(count = books.len(), request_id = %ctx.request_id(), "Listed books");
        to_value(&books)
    }
}

/// Resolver for `Query.authors`.
pub struct AuthorsResolver {
    storage: DynStorage,
}

impl AuthorsResolver {
    #[must_use]
    pub fn new(storage: DynStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl FieldResolver for AuthorsResolver {
    async fn resolve(&self, ctx: ResolverContext) -> Result<Value, ResolverError> {
        let authors = self.storage.list_authors().await.map_err(|e| {
            warn!(error = %e, request_id = %ctx.request_id(), "Storage error listing authors");
            ResolverError::from(e)
        })?;

        debug!(count = authors.len(), request_id = %ctx.request_id(), "Listed authors");
        to_value(&authors)
    }
}

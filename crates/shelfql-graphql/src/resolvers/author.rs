//! Author lookups: `Query.author(id:)` and the `Book.author` relation.
//!
//! Both go through `LibraryStorage::author_by_id`, a keyed lookup. An id
//! that matches no author resolves to `null`, never to an error or to the
//! record at some position.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use shelfql_storage::{AuthorId, DynStorage};
use tracing::{debug, warn};

use super::{FieldResolver, ResolverContext, to_value};
use crate::error::ResolverError;

async fn lookup(storage: &DynStorage, id: AuthorId) -> Result<Value, ResolverError> {
    match storage.author_by_id(id).await {
        Ok(Some(author)) => to_value(&author),
        Ok(None) => {
            debug!(author_id = %id, "Author not found");
            Ok(Value::Null)
        }
        Err(e) => {
            warn!(author_id = %id, error = %e, "Storage error reading author");
            Err(e.into())
        }
    }
}

/// Resolver for `Query.author(id: ID!)`.
pub struct AuthorResolver {
    storage: DynStorage,
}

impl AuthorResolver {
    #[must_use]
    pub fn new(storage: DynStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl FieldResolver for AuthorResolver {
    async fn resolve(&self, ctx: ResolverContext) -> Result<Value, ResolverError> {
        let raw = ctx.arguments.id("id")?;
        debug!(id = %raw, request_id = %ctx.request_id(), "Resolving author by id");

        // Negative or non-numeric ids cannot name an author.
        match AuthorId::parse(&raw) {
            Some(id) => lookup(&self.storage, id).await,
            None => Ok(Value::Null),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookRef {
    id: Value,
    #[serde(default)]
    author_id: Option<AuthorId>,
}

/// Resolver for `Book.author`.
pub struct BookAuthorResolver {
    storage: DynStorage,
}

impl BookAuthorResolver {
    #[must_use]
    pub fn new(storage: DynStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl FieldResolver for BookAuthorResolver {
    async fn resolve(&self, ctx: ResolverContext) -> Result<Value, ResolverError> {
        let book: BookRef = ctx.parent_as()?;
        debug!(book_id = %book.id, author_id = ?book.author_id, "Resolving nested author");

        match book.author_id {
            Some(id) => lookup(&self.storage, id).await,
            None => Ok(Value::Null),
        }
    }
}

//! Field resolvers.
//!
//! A resolver turns a parent value plus arguments into a field value. They
//! are bound to `(type, field)` keys in a [`ResolverTable`]; fields without
//! a binding read the same-named property off the parent.
//!
//! - `books`: `Query.books` and `Query.authors` listings
//! - `author`: `Query.author` lookup and the `Book.author` relation
//! - `create`: `Mutation.createBook`

mod author;
mod books;
mod create;
mod table;

pub use author::{AuthorResolver, BookAuthorResolver};
pub use books::{AuthorsResolver, BooksResolver};
pub use create::CreateBookResolver;
pub use table::ResolverTable;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shelfql_storage::DynStorage;

use crate::context::RequestContext;
use crate::error::ResolverError;
use crate::execution::ResponsePath;
use crate::schema::{BOOK, MUTATION, QUERY};
use crate::selection::Arguments;

/// Everything a resolver receives for one field invocation.
#[derive(Debug, Clone)]
pub struct ResolverContext {
    /// Value of the enclosing object, `Value::Null` for root fields.
    pub parent: Value,
    pub arguments: Arguments,
    pub path: ResponsePath,
    pub request: Arc<RequestContext>,
}

impl ResolverContext {
    #[must_use]
    pub fn new(
        parent: Value,
        arguments: Arguments,
        path: ResponsePath,
        request: Arc<RequestContext>,
    ) -> Self {
        Self {
            parent,
            arguments,
            path,
            request,
        }
    }

    /// Decodes the parent value into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `ResolverError::InvalidParent` if the parent does not fit `T`.
    pub fn parent_as<T: DeserializeOwned>(&self) -> Result<T, ResolverError> {
        T::deserialize(&self.parent).map_err(|e| ResolverError::InvalidParent(e.to_string()))
    }

    #[must_use]
    pub fn request_id(&self) -> &str {
        &self.request.request_id
    }
}

/// A function bound to one `(type, field)` key.
#[async_trait]
pub trait FieldResolver: Send + Sync {
    async fn resolve(&self, ctx: ResolverContext) -> Result<Value, ResolverError>;
}

#[async_trait]
impl<F, Fut> FieldResolver for F
where
    F: Fn(ResolverContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ResolverError>> + Send + 'static,
{
    async fn resolve(&self, ctx: ResolverContext) -> Result<Value, ResolverError> {
        self(ctx).await
    }
}

/// Serializes a record into the value tree resolvers return.
pub(crate) fn to_value<T: Serialize>(record: &T) -> Result<Value, ResolverError> {
    Ok(serde_json::to_value(record)?)
}

/// Binds the library resolvers to their fields.
#[must_use]
pub fn library_resolvers(storage: DynStorage) -> ResolverTable {
    let mut table = ResolverTable::new();
    table.register(QUERY, "books", BooksResolver::new(storage.clone()));
    table.register(QUERY, "authors", AuthorsResolver::new(storage.clone()));
    table.register(QUERY, "author", AuthorResolver::new(storage.clone()));
    table.register(BOOK, "author", BookAuthorResolver::new(storage.clone()));
    table.register(MUTATION, "createBook", CreateBookResolver::new(storage));
    table
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn ctx(parent: Value) -> ResolverContext {
        ResolverContext::new(
            parent,
            Arguments::new(),
            ResponsePath::root().child("books"),
            Arc::new(RequestContext::new("req-1")),
        )
    }

    #[tokio::test]
    async fn test_closure_resolver() {
        let resolver = |ctx: ResolverContext| async move {
            Ok::<_, ResolverError>(json!(ctx.request_id().to_string()))
        };
        let value = resolver.resolve(ctx(Value::Null)).await.unwrap();
        assert_eq!(value, json!("req-1"));
    }

    #[test]
    fn test_parent_as() {
        #[derive(Deserialize)]
        struct Parent {
            id: u64,
        }

        let parent: Parent = ctx(json!({"id": 3})).parent_as().unwrap();
        assert_eq!(parent.id, 3);

        let err = ctx(json!("not an object")).parent_as::<Parent>();
        assert!(matches!(err, Err(ResolverError::InvalidParent(_))));
    }
}

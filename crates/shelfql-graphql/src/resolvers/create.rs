//! Create mutation resolver.
//!
//! Handles `createBook(request: BookRequest)`. The request is decoded into a
//! typed [`BookRequest`] and handed to storage; missing request fields are
//! simply absent on the new book.

use async_trait::async_trait;
use serde_json::Value;
use shelfql_storage::{BookRequest, DynStorage};
use tracing::{debug, warn};

use super::{FieldResolver, ResolverContext, to_value};
use crate::error::ResolverError;

/// Resolver for `Mutation.createBook`.
///
/// ```graphql
/// mutation {
///   createBook(request: {title: "X", author: {firstName: "A", lastName: "B"}}) {
///     id
///     title
///     author { firstName }
///   }
/// }
/// ```
pub struct CreateBookResolver {
    storage: DynStorage,
}

impl CreateBookResolver {
    #[must_use]
    pub fn new(storage: DynStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl FieldResolver for CreateBookResolver {
    async fn resolve(&self, ctx: ResolverContext) -> Result<Value, ResolverError> {
        let request: Option<BookRequest> = ctx.arguments.decode("request")?;
        let request = request.unwrap_or_default();

        debug!(
            title = ?request.title,
            with_author = request.author.is_some(),
            request_id = %ctx.request_id(),
            "Processing createBook mutation"
        );

        let book = self.storage.create_book(request).await.map_err(|e| {
            warn!(error = %e, "createBook failed");
            ResolverError::from(e)
        })?;

        debug!(book_id = book.id, author_id = ?book.author_id, "Book created");
        to_value(&book)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use shelfql_db_memory::{InMemoryStorage, SeedData};
    use shelfql_storage::{AuthorId, LibraryStorage};

    use super::*;
    use crate::context::RequestContext;
    use crate::execution::ResponsePath;
    use crate::selection::Arguments;

    fn ctx(arguments: Arguments) -> ResolverContext {
        ResolverContext::new(
            Value::Null,
            arguments,
            ResponsePath::root().child("createBook"),
            Arc::new(RequestContext::new("req-1")),
        )
    }

    fn sample() -> Arc<InMemoryStorage> {
        Arc::new(InMemoryStorage::from_seed(SeedData::sample().unwrap()).unwrap())
    }

    #[tokio::test]
    async fn test_create_book_with_author() {
        let storage = sample();
        let resolver = CreateBookResolver::new(storage.clone());
        let args: Arguments = [(
            "request",
            json!({"title": "X", "author": {"firstName": "A", "lastName": "B"}}),
        )]
        .into_iter()
        .collect();

        let value = resolver.resolve(ctx(args)).await.unwrap();
        assert_eq!(value, json!({"id": 2, "title": "X", "authorId": 2}));

        let author = storage.author_by_id(AuthorId(2)).await.unwrap().unwrap();
        assert_eq!(author.first_name.as_deref(), Some("A"));
        assert_eq!(author.last_name.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_create_book_with_missing_fields() {
        let resolver = CreateBookResolver::new(sample());

        let value = resolver.resolve(ctx(Arguments::new())).await.unwrap();
        assert_eq!(value, json!({"id": 2, "title": null, "authorId": null}));

        let args: Arguments = [("request", json!({"author": {}}))].into_iter().collect();
        let value = resolver.resolve(ctx(args)).await.unwrap();
        assert!(value["title"].is_null());
        assert_eq!(value["authorId"], json!(2));
    }

    #[tokio::test]
    async fn test_create_book_rejects_malformed_request() {
        let resolver = CreateBookResolver::new(sample());
        let args: Arguments = [("request", json!({"title": 5}))].into_iter().collect();
        let err = resolver.resolve(ctx(args)).await.unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArgument { ref name, .. } if name == "request"));
    }
}

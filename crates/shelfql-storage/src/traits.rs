//! Storage traits for the library data access layer.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::{Author, AuthorId, Book, BookRequest};

/// The contract every library storage backend implements.
///
/// Resolvers depend only on this trait, never on the storage mechanism.
/// Implementations must be thread-safe (`Send + Sync`) and must make writes
/// atomic with respect to concurrent readers.
///
/// # Example
///
/// ```ignore
/// use shelfql_storage::{AuthorId, LibraryStorage};
///
/// async fn author_name(storage: &dyn LibraryStorage, id: AuthorId) -> Option<String> {
///     storage
///         .author_by_id(id)
///         .await
///         .ok()
///         .flatten()
///         .and_then(|author| author.first_name)
/// }
/// ```
#[async_trait]
pub trait LibraryStorage: Send + Sync {
    /// Returns every book in insertion order.
    async fn list_books(&self) -> Result<Vec<Book>, StorageError>;

    /// Returns every author in insertion order.
    async fn list_authors(&self) -> Result<Vec<Author>, StorageError>;

    /// Looks an author up by its store key.
    ///
    /// Returns `None` if no author has this id.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing authors.
    async fn author_by_id(&self, id: AuthorId) -> Result<Option<Author>, StorageError>;

    /// Creates a book from a request and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRequest` if the request cannot be stored.
    async fn create_book(&self, request: BookRequest) -> Result<Book, StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use shelfql_storage::{
    Author, AuthorId, AuthorRequest, Book, BookRequest, LibraryStorage, StorageError,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::seed::SeedData;

/// Collections owned by the in-memory backend.
///
/// Books keep insertion order in a `Vec`; authors are keyed by [`AuthorId`]
/// in an `IndexMap`, so lookups never depend on a record's position.
#[derive(Debug, Default)]
struct Library {
    books: Vec<Book>,
    authors: IndexMap<AuthorId, Author>,
    next_book_id: u64,
    next_author_id: u64,
}

impl Library {
    fn from_records(authors: Vec<Author>, books: Vec<Book>) -> Result<Self, StorageError> {
        let next_author_id = match authors.iter().map(|a| a.id.0).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| StorageError::invalid_seed("author id space exhausted"))?,
            None => 0,
        };
        let next_book_id = match books.iter().map(|b| b.id).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| StorageError::invalid_seed("book id space exhausted"))?,
            None => 0,
        };
        Ok(Self {
            books,
            authors: authors.into_iter().map(|a| (a.id, a)).collect(),
            next_book_id,
            next_author_id,
        })
    }

    /// Stores a book and, when requested, its new author. Both ids are
    /// reserved before anything is written, so a failure leaves no trace.
    fn insert(
        &mut self,
        title: Option<String>,
        author: Option<AuthorRequest>,
    ) -> Result<Book, StorageError> {
        let next_book_id = self
            .next_book_id
            .checked_add(1)
            .ok_or_else(|| StorageError::internal("book id space exhausted"))?;
        let next_author_id = if author.is_some() {
            self.next_author_id
                .checked_add(1)
                .ok_or_else(|| StorageError::internal("author id space exhausted"))?
        } else {
            self.next_author_id
        };

        let author_id = author.map(|request| {
            let id = AuthorId(self.next_author_id);
            self.authors.insert(
                id,
                Author {
                    id,
                    user_id: id.0,
                    first_name: request.first_name,
                    last_name: request.last_name,
                },
            );
            id
        });
        let book = Book {
            id: self.next_book_id,
            title,
            author_id,
        };
        self.books.push(book.clone());
        self.next_book_id = next_book_id;
        self.next_author_id = next_author_id;
        Ok(book)
    }
}

/// In-memory library storage backend.
///
/// This storage implementation provides:
/// - Insertion-ordered listing of books and authors
/// - Identifier-keyed author lookup
/// - Book creation with an optional new author, applied under one write lock
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<Library>>,
}

impl InMemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage filled with the given seed data.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidSeed` for duplicate ids, dangling
    /// author references, or an id of `u64::MAX` that leaves no room for
    /// new records.
    pub fn from_seed(seed: SeedData) -> Result<Self, StorageError> {
        let (authors, books) = seed.into_records()?;
        debug!(
            authors = authors.len(),
            books = books.len(),
            "Seeding in-memory library"
        );
        Ok(Self {
            data: Arc::new(RwLock::new(Library::from_records(authors, books)?)),
        })
    }

    /// Returns the number of stored books.
    pub async fn book_count(&self) -> usize {
        self.data.read().await.books.len()
    }

    /// Returns the number of stored authors.
    pub async fn author_count(&self) -> usize {
        self.data.read().await.authors.len()
    }
}

#[async_trait]
impl LibraryStorage for InMemoryStorage {
    async fn list_books(&self) -> Result<Vec<Book>, StorageError> {
        Ok(self.data.read().await.books.clone())
    }

    async fn list_authors(&self) -> Result<Vec<Author>, StorageError> {
        Ok(self.data.read().await.authors.values().cloned().collect())
    }

    async fn author_by_id(&self, id: AuthorId) -> Result<Option<Author>, StorageError> {
        Ok(self.data.read().await.authors.get(&id).cloned())
    }

    async fn create_book(&self, request: BookRequest) -> Result<Book, StorageError> {
        let BookRequest { title, author } = request;
        let mut library = self.data.write().await;
        let book = library.insert(title, author)?;
        debug!(book.id = book.id, author.id = ?book.author_id, "Book created");
        Ok(book)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_storage() -> InMemoryStorage {
        InMemoryStorage::from_seed(SeedData::sample().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_listing_preserves_seed_order() {
        let storage = sample_storage();

        let books = storage.list_books().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title.as_deref(), Some("Gang of Four"));
        assert_eq!(books[1].title.as_deref(), Some("Typescript the best"));

        let authors = storage.list_authors().await.unwrap();
        let names: Vec<_> = authors
            .iter()
            .map(|a| a.first_name.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, ["Aayush", "Pranav"]);
    }

    #[tokio::test]
    async fn test_author_by_id() {
        let storage = sample_storage();

        let author = storage.author_by_id(AuthorId(1)).await.unwrap().unwrap();
        assert_eq!(author.user_id, 78);
        assert_eq!(author.first_name.as_deref(), Some("Pranav"));
    }

    #[tokio::test]
    async fn test_author_by_id_out_of_range_is_none() {
        let storage = sample_storage();

        assert!(storage.author_by_id(AuthorId(2)).await.unwrap().is_none());
        assert!(storage.author_by_id(AuthorId(99)).await.unwrap().is_none());
        assert!(
            storage
                .author_by_id(AuthorId(u64::MAX))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_seed_with_max_id_is_rejected() {
        let seed = SeedData::from_json_str(
            r#"{"authors": [{"id": 0, "userId": 1}, {"id": 18446744073709551615, "userId": 2}]}"#,
        )
        .unwrap();
        let err = InMemoryStorage::from_seed(seed).unwrap_err();
        assert!(matches!(err, StorageError::InvalidSeed { .. }));
        assert!(err.to_string().contains("author id space exhausted"));

        let seed =
            SeedData::from_json_str(r#"{"books": [{"id": 18446744073709551615}]}"#).unwrap();
        assert!(InMemoryStorage::from_seed(seed).is_err());
    }

    #[tokio::test]
    async fn test_create_book_when_ids_run_out() {
        let seed = SeedData::from_json_str(
            r#"{"authors": [{"id": 18446744073709551614, "userId": 1}],
                "books": [{"id": 3}]}"#,
        )
        .unwrap();
        let storage = InMemoryStorage::from_seed(seed).unwrap();

        let request = BookRequest {
            title: Some("Last".into()),
            author: Some(AuthorRequest::default()),
        };
        let err = storage.create_book(request).await.unwrap_err();
        assert!(matches!(err, StorageError::Internal { .. }));
        // Nothing was written by the failed call
        assert_eq!(storage.book_count().await, 1);
        assert_eq!(storage.author_count().await, 1);

        // Books without an author still fit
        let book = storage.create_book(BookRequest::default()).await.unwrap();
        assert_eq!(book.id, 4);
        assert!(book.author_id.is_none());
    }

    #[tokio::test]
    async fn test_author_lookup_uses_key_not_position() {
        let seed = SeedData::from_json_str(
            r#"{"authors": [
                {"id": 10, "userId": 1, "firstName": "Ten"},
                {"id": 0, "userId": 2, "firstName": "Zero"}
            ]}"#,
        )
        .unwrap();
        let storage = InMemoryStorage::from_seed(seed).unwrap();

        let zero = storage.author_by_id(AuthorId(0)).await.unwrap().unwrap();
        assert_eq!(zero.first_name.as_deref(), Some("Zero"));
        assert!(storage.author_by_id(AuthorId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_book_without_author() {
        let storage = sample_storage();

        let book = storage.create_book(BookRequest::titled("X")).await.unwrap();
        assert_eq!(book.id, 2);
        assert_eq!(book.title.as_deref(), Some("X"));
        assert!(book.author_id.is_none());
        assert_eq!(storage.book_count().await, 3);
        assert_eq!(storage.author_count().await, 2);
    }

    #[tokio::test]
    async fn test_create_book_with_author() {
        let storage = sample_storage();

        let request = BookRequest::titled("X").with_author(Some("A"), Some("B"));
        let book = storage.create_book(request).await.unwrap();
        let author_id = book.author_id.unwrap();

        let author = storage.author_by_id(author_id).await.unwrap().unwrap();
        assert_eq!(author.first_name.as_deref(), Some("A"));
        assert_eq!(author.last_name.as_deref(), Some("B"));
        assert_eq!(storage.author_count().await, 3);
    }

    #[tokio::test]
    async fn test_create_book_with_partial_author() {
        let storage = InMemoryStorage::new();

        let request = BookRequest::default().with_author(None, Some("B"));
        let book = storage.create_book(request).await.unwrap();
        assert_eq!(book.id, 0);
        assert!(book.title.is_none());

        let author = storage
            .author_by_id(book.author_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(author.first_name.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let storage = sample_storage();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .create_book(BookRequest::titled(format!("Book {i}")).with_author(
                            Some("First"),
                            Some("Last"),
                        ))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            let book = handle.await.unwrap();
            let author = storage.author_by_id(book.author_id.unwrap()).await.unwrap();
            assert!(author.is_some());
            ids.push(book.id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(storage.book_count().await, 18);
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(InMemoryStorage::new().backend_name(), "memory");
    }
}

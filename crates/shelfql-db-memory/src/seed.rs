//! Seed data for the in-memory backend.
//!
//! Seed files are JSON documents with an `authors` and a `books` array. Books
//! reference authors through `authorId`, which must name a seeded author.
//!
//! ```json
//! {
//!   "authors": [{ "id": 0, "userId": 52, "firstName": "Aayush", "lastName": "Vyas" }],
//!   "books": [{ "id": 0, "title": "Gang of Four", "authorId": 0 }]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shelfql_storage::{Author, AuthorId, Book, StorageError};

const SAMPLE_LIBRARY: &str = include_str!("../seed/library.json");

/// A seeded author.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedAuthor {
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// A seeded book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedBook {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_id: Option<u64>,
}

/// Initial content of a library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub authors: Vec<SeedAuthor>,
    #[serde(default)]
    pub books: Vec<SeedBook>,
}

impl SeedData {
    /// Returns the bundled sample library (two authors, two books).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidSeed` if the bundled file does not parse.
    pub fn sample() -> Result<Self, StorageError> {
        Self::from_json_str(SAMPLE_LIBRARY)
    }

    /// Parses seed data from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidSeed` on malformed JSON.
    pub fn from_json_str(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|e| StorageError::invalid_seed(e.to_string()))
    }

    /// Reads seed data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidSeed` if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StorageError::invalid_seed(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Checks identities and references, returning the records to store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidSeed` for duplicate ids or a book whose
    /// `authorId` names no seeded author.
    pub(crate) fn into_records(self) -> Result<(Vec<Author>, Vec<Book>), StorageError> {
        let mut author_ids = HashSet::with_capacity(self.authors.len());
        let mut authors: Vec<Author> = Vec::with_capacity(self.authors.len());
        for seeded in self.authors {
            let id = AuthorId(seeded.id);
            if !author_ids.insert(id) {
                return Err(StorageError::invalid_seed(format!(
                    "duplicate author id {id}"
                )));
            }
            authors.push(Author {
                id,
                user_id: seeded.user_id,
                first_name: seeded.first_name,
                last_name: seeded.last_name,
            });
        }

        let mut book_ids = HashSet::with_capacity(self.books.len());
        let mut books: Vec<Book> = Vec::with_capacity(self.books.len());
        for seeded in self.books {
            if !book_ids.insert(seeded.id) {
                return Err(StorageError::invalid_seed(format!(
                    "duplicate book id {}",
                    seeded.id
                )));
            }
            let author_id = seeded.author_id.map(AuthorId);
            if let Some(author_id) = author_id {
                if !author_ids.contains(&author_id) {
                    return Err(StorageError::invalid_seed(format!(
                        "book {} references unknown author {author_id}",
                        seeded.id
                    )));
                }
            }
            books.push(Book {
                id: seeded.id,
                title: seeded.title,
                author_id,
            });
        }

        Ok((authors, books))
    }
}

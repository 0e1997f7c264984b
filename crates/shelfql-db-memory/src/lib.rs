//! In-memory library storage backend for the shelfql server.
//!
//! This crate provides an in-memory implementation of the `LibraryStorage`
//! trait from `shelfql-storage`, guarded by a tokio `RwLock` so that writes
//! are serialized and readers never observe a half-written record.
//!
//! # Example
//!
//! ```ignore
//! use shelfql_db_memory::{InMemoryStorage, SeedData};
//! use shelfql_storage::{BookRequest, LibraryStorage};
//!
//! let storage = InMemoryStorage::from_seed(SeedData::sample()?)?;
//! let created = storage.create_book(BookRequest::titled("Dune")).await?;
//! ```

pub mod seed;
pub mod storage;

pub use seed::{SeedAuthor, SeedBook, SeedData};
pub use shelfql_storage::{LibraryStorage, StorageError};
pub use storage::InMemoryStorage;

/// Type alias for a shareable storage instance.
pub type DynLibraryStorage = std::sync::Arc<dyn LibraryStorage>;

/// Creates an in-memory storage filled with the bundled sample library.
///
/// # Errors
///
/// Returns `StorageError::InvalidSeed` if the bundled seed is malformed.
pub fn create_sample_storage() -> Result<DynLibraryStorage, StorageError> {
    let storage = InMemoryStorage::from_seed(SeedData::sample()?)?;
    Ok(std::sync::Arc::new(storage))
}

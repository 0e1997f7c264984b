//! # shelfql-storage
//!
//! Data access layer for the shelfql library server.
//!
//! This crate defines the [`LibraryStorage`] trait and the records it deals
//! in. It does not contain any implementations - those are provided by
//! separate crates.
//!
//! ## Storage Backends
//!
//! ```ignore
//! use async_trait::async_trait;
//! use shelfql_storage::{LibraryStorage, StorageError, Book};
//!
//! struct MyStorage {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl LibraryStorage for MyStorage {
//!     async fn list_books(&self) -> Result<Vec<Book>, StorageError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::LibraryStorage;
pub use types::{Author, AuthorId, AuthorRequest, Book, BookRequest};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStorage = std::sync::Arc<dyn LibraryStorage>;

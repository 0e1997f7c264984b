//! Entity and input records for the library data access layer.
//!
//! Records serialize with camelCase keys, which is the shape the GraphQL
//! layer reads fields from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store key of an [`Author`].
///
/// This is the identity a [`Book`] uses to reference its author. It is
/// unrelated to [`Author::user_id`] and to any position inside a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub u64);

impl AuthorId {
    /// Parses an identifier received from a client.
    ///
    /// Accepts non-negative integers only; anything else has no author.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().map(Self)
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AuthorId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// An author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Store key.
    pub id: AuthorId,
    /// External user identifier.
    pub user_id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A book record.
///
/// The book does not own its author; it holds the author's [`AuthorId`] and
/// the storage resolves the relation on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    pub title: Option<String>,
    pub author_id: Option<AuthorId>,
}

/// Author part of a [`BookRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Input for creating a book.
///
/// Every field is optional; a request with no author produces a book
/// without an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<AuthorRequest>,
}

impl BookRequest {
    /// Creates a request with only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author: None,
        }
    }

    /// Sets the author part of the request.
    #[must_use]
    pub fn with_author(mut self, first_name: Option<&str>, last_name: Option<&str>) -> Self {
        self.author = Some(AuthorRequest {
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_author_id_parse() {
        assert_eq!(AuthorId::parse("1"), Some(AuthorId(1)));
        assert_eq!(AuthorId::parse(" 42 "), Some(AuthorId(42)));
        assert_eq!(AuthorId::parse("-1"), None);
        assert_eq!(AuthorId::parse("abc"), None);
    }

    #[test]
    fn test_book_serializes_camel_case() {
        let book = Book {
            id: 3,
            title: Some("Dune".into()),
            author_id: Some(AuthorId(1)),
        };
        assert_eq!(
            serde_json::to_value(&book).unwrap(),
            json!({"id": 3, "title": "Dune", "authorId": 1})
        );
    }

    #[test]
    fn test_book_request_missing_fields() {
        let request: BookRequest = serde_json::from_value(json!({"title": "X"})).unwrap();
        assert_eq!(request.title.as_deref(), Some("X"));
        assert!(request.author.is_none());

        let request: BookRequest =
            serde_json::from_value(json!({"author": {"firstName": "A"}})).unwrap();
        assert!(request.title.is_none());
        let author = request.author.unwrap();
        assert_eq!(author.first_name.as_deref(), Some("A"));
        assert!(author.last_name.is_none());
    }
}

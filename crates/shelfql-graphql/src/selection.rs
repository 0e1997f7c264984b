//! Request model: operations, selection trees and arguments.
//!
//! Selection trees are built fresh for each request, either by the
//! [`parser`](crate::parser) or directly by callers, and dropped once the
//! response is produced.

use std::fmt;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ResolverError;

/// Kind of root operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
}

impl OperationType {
    /// Conventional name of the root type for this operation.
    #[must_use]
    pub const fn root_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// Literal argument values keyed by argument name, in the order given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(IndexMap<String, Value>);

impl Arguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Reads an `ID` argument. GraphQL accepts both strings and integers for
    /// `ID`, so both are normalised to a string.
    ///
    /// # Errors
    ///
    /// Returns `ResolverError::InvalidArgument` if the argument is missing
    /// or has another shape.
    pub fn id(&self, name: &str) -> Result<String, ResolverError> {
        match self.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(ResolverError::invalid_argument(
                name,
                format!("expected an ID, got {other}"),
            )),
            None => Err(ResolverError::invalid_argument(name, "argument is required")),
        }
    }

    /// Reads an optional string argument.
    ///
    /// # Errors
    ///
    /// Returns `ResolverError::InvalidArgument` if the value is not a string.
    pub fn string(&self, name: &str) -> Result<Option<&str>, ResolverError> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(ResolverError::invalid_argument(
                name,
                format!("expected a string, got {other}"),
            )),
        }
    }

    /// Decodes an argument into a typed value. A missing argument decodes
    /// as JSON `null`, so `Option<T>` and `#[serde(default)]` types work.
    ///
    /// # Errors
    ///
    /// Returns `ResolverError::InvalidArgument` if the value does not fit `T`.
    pub fn decode<T: DeserializeOwned>(&self, name: &str) -> Result<T, ResolverError> {
        let value = self.get(name).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
            .map_err(|e| ResolverError::invalid_argument(name, e.to_string()))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One requested field.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionNode {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: Arguments,
    pub children: Vec<SelectionNode>,
}

impl SelectionNode {
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: Arguments::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name, value);
        self
    }

    #[must_use]
    pub fn child(mut self, child: SelectionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Adds scalar children by name.
    #[must_use]
    pub fn children<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children
            .extend(names.into_iter().map(SelectionNode::field));
        self
    }

    /// Key under which this field appears in the response.
    #[must_use]
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Nesting depth, counting this node as 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// A single executable operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationType,
    pub name: Option<String>,
    pub selection: Vec<SelectionNode>,
}

impl Operation {
    #[must_use]
    pub fn query(selection: Vec<SelectionNode>) -> Self {
        Self {
            kind: OperationType::Query,
            name: None,
            selection,
        }
    }

    #[must_use]
    pub fn mutation(selection: Vec<SelectionNode>) -> Self {
        Self {
            kind: OperationType::Mutation,
            name: None,
            selection,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Depth of the deepest selection path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.selection
            .iter()
            .map(SelectionNode::depth)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_response_key_prefers_alias() {
        let node = SelectionNode::field("books");
        assert_eq!(node.response_key(), "books");
        assert_eq!(node.alias("shelf").response_key(), "shelf");
    }

    #[test]
    fn test_depth() {
        let op = Operation::query(vec![
            SelectionNode::field("books")
                .children(["id"])
                .child(SelectionNode::field("author").children(["firstName"])),
            SelectionNode::field("authors").children(["userId"]),
        ]);
        assert_eq!(op.depth(), 3);
        assert_eq!(Operation::query(vec![]).depth(), 0);
    }

    #[test]
    fn test_id_accepts_string_and_number() {
        let args: Arguments = [("a", json!("7")), ("b", json!(7)), ("c", json!(true))]
            .into_iter()
            .collect();
        assert_eq!(args.id("a").unwrap(), "7");
        assert_eq!(args.id("b").unwrap(), "7");
        assert!(matches!(
            args.id("c"),
            Err(ResolverError::InvalidArgument { .. })
        ));
        assert!(args.id("missing").is_err());
    }

    #[test]
    fn test_string_argument() {
        let args: Arguments = [("title", json!("X")), ("n", json!(1))].into_iter().collect();
        assert_eq!(args.string("title").unwrap(), Some("X"));
        assert_eq!(args.string("missing").unwrap(), None);
        assert!(args.string("n").is_err());
    }

    #[test]
    fn test_decode() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Request {
            title: Option<String>,
        }

        let args: Arguments = [("request", json!({"title": "X"}))].into_iter().collect();
        let decoded: Request = args.decode("request").unwrap();
        assert_eq!(decoded.title.as_deref(), Some("X"));

        let missing: Option<Request> = args.decode("other").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_operation_type_root_names() {
        assert_eq!(OperationType::Query.root_name(), "Query");
        assert_eq!(OperationType::Mutation.root_name(), "Mutation");
        assert_eq!(OperationType::Mutation.to_string(), "mutation");
    }
}

//! Response paths and execution results.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::ExecutionError;

/// One step of a response path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a value in the response, e.g. `books.0.author`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponsePath(Vec<PathSegment>);

impl ResponsePath {
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a field below this one.
    #[must_use]
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(key.into()));
        Self(segments)
    }

    /// Path of a list element below this one.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Field(name) => f.write_str(name)?,
                PathSegment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

/// Serialized form of an error in the `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<ResponsePath>,
    pub extensions: ErrorExtensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorExtensions {
    pub code: &'static str,
}

impl From<&ExecutionError> for FieldError {
    fn from(err: &ExecutionError) -> Self {
        Self {
            message: err.to_string(),
            path: err.path().cloned(),
            extensions: ErrorExtensions {
                code: err.error_code(),
            },
        }
    }
}

/// Result of executing one operation.
///
/// `data` holds the assembled result tree, with `null` in place of every
/// field that failed. `errors` lists those failures in the order they were
/// recorded.
#[derive(Debug)]
pub struct ExecutionResponse {
    pub data: Value,
    pub errors: Vec<ExecutionError>,
}

impl ExecutionResponse {
    #[must_use]
    pub fn new(data: Value, errors: Vec<ExecutionError>) -> Self {
        Self { data, errors }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Serializable view of the recorded errors.
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.errors.iter().map(FieldError::from).collect()
    }

    /// Collapses the response into whole-request success or failure: the
    /// data when no field failed, the first error otherwise.
    ///
    /// # Errors
    ///
    /// Returns the first recorded field error.
    pub fn into_result(self) -> Result<Value, ExecutionError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }
}

//! Type system definitions: type references, types, fields and arguments.
//!
//! Definitions are plain values built once at startup and never mutated
//! after the schema is finished.

use std::fmt;

/// Reference to a type from a field or argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A named type (`Book`).
    Named(String),
    /// A non-null wrapper (`ID!`).
    NonNull(Box<TypeRef>),
    /// A list wrapper (`[Book]`).
    List(Box<TypeRef>),
}

impl TypeRef {
    pub const ID: &'static str = "ID";
    pub const STRING: &'static str = "String";
    pub const INT: &'static str = "Int";
    pub const FLOAT: &'static str = "Float";
    pub const BOOLEAN: &'static str = "Boolean";

    /// `Name`
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// `Name!`
    #[must_use]
    pub fn named_nn(name: impl Into<String>) -> Self {
        Self::NonNull(Box::new(Self::named(name)))
    }

    /// `[Name]`
    #[must_use]
    pub fn named_list(name: impl Into<String>) -> Self {
        Self::List(Box::new(Self::named(name)))
    }

    /// `[Name!]!`
    #[must_use]
    pub fn named_nn_list_nn(name: impl Into<String>) -> Self {
        Self::NonNull(Box::new(Self::List(Box::new(Self::named_nn(name)))))
    }

    /// Name of the innermost named type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::NonNull(inner) | Self::List(inner) => inner.type_name(),
        }
    }

    /// Returns true for `T!`.
    #[must_use]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns true for `[T]` and `[T]!`.
    #[must_use]
    pub fn is_list(&self) -> bool {
        match self {
            Self::List(_) => true,
            Self::NonNull(inner) => inner.is_list(),
            Self::Named(_) => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
            Self::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

/// Kind of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Output type with resolvable fields.
    Object,
    /// Input object accepted as an argument value.
    Input,
    /// Leaf value.
    Scalar,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "OBJECT"),
            Self::Input => write!(f, "INPUT_OBJECT"),
            Self::Scalar => write!(f, "SCALAR"),
        }
    }
}

/// Argument accepted by a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
}

impl ArgumentDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Field of an object or input type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub arguments: Vec<ArgumentDef>,
    pub description: Option<String>,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
            description: None,
        }
    }

    /// Adds an argument.
    #[must_use]
    pub fn argument(mut self, argument: ArgumentDef) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Looks up a declared argument.
    #[must_use]
    pub fn argument_def(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

/// A named type definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    pub fields: Vec<FieldDef>,
    pub description: Option<String>,
}

impl TypeDef {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
            description: None,
        }
    }

    /// Creates an object type.
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Object)
    }

    /// Creates an input object type.
    #[must_use]
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Input)
    }

    /// Creates a scalar type.
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Scalar)
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Looks up a declared field.
    #[must_use]
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        self.kind == TypeKind::Object
    }
}

//! # Script Value Model
//!
//! The closed set of values a script can compute with, and their types.
//!
//! Assignability is type equality: an `Int` is never accepted where a
//! `String` is declared, and an object handle is only accepted where its
//! exact `TypeName` is declared. There is no subtyping and no coercion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::TypeName;

/// Declared type of a property, parameter, or restricted-function result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// UTF-8 string.
    String,
    /// Signed 64-bit integer.
    Int,
    /// `true` / `false`.
    Boolean,
    /// The result of a function that produces nothing.
    Unit,
    /// An opaque host object of the named type. When the name is also a
    /// capability surface in the schema, a property of this type is a
    /// navigable sub-receiver rather than a plain value.
    Object(TypeName),
}

impl ValueType {
    /// Whether a value of type `actual` may be stored where `self` is declared.
    pub fn accepts(&self, actual: &ValueType) -> bool {
        self == actual
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("String"),
            Self::Int => f.write_str("Int"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Unit => f.write_str("Unit"),
            Self::Object(name) => write!(f, "{name}"),
        }
    }
}

/// Opaque handle to a host object, e.g. a dependency on project `:core`.
///
/// The evaluator never looks inside `key`; only host code interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Type of the referenced object.
    pub type_name: TypeName,
    /// Host-defined key identifying the object.
    pub key: String,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.type_name, self.key)
    }
}

/// A runtime script value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// String value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// No value.
    Unit,
    /// Host object handle.
    Object(ObjectRef),
}

impl Value {
    /// The type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Str(_) => ValueType::String,
            Self::Int(_) => ValueType::Int,
            Self::Bool(_) => ValueType::Boolean,
            Self::Unit => ValueType::Unit,
            Self::Object(obj) => ValueType::Object(obj.type_name.clone()),
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the object handle, if this is an object.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Unit => f.write_str("Unit"),
            Self::Object(obj) => write!(f, "{obj}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Self::Object(value)
    }
}

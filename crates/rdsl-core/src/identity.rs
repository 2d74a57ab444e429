//! # Name Newtypes
//!
//! `TypeName` names a receiver or value type (`Settings`,
//! `ProjectDependency`). `Identifier` names a member a script may use
//! (`include`, `rootProject`). Keeping them apart means a surface table
//! cannot accidentally key a property by a type name or vice versa.
//!
//! Both are validated against `[A-Za-z_][A-Za-z0-9_]*`, the identifier
//! grammar of the script language, so every declared name is also a name a
//! script can spell.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

fn validate(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
    let mut chars = value.chars();
    let first = chars.next().ok_or(IdentifierError::Empty { kind })?;
    let head_ok = first.is_ascii_alphabetic() || first == '_';
    let tail_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if head_ok && tail_ok {
        Ok(())
    } else {
        Err(IdentifierError::InvalidCharacters {
            kind,
            value: value.to_string(),
        })
    }
}

/// Name of a receiver type or an opaque value type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(String);

impl TypeName {
    /// Validate and wrap a type name.
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        let name = name.into();
        validate("type name", &name)?;
        Ok(Self(name))
    }

    /// Access the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TypeName {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.0
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Name of a property or function on a capability surface.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate and wrap a member identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        let name = name.into();
        validate("identifier", &name)?;
        Ok(Self(name))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(TypeName::new("Settings").is_ok());
        assert!(TypeName::new("_Internal2").is_ok());
        assert!(Identifier::new("androidTestImplementation").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            Identifier::new(""),
            Err(IdentifierError::Empty { kind: "identifier" })
        );
    }

    #[test]
    fn rejects_leading_digit_and_punctuation() {
        assert!(TypeName::new("9Lives").is_err());
        assert!(Identifier::new("foo-bar").is_err());
        assert!(Identifier::new("a.b").is_err());
        assert!(Identifier::new("café").is_err());
    }

    #[test]
    fn serde_rejects_invalid_names() {
        let ok: TypeName = serde_json::from_str("\"Deps\"").unwrap();
        assert_eq!(ok, "Deps");
        assert!(serde_json::from_str::<TypeName>("\"not valid\"").is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut names = vec![
            TypeName::new("b").unwrap(),
            TypeName::new("A").unwrap(),
            TypeName::new("a").unwrap(),
        ];
        names.sort();
        let rendered: Vec<&str> = names.iter().map(TypeName::as_str).collect();
        assert_eq!(rendered, ["A", "a", "b"]);
    }
}

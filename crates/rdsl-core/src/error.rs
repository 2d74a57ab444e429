//! # Error Types — Structured Error Hierarchy
//!
//! Error types shared by every layer. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Identifier errors carry the rejected text and the rule it broke.
//! - Host errors are raised by host-side receivers and restricted function
//!   services. The evaluator turns them into a structured `HostRejected`
//!   reason; they never escape as panics.
//! - Expected script rejections are NOT errors at this level. They are
//!   values of the evaluator's closed reason taxonomy.

use thiserror::Error;

/// Top-level error type for operations outside script evaluation proper.
#[derive(Error, Debug)]
pub enum RdslError {
    /// A name failed identifier validation.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    /// A script context name did not match any known context.
    #[error("unknown script context: {0:?}")]
    UnknownContext(String),

    /// A host receiver or service rejected an operation.
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A name that cannot be used as a type name or member identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The name was empty.
    #[error("{kind} must not be empty")]
    Empty {
        /// What the name was meant to be ("type name", "identifier").
        kind: &'static str,
    },

    /// The name contained a character outside `[A-Za-z0-9_]`, or started
    /// with a digit.
    #[error("{kind} {value:?} must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidCharacters {
        /// What the name was meant to be.
        kind: &'static str,
        /// The rejected text.
        value: String,
    },
}

/// Failure raised by host code bound to a script: a receiver instance or a
/// restricted function service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The receiver does not implement an operation the schema declared.
    /// This means the surface table and the host model have drifted.
    #[error("receiver {receiver} does not support {operation}")]
    Unsupported {
        /// Receiver type name.
        receiver: String,
        /// Operation name (property or function).
        operation: String,
    },

    /// An argument was well-typed but semantically invalid
    /// (e.g. a project path without a leading `:`).
    #[error("invalid argument for {operation}: {reason}")]
    InvalidArgument {
        /// Operation name.
        operation: String,
        /// Why the argument was rejected.
        reason: String,
    },

    /// Any other host-side refusal.
    #[error("{0}")]
    Rejected(String),
}

impl HostError {
    /// Shorthand for [`HostError::Unsupported`].
    pub fn unsupported(receiver: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Unsupported {
            receiver: receiver.into(),
            operation: operation.into(),
        }
    }

    /// Shorthand for [`HostError::InvalidArgument`].
    pub fn invalid_argument(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_error_display_names_receiver_and_operation() {
        let err = HostError::unsupported("Settings", "include");
        assert_eq!(err.to_string(), "receiver Settings does not support include");
    }

    #[test]
    fn identifier_error_converts_into_top_level() {
        let err: RdslError = IdentifierError::Empty { kind: "type name" }.into();
        assert!(matches!(err, RdslError::InvalidIdentifier(_)));
        assert!(err.to_string().contains("must not be empty"));
    }
}

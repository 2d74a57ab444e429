//! # Schema Build Errors
//!
//! Everything that can be wrong with a set of capability surface
//! declarations. These are startup errors: they describe a broken host
//! build, never a bad script, and are raised when a catalog or registry is
//! constructed.

use rdsl_core::IdentifierError;
use thiserror::Error;

use crate::surface::Namespace;

/// A capability declaration that cannot produce a sound schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaBuildError {
    /// A declared name is not a valid identifier.
    #[error("invalid declaration name: {0}")]
    InvalidName(#[from] IdentifierError),

    /// Two surfaces were declared for the same receiver type.
    #[error("surface {type_name} is declared more than once")]
    DuplicateSurface {
        /// The receiver type declared twice.
        type_name: String,
    },

    /// A member name occurs twice in one namespace of one surface.
    #[error("surface {receiver} declares {namespace} {name:?} more than once")]
    DuplicateMember {
        /// Receiver type.
        receiver: String,
        /// Namespace the collision happened in.
        namespace: Namespace,
        /// The colliding name.
        name: String,
    },

    /// A context allowlist names a receiver type no surface declares.
    #[error("allowlist of {top_level} names undeclared surface {type_name}")]
    UnknownSurface {
        /// Top-level receiver of the offending binding.
        top_level: String,
        /// The undeclared type.
        type_name: String,
    },

    /// A context's top-level receiver is missing from its own allowlist.
    #[error("top-level receiver {top_level} is not in its own allowlist")]
    TopLevelNotAllowed {
        /// The top-level receiver type.
        top_level: String,
    },

    /// A configuring target, adding element type, or navigable property
    /// points at a surface outside the allowlist.
    #[error("{receiver}.{member} targets {target}, which is not in the allowlist of {top_level}")]
    DanglingTarget {
        /// Top-level receiver of the offending binding.
        top_level: String,
        /// Receiver declaring the member.
        receiver: String,
        /// The member whose target dangles.
        member: String,
        /// The unreachable target type.
        target: String,
    },

    /// A binding was registered for `UnknownScript`, which never has a schema.
    #[error("the unknown-script context cannot be bound to a schema")]
    UnknownScriptBinding,
}

//! # Evaluation Result
//!
//! The closed outcome of evaluating one script. Expected rejections are
//! values of [`NotEvaluatedReason`], never panics and never `Err` from the
//! evaluator; callers branch on the cause with an exhaustive `match`.

use serde::Serialize;
use thiserror::Error;

use crate::ast::Location;

/// Why a script was not evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotEvaluatedReason {
    /// The script's context has no analysis schema.
    #[error("no restricted schema applies to this script")]
    NoApplicableSchema,

    /// The script text does not parse.
    #[error("syntax error at {location}: {message}")]
    SyntaxError { location: Location, message: String },

    /// An identifier is not declared on the receiver it was used on.
    #[error("unresolved reference {identifier:?} on {receiver_type}")]
    UnresolvedReference {
        identifier: String,
        receiver_type: String,
    },

    /// A resolved call or assignment got arguments of the wrong arity or type.
    #[error("argument mismatch for {identifier:?}: expected ({expected}), found ({actual})")]
    ArgumentMismatch {
        identifier: String,
        expected: String,
        actual: String,
    },

    /// An assignment targets a read-only property.
    #[error("property {identifier:?} of {receiver_type} is read-only")]
    ReadOnlyProperty {
        identifier: String,
        receiver_type: String,
    },

    /// A block or navigation could not be bound to a usable sub-receiver.
    #[error("invalid nesting at {identifier:?} on {receiver_type}: {detail}")]
    InvalidNesting {
        identifier: String,
        receiver_type: String,
        detail: String,
    },

    /// Host code rejected an operation the schema allowed.
    #[error("host rejected {identifier:?}: {message}")]
    HostRejected { identifier: String, message: String },
}

impl NotEvaluatedReason {
    /// Short, stable name of the cause.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoApplicableSchema => "no_applicable_schema",
            Self::SyntaxError { .. } => "syntax_error",
            Self::UnresolvedReference { .. } => "unresolved_reference",
            Self::ArgumentMismatch { .. } => "argument_mismatch",
            Self::ReadOnlyProperty { .. } => "read_only_property",
            Self::InvalidNesting { .. } => "invalid_nesting",
            Self::HostRejected { .. } => "host_rejected",
        }
    }

    pub(crate) fn unresolved(identifier: impl ToString, receiver_type: impl ToString) -> Self {
        Self::UnresolvedReference {
            identifier: identifier.to_string(),
            receiver_type: receiver_type.to_string(),
        }
    }

    pub(crate) fn nesting(
        identifier: impl ToString,
        receiver_type: impl ToString,
        detail: impl Into<String>,
    ) -> Self {
        Self::InvalidNesting {
            identifier: identifier.to_string(),
            receiver_type: receiver_type.to_string(),
            detail: detail.into(),
        }
    }

    pub(crate) fn host(identifier: impl ToString, error: &rdsl_core::HostError) -> Self {
        Self::HostRejected {
            identifier: identifier.to_string(),
            message: error.to_string(),
        }
    }
}

/// Outcome of evaluating a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "cause", rename_all = "snake_case")]
pub enum EvaluationResult {
    /// Every statement resolved and applied.
    Evaluated,
    /// The script was rejected.
    NotEvaluated(NotEvaluatedReason),
}

impl EvaluationResult {
    pub fn is_evaluated(&self) -> bool {
        matches!(self, Self::Evaluated)
    }

    pub fn reason(&self) -> Option<&NotEvaluatedReason> {
        match self {
            Self::Evaluated => None,
            Self::NotEvaluated(reason) => Some(reason),
        }
    }
}

impl From<NotEvaluatedReason> for EvaluationResult {
    fn from(reason: NotEvaluatedReason) -> Self {
        Self::NotEvaluated(reason)
    }
}

impl From<Result<(), NotEvaluatedReason>> for EvaluationResult {
    fn from(result: Result<(), NotEvaluatedReason>) -> Self {
        match result {
            Ok(()) => Self::Evaluated,
            Err(reason) => Self::NotEvaluated(reason),
        }
    }
}

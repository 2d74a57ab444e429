//! # rdsl-eval — Restricted Script Evaluation
//!
//! Evaluates configuration scripts strictly against an analysis schema.
//!
//! ## Pipeline
//!
//! - [`parser`]: pest grammar to AST, with 1-based source locations.
//! - [`resolve`]: binds every identifier to a schema declaration and checks
//!   arity, types, mutability and nesting. No host object is touched.
//! - [`interpret`]: applies the resolved tree to host receivers in source
//!   order.
//! - [`evaluator`]: context resolution, schema lookup, failure policy.
//! - [`plugin`]: the host-facing adapter that locks a configuration scope
//!   on success and converts rejections into an error.
//!
//! ## Host Binding
//!
//! Host objects implement [`ScriptReceiver`]; restricted value factories are
//! served by a [`RestrictedFunctions`] implementation.
//!
//! ## Failure Semantics
//!
//! Failure is per script, not per statement. Resolution finds every static
//! problem before any mutation; a dynamic failure stops at the failing
//! statement and the configured [`FailurePolicy`] decides whether earlier
//! mutations stand.

pub mod ast;
pub mod config;
pub mod evaluator;
pub mod interpret;
pub mod parser;
pub mod plugin;
pub mod receiver;
pub mod resolve;
pub mod result;

pub use ast::Location;
pub use config::{ConfigError, EvaluatorConfig, FailurePolicy};
pub use evaluator::{ContextClassifier, FileNameClassifier, ScriptEvaluator};
pub use parser::{parse_script, ParseError};
pub use plugin::{ConfigurationScope, RestrictedDslNotEvaluated, RestrictedScriptPlugin, ScopeLock};
pub use receiver::{NoRestrictedFunctions, RestrictedFunctions, ScriptReceiver};
pub use resolve::{ResolvedScript, Resolver};
pub use result::{EvaluationResult, NotEvaluatedReason};

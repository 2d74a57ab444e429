//! # rdsl-core — Foundational Types for the Restricted DSL
//!
//! This crate is the leaf of the workspace. It defines the vocabulary every
//! other layer speaks: validated identifiers, the closed value model scripts
//! compute with, the closed set of script contexts, the script source handle
//! the host passes in, and the shared error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for names.** `TypeName` and `Identifier` are
//!    validated at construction. Surface tables and resolution indices never
//!    hold bare strings.
//!
//! 2. **Closed value model.** `Value` and `ValueType` are small enums with
//!    exhaustive `match` everywhere. Assignability is type equality.
//!
//! 3. **Single `ScriptContext` enum.** Adding a context forces every schema
//!    lookup and classifier to handle it at compile time.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rdsl-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod digest;
pub mod error;
pub mod identity;
pub mod source;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use context::ScriptContext;
pub use digest::{canonical_digest, sha256_digest, ContentDigest};
pub use error::{HostError, IdentifierError, RdslError};
pub use identity::{Identifier, TypeName};
pub use source::ScriptSource;
pub use value::{ObjectRef, Value, ValueType};

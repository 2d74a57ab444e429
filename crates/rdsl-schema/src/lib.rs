//! # rdsl-schema — Capability Surfaces & Analysis Schemas
//!
//! Declares what scripts may do and compiles those declarations into
//! closed, per-context analysis schemas.
//!
//! ## Capability Surfaces (`surface`, `builtin`)
//!
//! A [`CapabilitySurface`] lists the properties, adding functions,
//! configuring functions and restricted functions of one receiver type.
//! Surfaces are plain data registered in a [`SurfaceCatalog`]; the built-in
//! tables live in [`builtin`].
//!
//! ## Schema Derivation (`builder`, `schema`)
//!
//! [`build_schema`] closes a context binding over its configuring targets
//! and element types, fails fast on anything that would leave the
//! allowlist, and produces an immutable [`AnalysisSchema`] whose resolution
//! index answers every per-script lookup.
//!
//! ## Memoization (`registry`)
//!
//! [`SchemaRegistry`] builds each context's schema at most once and shares
//! it across threads. `UnknownScript` never has a schema.
//!
//! ## Crate Policy
//!
//! - Depends only on `rdsl-core` internally.
//! - Schema construction errors are startup errors, never script errors.
//! - No runtime registration: new surfaces are a code change.

pub mod builder;
pub mod builtin;
pub mod catalog;
pub mod error;
pub mod registry;
pub mod schema;
pub mod surface;

pub use builder::{build_schema, check_binding, schema_for_context};
pub use catalog::{ContextBinding, SurfaceCatalog};
pub use error::SchemaBuildError;
pub use registry::{SchemaRegistry, ScriptSchemaBuildingResult};
pub use schema::{render_params, AnalysisSchema, Operation, OperationKind, ResolutionKey};
pub use surface::{
    AddingFunction, CapabilitySurface, ConfiguringFunction, Mutability, Namespace, Parameter,
    PropertyDecl, RestrictedFunction, SurfaceBuilder,
};

//! # Surface Catalog
//!
//! The static registration point for capability surfaces and the context
//! bindings that select which of them a script may reach.
//!
//! A binding names a top-level receiver and an explicit allowlist. The
//! allowlist is never "every declared surface": declaring a new surface in
//! the catalog does not make it reachable from any script until a binding
//! lists it.

use std::collections::BTreeMap;

use rdsl_core::{ScriptContext, TypeName};
use serde::Serialize;

use crate::error::SchemaBuildError;
use crate::surface::CapabilitySurface;

/// Top-level receiver and allowlist for one script context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextBinding {
    pub top_level: TypeName,
    pub allowlist: Vec<TypeName>,
}

impl ContextBinding {
    /// Whether `type_name` is in the allowlist.
    pub fn allows(&self, type_name: &TypeName) -> bool {
        self.allowlist.contains(type_name)
    }
}

/// All declared surfaces plus the per-context bindings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SurfaceCatalog {
    surfaces: BTreeMap<TypeName, CapabilitySurface>,
    bindings: BTreeMap<ScriptContext, ContextBinding>,
}

impl SurfaceCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface.
    ///
    /// # Errors
    ///
    /// `SchemaBuildError::DuplicateSurface` if the type is already declared.
    pub fn declare(&mut self, surface: CapabilitySurface) -> Result<&mut Self, SchemaBuildError> {
        if self.surfaces.contains_key(&surface.type_name) {
            return Err(SchemaBuildError::DuplicateSurface {
                type_name: surface.type_name.to_string(),
            });
        }
        self.surfaces.insert(surface.type_name.clone(), surface);
        Ok(self)
    }

    /// Bind a context to a top-level receiver and allowlist. Surfaces named
    /// here are checked when the schema is built, not at bind time, so
    /// bindings may be registered before the surfaces they name.
    ///
    /// # Errors
    ///
    /// `SchemaBuildError::UnknownScriptBinding` for `UnknownScript`, and
    /// `SchemaBuildError::InvalidName` for malformed type names.
    pub fn bind(
        &mut self,
        context: ScriptContext,
        top_level: &str,
        allowlist: &[&str],
    ) -> Result<&mut Self, SchemaBuildError> {
        if context == ScriptContext::UnknownScript {
            return Err(SchemaBuildError::UnknownScriptBinding);
        }
        let allowlist = allowlist
            .iter()
            .map(|name| TypeName::new(*name))
            .collect::<Result<Vec<_>, _>>()?;
        self.bindings.insert(
            context,
            ContextBinding {
                top_level: TypeName::new(top_level)?,
                allowlist,
            },
        );
        Ok(self)
    }

    /// Look up a declared surface.
    pub fn surface(&self, type_name: &TypeName) -> Option<&CapabilitySurface> {
        self.surfaces.get(type_name)
    }

    /// The binding for `context`, if any.
    pub fn binding(&self, context: ScriptContext) -> Option<&ContextBinding> {
        self.bindings.get(&context)
    }

    /// All bindings, in context order.
    pub fn bindings(&self) -> impl Iterator<Item = (ScriptContext, &ContextBinding)> {
        self.bindings.iter().map(|(ctx, b)| (*ctx, b))
    }

    /// All declared surfaces, in type-name order.
    pub fn surfaces(&self) -> impl Iterator<Item = &CapabilitySurface> {
        self.surfaces.values()
    }
}

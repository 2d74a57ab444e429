//! # Schema Registry
//!
//! Memoizes one [`AnalysisSchema`] per script context for the life of the
//! registry. Each context has its own `OnceCell`, so a schema is built at
//! most once: the first caller computes it, concurrent callers block until
//! that computation finishes and then share the same `Arc`.
//!
//! Bindings are checked when the registry is constructed, so a broken
//! surface table is a startup error and [`SchemaRegistry::schema_for`] is
//! infallible. Inputs never change after construction and the cache is
//! never invalidated.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rdsl_core::ScriptContext;

use crate::builder::{build_schema, check_binding};
use crate::catalog::{ContextBinding, SurfaceCatalog};
use crate::error::SchemaBuildError;
use crate::schema::AnalysisSchema;

/// Outcome of asking for a context's schema.
#[derive(Debug, Clone)]
pub enum ScriptSchemaBuildingResult {
    /// A schema exists for the context.
    SchemaAvailable(Arc<AnalysisSchema>),
    /// The context has no schema. Scripts of this context are not evaluated.
    SchemaNotBuilt,
}

impl ScriptSchemaBuildingResult {
    pub fn schema(&self) -> Option<&Arc<AnalysisSchema>> {
        match self {
            Self::SchemaAvailable(schema) => Some(schema),
            Self::SchemaNotBuilt => None,
        }
    }
}

#[derive(Debug)]
struct Entry {
    binding: ContextBinding,
    cell: OnceCell<Option<Arc<AnalysisSchema>>>,
}

/// Context-keyed, build-once schema cache.
#[derive(Debug)]
pub struct SchemaRegistry {
    catalog: SurfaceCatalog,
    entries: BTreeMap<ScriptContext, Entry>,
}

static GLOBAL: OnceCell<Result<SchemaRegistry, SchemaBuildError>> = OnceCell::new();

impl SchemaRegistry {
    /// Create a registry over `catalog`, checking every binding.
    ///
    /// # Errors
    ///
    /// The first `SchemaBuildError` found in any binding.
    pub fn new(catalog: SurfaceCatalog) -> Result<Self, SchemaBuildError> {
        let mut entries = BTreeMap::new();
        for (context, binding) in catalog.bindings() {
            check_binding(&catalog, binding)?;
            entries.insert(
                context,
                Entry {
                    binding: binding.clone(),
                    cell: OnceCell::new(),
                },
            );
        }
        tracing::debug!(contexts = entries.len(), "schema registry initialized");
        Ok(Self { catalog, entries })
    }

    /// The process-wide registry over [`SurfaceCatalog::builtin`].
    ///
    /// # Errors
    ///
    /// Only if the built-in tables are malformed. The error is computed once
    /// and returned to every caller.
    pub fn global() -> Result<&'static SchemaRegistry, SchemaBuildError> {
        GLOBAL
            .get_or_init(|| SurfaceCatalog::builtin().and_then(SchemaRegistry::new))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The catalog this registry derives from.
    pub fn catalog(&self) -> &SurfaceCatalog {
        &self.catalog
    }

    /// The schema for `context`, building it on first use.
    pub fn schema_for(&self, context: ScriptContext) -> ScriptSchemaBuildingResult {
        let Some(entry) = self.entries.get(&context) else {
            return ScriptSchemaBuildingResult::SchemaNotBuilt;
        };

        let mut built = false;
        let schema = entry.cell.get_or_init(|| {
            built = true;
            match build_schema(&self.catalog, &entry.binding) {
                Ok(schema) => {
                    tracing::debug!(
                        %context,
                        top_level = %schema.top_level(),
                        operations = schema.index().len(),
                        "analysis schema built"
                    );
                    Some(Arc::new(schema))
                }
                Err(e) => {
                    tracing::error!(%context, error = %e, "analysis schema could not be built");
                    None
                }
            }
        });
        if !built {
            tracing::trace!(%context, "analysis schema cache hit");
        }

        match schema {
            Some(schema) => ScriptSchemaBuildingResult::SchemaAvailable(Arc::clone(schema)),
            None => ScriptSchemaBuildingResult::SchemaNotBuilt,
        }
    }

    /// Whether `context` has a schema.
    pub fn has_schema(&self, context: ScriptContext) -> bool {
        self.entries.contains_key(&context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::CapabilitySurface;

    #[test]
    fn unknown_script_is_never_built() {
        let registry = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();
        assert!(matches!(
            registry.schema_for(ScriptContext::UnknownScript),
            ScriptSchemaBuildingResult::SchemaNotBuilt
        ));
        assert!(!registry.has_schema(ScriptContext::UnknownScript));
    }

    #[test]
    fn repeated_lookups_share_one_schema() {
        let registry = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();
        let a = registry.schema_for(ScriptContext::ProjectScript);
        let b = registry.schema_for(ScriptContext::ProjectScript);
        assert!(Arc::ptr_eq(a.schema().unwrap(), b.schema().unwrap()));
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let registry = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();
        let schemas: Vec<Arc<AnalysisSchema>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| registry.schema_for(ScriptContext::PluginsBlock)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().schema().unwrap().clone())
                .collect()
        });
        assert!(schemas.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn broken_binding_fails_at_construction() {
        let mut catalog = SurfaceCatalog::new();
        catalog
            .declare(
                CapabilitySurface::builder("Top")
                    .configuring("child", &[], "Child")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        catalog
            .bind(ScriptContext::SettingsScript, "Top", &["Top"])
            .unwrap();
        assert!(matches!(
            SchemaRegistry::new(catalog),
            Err(SchemaBuildError::DanglingTarget { .. })
        ));
    }

    #[test]
    fn global_registry_serves_builtin_contexts() {
        let registry = SchemaRegistry::global().unwrap();
        assert!(registry.has_schema(ScriptContext::SettingsScript));
        assert!(std::ptr::eq(registry, SchemaRegistry::global().unwrap()));
    }
}

//! Structural properties of derived schemas: closure over receiver targets
//! and idempotent derivation.

use proptest::prelude::*;
use rdsl_core::{ScriptContext, ValueType};
use rdsl_schema::{
    build_schema, CapabilitySurface, ContextBinding, SchemaRegistry, SurfaceCatalog,
};

fn contexts_with_schema() -> Vec<ScriptContext> {
    ScriptContext::all()
        .iter()
        .copied()
        .filter(|c| *c != ScriptContext::UnknownScript)
        .collect()
}

#[test]
fn every_receiver_target_is_in_the_same_schema() {
    let registry = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();
    for ctx in contexts_with_schema() {
        let result = registry.schema_for(ctx);
        let schema = result.schema().unwrap();
        for surface in schema.surfaces() {
            for c in &surface.configuring {
                assert!(schema.is_receiver(&c.target), "{ctx}: {} dangles", c.name);
            }
            for a in &surface.adding {
                if let Some(element) = &a.element {
                    assert!(schema.is_receiver(element), "{ctx}: {} dangles", a.name);
                }
            }
        }
    }
}

#[test]
fn builtin_schemas_expose_expected_entry_points() {
    let registry = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();

    let settings = registry.schema_for(ScriptContext::SettingsScript);
    let settings = settings.schema().unwrap();
    assert_eq!(settings.top_level().as_str(), "Settings");
    let root = settings
        .surface(settings.top_level())
        .unwrap()
        .properties
        .iter()
        .find(|p| p.name == "rootProject")
        .unwrap();
    assert!(settings.navigable_target(root).is_some());

    let project = registry.schema_for(ScriptContext::ProjectScript);
    let project = project.schema().unwrap();
    let names: Vec<String> = project.surfaces().map(|s| s.type_name.to_string()).collect();
    assert_eq!(names, ["ProjectTopLevelReceiver", "RestrictedDependenciesHandler"]);
}

#[test]
fn fingerprints_differ_between_contexts() {
    let registry = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();
    let prints: Vec<_> = contexts_with_schema()
        .into_iter()
        .map(|c| registry.schema_for(c).schema().unwrap().fingerprint().unwrap())
        .collect();
    assert_ne!(prints[0], prints[1]);
    assert_ne!(prints[1], prints[2]);
    assert_ne!(prints[0], prints[2]);
}

#[test]
fn derivation_is_independent_of_other_contexts() {
    // Fresh registries, different first-use order.
    let forward = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();
    let backward = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();
    let order = contexts_with_schema();

    for ctx in &order {
        forward.schema_for(*ctx);
    }
    for ctx in order.iter().rev() {
        backward.schema_for(*ctx);
    }
    for ctx in order {
        let a = forward.schema_for(ctx);
        let b = backward.schema_for(ctx);
        assert_eq!(a.schema().unwrap().index(), b.schema().unwrap().index());
        assert_eq!(
            a.schema().unwrap().fingerprint().unwrap(),
            b.schema().unwrap().fingerprint().unwrap()
        );
    }
}

#[test]
fn schema_json_lists_index_entries() {
    let registry = SchemaRegistry::new(SurfaceCatalog::builtin().unwrap()).unwrap();
    let result = registry.schema_for(ScriptContext::PluginsBlock);
    let json = serde_json::to_value(result.schema().unwrap().as_ref()).unwrap();
    assert_eq!(json["top_level"], "PluginsTopLevelReceiver");
    assert_eq!(json["index"].as_array().unwrap().len(), 6);
}

// ─── Generated surfaces ─────────────────────────────────────────────

/// A chain `S0 -> S1 -> ... -> Sn` of configuring targets, each surface with
/// a handful of string properties.
fn chain_catalog(len: usize, props: usize) -> (SurfaceCatalog, ContextBinding) {
    let mut catalog = SurfaceCatalog::new();
    for i in 0..len {
        let mut b = CapabilitySurface::builder(&format!("S{i}"));
        for p in 0..props {
            b = b.read_write(&format!("p{p}"), "String");
        }
        if i + 1 < len {
            b = b.configuring(&format!("next{i}"), &[], &format!("S{}", i + 1));
        }
        catalog.declare(b.build().unwrap()).unwrap();
    }
    let names: Vec<String> = (0..len).map(|i| format!("S{i}")).collect();
    let allow: Vec<&str> = names.iter().map(String::as_str).collect();
    catalog
        .bind(ScriptContext::SettingsScript, "S0", &allow)
        .unwrap();
    let binding = catalog
        .binding(ScriptContext::SettingsScript)
        .unwrap()
        .clone();
    (catalog, binding)
}

proptest! {
    /// Building twice yields deep-equal schemas.
    #[test]
    fn derivation_is_idempotent(len in 1usize..8, props in 0usize..5) {
        let (catalog, binding) = chain_catalog(len, props);
        let a = build_schema(&catalog, &binding).unwrap();
        let b = build_schema(&catalog, &binding).unwrap();
        prop_assert_eq!(a.index(), b.index());
        prop_assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    /// Every surface in the chain is reachable and indexed.
    #[test]
    fn chain_is_fully_reachable(len in 1usize..8, props in 0usize..5) {
        let (catalog, binding) = chain_catalog(len, props);
        let schema = build_schema(&catalog, &binding).unwrap();
        prop_assert_eq!(schema.surfaces().count(), len);
        prop_assert_eq!(schema.index().len(), len * props + len - 1);
    }

    /// Dropping any non-top surface from the allowlist breaks closure.
    #[test]
    fn truncated_allowlist_dangles(len in 2usize..8, cut in 1usize..8) {
        let cut = cut % len;
        prop_assume!(cut > 0);
        let (catalog, mut binding) = chain_catalog(len, 1);
        binding.allowlist.remove(cut);
        let dangling = matches!(
            build_schema(&catalog, &binding),
            Err(rdsl_schema::SchemaBuildError::DanglingTarget { .. })
        );
        prop_assert!(dangling);
    }

    /// Property value types parse into the closed value model.
    #[test]
    fn object_properties_stay_opaque(name in "[A-Z][A-Za-z0-9]{0,12}") {
        prop_assume!(!["String", "Int", "Boolean", "Unit"].contains(&name.as_str()));
        let surface = CapabilitySurface::builder("Top")
            .read_write("handle", &name)
            .build()
            .unwrap();
        prop_assert!(matches!(&surface.properties[0].value_type, ValueType::Object(t) if t.as_str() == name));
    }
}

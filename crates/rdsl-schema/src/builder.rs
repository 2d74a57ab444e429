//! # Schema Builder
//!
//! Derives an [`AnalysisSchema`] from a [`SurfaceCatalog`] and one context
//! binding. Derivation is a pure function of static declarations.
//!
//! ## Closure Guarantee
//!
//! Every receiver type a script can be handed into (configuring target,
//! adding element type, navigable property) must be a declared surface in
//! the binding's allowlist. A target outside the allowlist is a
//! [`SchemaBuildError::DanglingTarget`] at startup; it never becomes a
//! per-script failure. Object-typed properties whose type is not a declared
//! surface are opaque values and are not checked.
//!
//! The derived schema holds only the surfaces reachable from the top-level
//! receiver. Allowlisted but unreachable surfaces are dropped.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rdsl_core::{ScriptContext, TypeName, ValueType};

use crate::catalog::{ContextBinding, SurfaceCatalog};
use crate::error::SchemaBuildError;
use crate::registry::ScriptSchemaBuildingResult;
use crate::schema::{AnalysisSchema, Operation, ResolutionKey};
use crate::surface::CapabilitySurface;

/// Check a binding against the catalog without assembling a schema.
///
/// # Errors
///
/// - `TopLevelNotAllowed` if the top-level receiver is not allowlisted.
/// - `UnknownSurface` if an allowlisted type has no declared surface.
/// - `DuplicateMember` if a surface repeats a name within one namespace.
/// - `DanglingTarget` if a receiver target leaves the allowlist.
pub fn check_binding(
    catalog: &SurfaceCatalog,
    binding: &ContextBinding,
) -> Result<(), SchemaBuildError> {
    if !binding.allows(&binding.top_level) {
        return Err(SchemaBuildError::TopLevelNotAllowed {
            top_level: binding.top_level.to_string(),
        });
    }

    for type_name in &binding.allowlist {
        let surface = catalog
            .surface(type_name)
            .ok_or_else(|| SchemaBuildError::UnknownSurface {
                top_level: binding.top_level.to_string(),
                type_name: type_name.to_string(),
            })?;
        index_surface(surface, &mut BTreeMap::new())?;
        check_targets(catalog, binding, surface)?;
    }
    Ok(())
}

fn check_targets(
    catalog: &SurfaceCatalog,
    binding: &ContextBinding,
    surface: &CapabilitySurface,
) -> Result<(), SchemaBuildError> {
    let dangling = |member: &str, target: &TypeName| SchemaBuildError::DanglingTarget {
        top_level: binding.top_level.to_string(),
        receiver: surface.type_name.to_string(),
        member: member.to_string(),
        target: target.to_string(),
    };

    // Properties only need checking when they name a declared surface.
    for property in &surface.properties {
        if let ValueType::Object(target) = &property.value_type {
            if catalog.surface(target).is_some() && !binding.allows(target) {
                return Err(dangling(property.name.as_str(), target));
            }
        }
    }
    // Elements and configuring targets must always be receivers.
    let receivers = surface
        .adding
        .iter()
        .filter_map(|a| a.element.as_ref().map(|t| (&a.name, t)))
        .chain(surface.configuring.iter().map(|c| (&c.name, &c.target)));
    for (member, target) in receivers {
        if catalog.surface(target).is_none() || !binding.allows(target) {
            return Err(dangling(member.as_str(), target));
        }
    }
    Ok(())
}

fn index_surface(
    surface: &CapabilitySurface,
    index: &mut BTreeMap<ResolutionKey, Operation>,
) -> Result<(), SchemaBuildError> {
    let operations = surface
        .properties
        .iter()
        .cloned()
        .map(Operation::Property)
        .chain(surface.adding.iter().cloned().map(Operation::Adding))
        .chain(surface.configuring.iter().cloned().map(Operation::Configuring))
        .chain(surface.restricted.iter().cloned().map(Operation::Restricted));

    for op in operations {
        let key = ResolutionKey {
            receiver: surface.type_name.clone(),
            namespace: op.namespace(),
            name: op.name().clone(),
        };
        if index.contains_key(&key) {
            return Err(SchemaBuildError::DuplicateMember {
                receiver: key.receiver.to_string(),
                namespace: key.namespace,
                name: key.name.to_string(),
            });
        }
        index.insert(key, op);
    }
    Ok(())
}

/// Derive the schema for one binding.
///
/// # Errors
///
/// Any error [`check_binding`] reports.
pub fn build_schema(
    catalog: &SurfaceCatalog,
    binding: &ContextBinding,
) -> Result<AnalysisSchema, SchemaBuildError> {
    check_binding(catalog, binding)?;

    let mut surfaces = BTreeMap::new();
    let mut index = BTreeMap::new();
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from([binding.top_level.clone()]);

    while let Some(type_name) = queue.pop_front() {
        if !seen.insert(type_name.clone()) {
            continue;
        }
        let Some(surface) = catalog.surface(&type_name) else {
            continue;
        };
        index_surface(surface, &mut index)?;
        for (_, target) in surface.outgoing_targets() {
            if binding.allows(target) && catalog.surface(target).is_some() {
                queue.push_back(target.clone());
            }
        }
        surfaces.insert(type_name, surface.clone());
    }

    for unreachable in binding.allowlist.iter().filter(|t| !seen.contains(*t)) {
        tracing::debug!(
            top_level = %binding.top_level,
            surface = %unreachable,
            "allowlisted surface is not reachable from the top-level receiver"
        );
    }

    Ok(AnalysisSchema::from_parts(
        binding.top_level.clone(),
        surfaces,
        index,
    ))
}

/// Derive the schema for `context`, or report that none exists.
///
/// `UnknownScript` and unbound contexts yield `SchemaNotBuilt`.
///
/// # Errors
///
/// Any error [`build_schema`] reports for a bound context.
pub fn schema_for_context(
    catalog: &SurfaceCatalog,
    context: ScriptContext,
) -> Result<ScriptSchemaBuildingResult, SchemaBuildError> {
    if context == ScriptContext::UnknownScript {
        return Ok(ScriptSchemaBuildingResult::SchemaNotBuilt);
    }
    match catalog.binding(context) {
        Some(binding) => Ok(ScriptSchemaBuildingResult::SchemaAvailable(
            std::sync::Arc::new(build_schema(catalog, binding)?),
        )),
        None => Ok(ScriptSchemaBuildingResult::SchemaNotBuilt),
    }
}

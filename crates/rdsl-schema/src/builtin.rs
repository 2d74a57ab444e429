//! # Built-in Surfaces
//!
//! The receiver types shipped with the host: settings scripts, `plugins { }`
//! blocks and project build scripts. Adding an operation a script may use
//! means editing a table here.

use rdsl_core::ScriptContext;

use crate::catalog::SurfaceCatalog;
use crate::error::SchemaBuildError;
use crate::surface::CapabilitySurface;

// ─── Receiver type names ────────────────────────────────────────────

pub const SETTINGS: &str = "Settings";
pub const PROJECT_DESCRIPTOR: &str = "ProjectDescriptor";
pub const PLUGINS_TOP_LEVEL: &str = "PluginsTopLevelReceiver";
pub const PLUGIN_DEPENDENCIES_SCOPE: &str = "RestrictedPluginDependenciesSpecScope";
pub const PLUGIN_SPEC: &str = "PluginDependencySpecWithProperties";
pub const PROJECT_TOP_LEVEL: &str = "ProjectTopLevelReceiver";
pub const DEPENDENCIES_HANDLER: &str = "RestrictedDependenciesHandler";

/// Opaque value type produced by `project(path)`.
pub const PROJECT_DEPENDENCY: &str = "ProjectDependency";

/// Dependency configurations accepted by the dependencies handler.
pub const DEPENDENCY_CONFIGURATIONS: [&str; 5] = [
    "api",
    "compileOnly",
    "implementation",
    "testImplementation",
    "androidTestImplementation",
];

// ─── Surface tables ─────────────────────────────────────────────────

fn settings() -> Result<CapabilitySurface, SchemaBuildError> {
    CapabilitySurface::builder(SETTINGS)
        .read_only("rootProject", PROJECT_DESCRIPTOR)
        .adding("include", &[("projectPath", "String")])
        .adding("enableFeaturePreview", &[("name", "String")])
        .build()
}

fn project_descriptor() -> Result<CapabilitySurface, SchemaBuildError> {
    CapabilitySurface::builder(PROJECT_DESCRIPTOR)
        .read_write("name", "String")
        .read_only("path", "String")
        .read_write("buildFileName", "String")
        .build()
}

fn plugins_top_level() -> Result<CapabilitySurface, SchemaBuildError> {
    CapabilitySurface::builder(PLUGINS_TOP_LEVEL)
        .configuring("plugins", &[], PLUGIN_DEPENDENCIES_SCOPE)
        .build()
}

fn plugin_dependencies_scope() -> Result<CapabilitySurface, SchemaBuildError> {
    CapabilitySurface::builder(PLUGIN_DEPENDENCIES_SCOPE)
        .adding_configurable("id", &[("id", "String")], PLUGIN_SPEC)
        .adding_configurable("kotlin", &[("module", "String")], PLUGIN_SPEC)
        .build()
}

fn plugin_spec() -> Result<CapabilitySurface, SchemaBuildError> {
    CapabilitySurface::builder(PLUGIN_SPEC)
        .read_only("id", "String")
        .read_write("version", "String")
        .read_write("apply", "Boolean")
        .build()
}

fn project_top_level() -> Result<CapabilitySurface, SchemaBuildError> {
    CapabilitySurface::builder(PROJECT_TOP_LEVEL)
        .read_only("dependencies", DEPENDENCIES_HANDLER)
        .read_write("group", "String")
        .read_write("version", "String")
        .read_write("description", "String")
        .configuring("dependencies", &[], DEPENDENCIES_HANDLER)
        .restricted("project", &[("path", "String")], PROJECT_DEPENDENCY)
        .build()
}

fn dependencies_handler() -> Result<CapabilitySurface, SchemaBuildError> {
    DEPENDENCY_CONFIGURATIONS
        .iter()
        .fold(CapabilitySurface::builder(DEPENDENCIES_HANDLER), |b, name| {
            b.adding(name, &[("dependency", PROJECT_DEPENDENCY)])
        })
        .build()
}

impl SurfaceCatalog {
    /// The catalog of built-in surfaces and context bindings.
    ///
    /// # Errors
    ///
    /// Only if a table above is malformed; the unit tests pin that it is not.
    pub fn builtin() -> Result<Self, SchemaBuildError> {
        let mut catalog = SurfaceCatalog::new();
        catalog
            .declare(settings()?)?
            .declare(project_descriptor()?)?
            .declare(plugins_top_level()?)?
            .declare(plugin_dependencies_scope()?)?
            .declare(plugin_spec()?)?
            .declare(project_top_level()?)?
            .declare(dependencies_handler()?)?;

        catalog
            .bind(
                ScriptContext::SettingsScript,
                SETTINGS,
                &[SETTINGS, PROJECT_DESCRIPTOR],
            )?
            .bind(
                ScriptContext::PluginsBlock,
                PLUGINS_TOP_LEVEL,
                &[PLUGINS_TOP_LEVEL, PLUGIN_DEPENDENCIES_SCOPE, PLUGIN_SPEC],
            )?
            .bind(
                ScriptContext::ProjectScript,
                PROJECT_TOP_LEVEL,
                &[PROJECT_TOP_LEVEL, DEPENDENCIES_HANDLER],
            )?;
        Ok(catalog)
    }
}

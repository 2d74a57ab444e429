//! # rdsl-model — Built-in Host Objects
//!
//! Concrete receivers for the built-in capability surfaces, so the built-in
//! script contexts can be evaluated end to end:
//!
//! | Context  | Top-level model   | Nested receivers                    |
//! |----------|-------------------|-------------------------------------|
//! | settings | [`SettingsModel`] | [`ProjectDescriptorModel`]          |
//! | plugins  | [`PluginsModel`]  | [`PluginRequests`], [`PluginSpec`]  |
//! | project  | [`ProjectModel`]  | [`DependenciesModel`]               |
//!
//! Every model is `Clone` so the transactional failure policy can apply,
//! and `Serialize` so a configured model can be reported.
//!
//! Restricted functions (`project(path)`) are served by
//! [`DefaultRestrictedFunctions`].

use std::sync::Arc;

use rdsl_eval::ScriptEvaluator;
use rdsl_schema::SchemaRegistry;

pub mod functions;
pub mod plugins;
pub mod project;
pub mod settings;
pub mod target;

pub use functions::{is_project_path, DefaultRestrictedFunctions};
pub use plugins::{PluginRequests, PluginSpec, PluginsModel};
pub use project::{DependenciesModel, DependencyEntry, ProjectModel};
pub use settings::{ProjectDescriptorModel, SettingsModel, KNOWN_FEATURE_PREVIEWS};
pub use target::TargetModel;

/// An evaluator over `registry` wired to the built-in restricted functions.
pub fn builtin_evaluator(registry: &SchemaRegistry) -> ScriptEvaluator<'_> {
    ScriptEvaluator::new(registry).with_functions(Arc::new(DefaultRestrictedFunctions))
}

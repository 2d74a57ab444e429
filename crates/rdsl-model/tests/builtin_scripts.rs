//! Built-in script contexts evaluated end to end against the reference
//! models and the process-wide schema registry.

use proptest::prelude::*;
use rdsl_core::{ScriptContext, ScriptSource};
use rdsl_eval::{
    EvaluationResult, EvaluatorConfig, FailurePolicy, NotEvaluatedReason, RestrictedScriptPlugin,
    ScopeLock,
};
use rdsl_model::{builtin_evaluator, PluginsModel, ProjectModel, SettingsModel, TargetModel};
use rdsl_schema::builtin::DEPENDENCY_CONFIGURATIONS;
use rdsl_schema::SchemaRegistry;

fn registry() -> &'static SchemaRegistry {
    SchemaRegistry::global().unwrap()
}

fn script(file_name: &str, text: &str) -> ScriptSource {
    ScriptSource::inline(file_name, text).with_file_name(file_name)
}

// ─── Settings ───────────────────────────────────────────────────────

#[test]
fn settings_script_configures_root_and_includes() {
    let evaluator = builtin_evaluator(registry());
    let mut settings = SettingsModel::default();
    let source = script(
        "settings.rdsl",
        r#"
        rootProject.name = "shop"
        include(":core")
        include("libs:json")
        enableFeaturePreview("TYPESAFE_PROJECT_ACCESSORS")
        "#,
    );
    assert_eq!(evaluator.evaluate(&mut settings, &source), EvaluationResult::Evaluated);
    assert_eq!(settings.root_project.name, "shop");
    assert_eq!(settings.included, [":core", ":libs:json"]);
    assert_eq!(settings.feature_previews, ["TYPESAFE_PROJECT_ACCESSORS"]);
}

#[test]
fn root_project_path_is_read_only() {
    let evaluator = builtin_evaluator(registry());
    let mut settings = SettingsModel::default();
    let source = script("settings.rdsl", r#"rootProject.path = ":other""#);
    let result = evaluator.evaluate(&mut settings, &source);
    assert_eq!(result.reason().map(NotEvaluatedReason::kind), Some("read_only_property"));
    assert_eq!(settings, SettingsModel::default());
}

#[test]
fn root_project_name_can_be_copied_into_build_file_name() {
    let evaluator = builtin_evaluator(registry());
    let mut settings = SettingsModel::default();
    let source = script(
        "settings.rdsl",
        r#"
        rootProject.name = "shop"
        rootProject.buildFileName = rootProject.name
        "#,
    );
    assert!(evaluator.evaluate(&mut settings, &source).is_evaluated());
    assert_eq!(settings.root_project.build_file_name, "shop");
}

#[test]
fn unknown_feature_preview_is_a_host_rejection() {
    let evaluator = builtin_evaluator(registry());
    let mut settings = SettingsModel::default();
    let source = script(
        "settings.rdsl",
        r#"
        include(":core")
        enableFeaturePreview("WARP_DRIVE")
        "#,
    );
    let result = evaluator.evaluate(&mut settings, &source);
    assert!(matches!(
        result.reason(),
        Some(NotEvaluatedReason::HostRejected { identifier, .. }) if identifier == "enableFeaturePreview"
    ));
    // Abort-in-place keeps the mutation made before the failing statement.
    assert_eq!(settings.included, [":core"]);
}

// ─── Plugins ────────────────────────────────────────────────────────

#[test]
fn plugins_block_collects_requests() {
    let evaluator = builtin_evaluator(registry());
    let mut plugins = PluginsModel::default();
    let source = script(
        "plugins.rdsl",
        r#"
        plugins {
            id("java-library")
            id("com.example.lint") {
                version = "2.1"
                apply = false
            }
            kotlin("jvm")
        }
        "#,
    );
    assert_eq!(evaluator.evaluate(&mut plugins, &source), EvaluationResult::Evaluated);
    let ids: Vec<&str> = plugins.plugins.requests.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["java-library", "com.example.lint", "org.jetbrains.kotlin.jvm"]);
    let lint = plugins.plugins.get("com.example.lint").unwrap();
    assert_eq!(lint.version.as_deref(), Some("2.1"));
    assert!(!lint.apply);
    assert!(plugins.plugins.get("java-library").unwrap().apply);
}

#[test]
fn plugin_id_cannot_be_reassigned() {
    let evaluator = builtin_evaluator(registry());
    let mut plugins = PluginsModel::default();
    let source = script("plugins.rdsl", r#"plugins { id("a") { id = "b" } }"#);
    let result = evaluator.evaluate(&mut plugins, &source);
    assert_eq!(result.reason().map(NotEvaluatedReason::kind), Some("read_only_property"));
    assert!(plugins.plugins.requests.is_empty());
}

#[test]
fn plugins_scope_members_are_not_visible_at_top_level() {
    let evaluator = builtin_evaluator(registry());
    let mut plugins = PluginsModel::default();
    let source = script("plugins.rdsl", r#"id("java")"#);
    assert!(matches!(
        evaluator.evaluate(&mut plugins, &source).reason(),
        Some(NotEvaluatedReason::UnresolvedReference { identifier, .. }) if identifier == "id"
    ));
}

#[test]
fn duplicate_plugin_request_rolls_back_under_transactional_policy() {
    let evaluator = builtin_evaluator(registry())
        .with_config(EvaluatorConfig::default().with_failure_policy(FailurePolicy::Transactional));
    let mut plugins = PluginsModel::default();
    let source = script("plugins.rdsl", r#"plugins { id("java") id("java") }"#);
    let result = evaluator.evaluate(&mut plugins, &source);
    assert_eq!(result.reason().map(NotEvaluatedReason::kind), Some("host_rejected"));
    assert_eq!(plugins, PluginsModel::default());
}

// ─── Project ────────────────────────────────────────────────────────

#[test]
fn project_script_declares_dependencies() {
    let evaluator = builtin_evaluator(registry());
    let mut project = ProjectModel::default();
    let source = script(
        "build.rdsl",
        r#"
        group = "org.example"
        version = "1.0.0"
        dependencies {
            implementation(project(":core"))
            api(project(":model"))
            testImplementation(project(":"))
        }
        "#,
    );
    assert_eq!(evaluator.evaluate(&mut project, &source), EvaluationResult::Evaluated);
    assert_eq!(project.group.as_deref(), Some("org.example"));
    assert_eq!(project.version.as_deref(), Some("1.0.0"));
    let deps = &project.dependencies;
    assert_eq!(deps.in_configuration("implementation").collect::<Vec<_>>(), [":core"]);
    assert_eq!(deps.in_configuration("api").collect::<Vec<_>>(), [":model"]);
    assert_eq!(deps.in_configuration("testImplementation").collect::<Vec<_>>(), [":"]);
}

#[test]
fn dependencies_block_rejects_unknown_configuration() {
    let evaluator = builtin_evaluator(registry());
    let mut project = ProjectModel::default();
    let source = script(
        "build.rdsl",
        r#"dependencies { runtimeOnly(project(":core")) }"#,
    );
    assert!(matches!(
        evaluator.evaluate(&mut project, &source).reason(),
        Some(NotEvaluatedReason::UnresolvedReference { identifier, receiver_type })
            if identifier == "runtimeOnly" && receiver_type == "RestrictedDependenciesHandler"
    ));
    assert_eq!(project, ProjectModel::default());
}

#[test]
fn dependency_requires_a_project_value() {
    let evaluator = builtin_evaluator(registry());
    let mut project = ProjectModel::default();
    let source = script("build.rdsl", r#"dependencies { api(":core") }"#);
    assert_eq!(
        evaluator.evaluate(&mut project, &source).reason().map(NotEvaluatedReason::kind),
        Some("argument_mismatch")
    );
}

#[test]
fn relative_project_path_is_rejected_by_the_host() {
    let evaluator = builtin_evaluator(registry());
    let mut project = ProjectModel::default();
    let source = script(
        "build.rdsl",
        r#"dependencies { api(project("core")) }"#,
    );
    assert!(matches!(
        evaluator.evaluate(&mut project, &source).reason(),
        Some(NotEvaluatedReason::HostRejected { identifier, .. }) if identifier == "project"
    ));
    assert!(project.dependencies.entries.is_empty());
}

// ─── Contexts and plugin adapter ────────────────────────────────────

#[test]
fn each_context_evaluates_only_against_its_own_model() {
    let evaluator = builtin_evaluator(registry());
    let mut settings = TargetModel::for_context(ScriptContext::SettingsScript).unwrap();
    let source = script("build.rdsl", r#"group = "x""#);
    assert_eq!(
        evaluator.evaluate(&mut settings, &source).reason().map(NotEvaluatedReason::kind),
        Some("invalid_nesting")
    );
}

#[test]
fn target_model_is_selected_by_classified_context() {
    let evaluator = builtin_evaluator(registry());
    let source = script("build.rdsl", r#"description = "demo""#);
    let mut target = TargetModel::for_context(evaluator.context_of(&source)).unwrap();
    assert!(evaluator.evaluate(&mut target, &source).is_evaluated());
    match target {
        TargetModel::Project(project) => assert_eq!(project.description.as_deref(), Some("demo")),
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn unrecognized_script_has_no_target_and_no_schema() {
    let evaluator = builtin_evaluator(registry());
    let source = script("init.rdsl", r#"group = "x""#);
    assert!(TargetModel::for_context(evaluator.context_of(&source)).is_none());
    assert_eq!(
        evaluator.check(&source),
        EvaluationResult::NotEvaluated(NotEvaluatedReason::NoApplicableSchema)
    );
}

#[test]
fn plugin_adapter_locks_scope_after_settings_script() {
    let plugin = RestrictedScriptPlugin::new(
        builtin_evaluator(registry()),
        script("settings.rdsl", r#"include(":app")"#),
    );
    let mut settings = SettingsModel::default();
    let mut scope = ScopeLock::new();
    plugin.apply(&mut settings, &mut scope).unwrap();
    assert_eq!(scope.lock_count(), 1);
    assert_eq!(settings.included, [":app"]);

    let failing = RestrictedScriptPlugin::new(
        builtin_evaluator(registry()),
        script("settings.rdsl", r#"includeBuild("../other")"#),
    );
    let mut scope = ScopeLock::new();
    let err = failing.apply(&mut settings, &mut scope).unwrap_err();
    assert_eq!(err.reason.kind(), "unresolved_reference");
    assert!(!scope.is_locked());
}

#[test]
fn settings_file_is_classified_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.rdsl");
    std::fs::write(&path, "rootProject.name = \"from-disk\"\n").unwrap();
    let source = ScriptSource::from_file(&path).unwrap();
    let evaluator = builtin_evaluator(registry());
    assert_eq!(evaluator.context_of(&source), ScriptContext::SettingsScript);
    let mut settings = SettingsModel::default();
    assert!(evaluator.evaluate(&mut settings, &source).is_evaluated());
    assert_eq!(settings.root_project.name, "from-disk");
}

// ─── Properties ─────────────────────────────────────────────────────

fn dependency_line() -> impl Strategy<Value = (usize, String)> {
    (
        0..DEPENDENCY_CONFIGURATIONS.len(),
        prop::collection::vec("[a-z][a-z0-9]{0,6}", 0..3),
    )
        .prop_map(|(config, segments)| (config, format!(":{}", segments.join(":"))))
}

proptest! {
    #[test]
    fn declared_dependencies_are_recorded_in_order(lines in prop::collection::vec(dependency_line(), 0..8)) {
        let body: String = lines
            .iter()
            .map(|(config, path)| format!("    {}(project(\"{path}\"))\n", DEPENDENCY_CONFIGURATIONS[*config]))
            .collect();
        let source = script("build.rdsl", &format!("dependencies {{\n{body}}}\n"));
        let mut project = ProjectModel::default();
        let result = builtin_evaluator(registry()).evaluate(&mut project, &source);
        prop_assert_eq!(result, EvaluationResult::Evaluated);
        let recorded: Vec<(&str, &str)> = project
            .dependencies
            .entries
            .iter()
            .map(|e| (e.configuration.as_str(), e.project.as_str()))
            .collect();
        let expected: Vec<(&str, &str)> = lines
            .iter()
            .map(|(config, path)| (DEPENDENCY_CONFIGURATIONS[*config], path.as_str()))
            .collect();
        prop_assert_eq!(recorded, expected);
    }

    #[test]
    fn rejected_settings_scripts_leave_transactional_targets_untouched(
        includes in prop::collection::vec("[a-z]{1,6}", 0..5)
    ) {
        let body: String = includes.iter().map(|p| format!("include(\":{p}\")\n")).collect();
        let source = script("settings.rdsl", &format!("{body}enableFeaturePreview(\"NOT_A_FEATURE\")\n"));
        let evaluator = builtin_evaluator(registry())
            .with_config(EvaluatorConfig::default().with_failure_policy(FailurePolicy::Transactional));
        let mut settings = SettingsModel::default();
        let result = evaluator.evaluate(&mut settings, &source);
        prop_assert!(!result.is_evaluated());
        prop_assert_eq!(settings, SettingsModel::default());
    }
}

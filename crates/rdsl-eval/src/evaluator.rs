//! # Script Evaluator
//!
//! The single entry point a host calls. One call evaluates one script
//! against one target and runs to completion:
//!
//! 1. Resolve the script context (explicit on the source, else classified).
//! 2. Look up the analysis schema; none means `NoApplicableSchema`.
//! 3. Parse; malformed text means `SyntaxError`.
//! 4. Check the target is the schema's top-level receiver.
//! 5. Resolve every statement against the schema.
//! 6. Apply the resolved statements in source order.
//!
//! Steps 1 to 5 never touch the target. A failure in step 6 stops the
//! script at the failing statement; whether earlier mutations stand is the
//! configured [`FailurePolicy`].
//!
//! Expected rejections are returned as [`EvaluationResult::NotEvaluated`];
//! the evaluator itself never returns `Err` and never panics on script input.

use std::sync::Arc;

use rdsl_core::{ScriptContext, ScriptSource};
use rdsl_schema::{AnalysisSchema, SchemaRegistry, ScriptSchemaBuildingResult};

use crate::config::{EvaluatorConfig, FailurePolicy};
use crate::interpret::Interpreter;
use crate::parser::parse_script;
use crate::receiver::{NoRestrictedFunctions, RestrictedFunctions, ScriptReceiver};
use crate::resolve::{ResolvedScript, Resolver};
use crate::result::{EvaluationResult, NotEvaluatedReason};

// ─── Context classification ─────────────────────────────────────────

/// Decides what kind of script a source is.
pub trait ContextClassifier: Send + Sync {
    fn classify(&self, source: &ScriptSource) -> ScriptContext;
}

/// Classifies by the file-name stem before the first `.`:
/// `settings` → settings, `plugins` → plugins, `build` → project.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameClassifier;

impl ContextClassifier for FileNameClassifier {
    fn classify(&self, source: &ScriptSource) -> ScriptContext {
        let stem = source
            .file_name()
            .and_then(|name| name.split('.').next())
            .unwrap_or("");
        match stem {
            "settings" => ScriptContext::SettingsScript,
            "plugins" => ScriptContext::PluginsBlock,
            "build" => ScriptContext::ProjectScript,
            _ => ScriptContext::UnknownScript,
        }
    }
}

// ─── Evaluator ──────────────────────────────────────────────────────

/// Evaluates scripts against schemas from a [`SchemaRegistry`].
#[derive(Clone)]
pub struct ScriptEvaluator<'r> {
    registry: &'r SchemaRegistry,
    classifier: Arc<dyn ContextClassifier>,
    functions: Arc<dyn RestrictedFunctions>,
    config: EvaluatorConfig,
}

impl std::fmt::Debug for ScriptEvaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEvaluator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'r> ScriptEvaluator<'r> {
    /// An evaluator with file-name classification, no restricted functions,
    /// and default configuration.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            classifier: Arc::new(FileNameClassifier),
            functions: Arc::new(NoRestrictedFunctions),
            config: EvaluatorConfig::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ContextClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_functions(mut self, functions: Arc<dyn RestrictedFunctions>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// The context `source` is evaluated as.
    pub fn context_of(&self, source: &ScriptSource) -> ScriptContext {
        source
            .context()
            .unwrap_or_else(|| self.classifier.classify(source))
    }

    /// Evaluate `source` against `target`, honoring the configured failure
    /// policy. Under [`FailurePolicy::Transactional`] the script runs against
    /// a clone and `target` is replaced only on success.
    pub fn evaluate<T>(&self, target: &mut T, source: &ScriptSource) -> EvaluationResult
    where
        T: ScriptReceiver + Clone,
    {
        match self.config.failure_policy {
            FailurePolicy::AbortInPlace => self.evaluate_in_place(target, source),
            FailurePolicy::Transactional => {
                let mut scratch = target.clone();
                let result = self.evaluate_in_place(&mut scratch, source);
                if result.is_evaluated() {
                    *target = scratch;
                }
                result
            }
        }
    }

    /// Evaluate `source` directly against `target`. Mutations applied before
    /// a failing statement stand, whatever the configured policy.
    pub fn evaluate_in_place(
        &self,
        target: &mut dyn ScriptReceiver,
        source: &ScriptSource,
    ) -> EvaluationResult {
        let context = self.context_of(source);
        let result = self.prepare(context, source).and_then(|(schema, resolved)| {
            if target.receiver_type() != schema.top_level().as_str() {
                return Err(NotEvaluatedReason::nesting(
                    schema.top_level(),
                    target.receiver_type(),
                    "target is not the top-level receiver of this script context",
                ));
            }
            Interpreter::new(self.functions.as_ref()).apply(target, &resolved)
        });
        self.report(context, source, result)
    }

    /// Parse and resolve `source` without applying it.
    pub fn check(&self, source: &ScriptSource) -> EvaluationResult {
        let context = self.context_of(source);
        let result = self.prepare(context, source).map(drop);
        self.report(context, source, result)
    }

    fn prepare(
        &self,
        context: ScriptContext,
        source: &ScriptSource,
    ) -> Result<(Arc<AnalysisSchema>, ResolvedScript), NotEvaluatedReason> {
        let schema = match self.registry.schema_for(context) {
            ScriptSchemaBuildingResult::SchemaAvailable(schema) => schema,
            ScriptSchemaBuildingResult::SchemaNotBuilt => {
                return Err(NotEvaluatedReason::NoApplicableSchema)
            }
        };
        tracing::debug!(
            script = source.display_name(),
            %context,
            top_level = %schema.top_level(),
            "script context resolved"
        );

        let script = parse_script(source.text()).map_err(|e| {
            if e.is_nesting_limit() {
                NotEvaluatedReason::nesting(
                    "",
                    schema.top_level(),
                    format!("script nests deeper than the parser allows ({})", e.location),
                )
            } else {
                NotEvaluatedReason::SyntaxError {
                    location: e.location,
                    message: e.message,
                }
            }
        })?;
        let resolved = Resolver::new(&schema, self.config.max_nesting_depth).resolve(&script)?;
        tracing::trace!(
            script = source.display_name(),
            statements = resolved.statement_count(),
            "script resolved"
        );
        Ok((schema, resolved))
    }

    fn report(
        &self,
        context: ScriptContext,
        source: &ScriptSource,
        result: Result<(), NotEvaluatedReason>,
    ) -> EvaluationResult {
        match &result {
            Ok(()) => tracing::debug!(script = source.display_name(), %context, "script evaluated"),
            Err(NotEvaluatedReason::NoApplicableSchema) => {
                tracing::debug!(script = source.display_name(), %context, "no schema, script skipped")
            }
            Err(reason) => tracing::warn!(
                script = source.display_name(),
                %context,
                cause = reason.kind(),
                "script not evaluated: {reason}"
            ),
        }
        EvaluationResult::from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_classification() {
        let classify = |name: &str| FileNameClassifier.classify(&ScriptSource::inline("s", "").with_file_name(name));
        assert_eq!(classify("settings.rdsl"), ScriptContext::SettingsScript);
        assert_eq!(classify("settings.gradle.dcl"), ScriptContext::SettingsScript);
        assert_eq!(classify("plugins.rdsl"), ScriptContext::PluginsBlock);
        assert_eq!(classify("build.rdsl"), ScriptContext::ProjectScript);
        assert_eq!(classify("init.rdsl"), ScriptContext::UnknownScript);
        assert_eq!(classify("Settings.rdsl"), ScriptContext::UnknownScript);
        assert_eq!(
            FileNameClassifier.classify(&ScriptSource::inline("s", "")),
            ScriptContext::UnknownScript
        );
    }

    #[test]
    fn explicit_context_overrides_classification() {
        let registry = SchemaRegistry::global().unwrap();
        let evaluator = ScriptEvaluator::new(registry);
        let source = ScriptSource::inline("s", "")
            .with_file_name("build.rdsl")
            .with_context(ScriptContext::PluginsBlock);
        assert_eq!(evaluator.context_of(&source), ScriptContext::PluginsBlock);
    }

    #[test]
    fn unknown_script_is_not_evaluated() {
        let registry = SchemaRegistry::global().unwrap();
        let evaluator = ScriptEvaluator::new(registry);
        let source = ScriptSource::inline("s", "include(\":a\")").with_file_name("random.rdsl");
        assert_eq!(
            evaluator.check(&source),
            EvaluationResult::NotEvaluated(NotEvaluatedReason::NoApplicableSchema)
        );
    }

    #[test]
    fn check_reports_syntax_errors() {
        let registry = SchemaRegistry::global().unwrap();
        let evaluator = ScriptEvaluator::new(registry);
        let source = ScriptSource::inline("s", "include(")
            .with_context(ScriptContext::SettingsScript);
        assert!(matches!(
            evaluator.check(&source).reason(),
            Some(NotEvaluatedReason::SyntaxError { location, .. }) if location.line == 1
        ));
    }
}

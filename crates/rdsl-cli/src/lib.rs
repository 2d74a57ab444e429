//! # rdsl-cli — Command-Line Front End
//!
//! Provides the `rdsl` command:
//!
//! ```bash
//! rdsl eval settings.rdsl                  # evaluate, print the configured model
//! rdsl eval build.rdsl --transactional     # roll back on a failing statement
//! rdsl check plugins.rdsl                  # parse and resolve only
//! rdsl schema project                      # analysis schema and fingerprint
//! rdsl contexts                            # contexts and their top-level receivers
//! ```
//!
//! Every subcommand handler returns the process exit code: `0` on success,
//! `1` when a script was not evaluated. Operational failures (unreadable
//! files, invalid configuration) surface as `Err`.

pub mod eval;
pub mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use rdsl_core::{ScriptContext, ScriptSource};
use rdsl_eval::EvaluatorConfig;
use rdsl_schema::SchemaRegistry;

/// Evaluator configuration: the file given by `--config` if any, then
/// `RDSL_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<EvaluatorConfig> {
    let base = match path {
        Some(path) => EvaluatorConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => EvaluatorConfig::default(),
    };
    base.with_env().context("invalid RDSL_* environment override")
}

/// Read a script file, pinning its context when one was given.
pub fn load_script(path: &Path, context: Option<ScriptContext>) -> Result<ScriptSource> {
    let source = ScriptSource::from_file(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    Ok(match context {
        Some(context) => source.with_context(context),
        None => source,
    })
}

/// The process-wide registry of built-in schemas.
pub fn registry() -> Result<&'static SchemaRegistry> {
    SchemaRegistry::global().context("built-in surface catalog is inconsistent")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdsl_eval::FailurePolicy;

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("absent.yaml"));
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rdsl.yaml");
        std::fs::write(&path, "failure_policy: transactional\nmax_nesting_depth: 4\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::Transactional);
        assert_eq!(config.max_nesting_depth, 4);
    }

    #[test]
    fn explicit_context_is_pinned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anything.rdsl");
        std::fs::write(&path, "").unwrap();
        let source = load_script(&path, Some(ScriptContext::PluginsBlock)).unwrap();
        assert_eq!(source.context(), Some(ScriptContext::PluginsBlock));
        assert_eq!(source.file_name(), Some("anything.rdsl"));
    }

    #[test]
    fn missing_script_is_an_error() {
        assert!(load_script(Path::new("/nonexistent/build.rdsl"), None).is_err());
    }
}

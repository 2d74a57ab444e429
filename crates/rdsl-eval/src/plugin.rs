//! # Script-Plugin Adapter
//!
//! Glue between the evaluator and a host's plugin-application flow. It holds
//! no schema or evaluation logic:
//!
//! - on `Evaluated` it locks the enclosing configuration scope exactly once;
//! - on `NotEvaluated` it returns [`RestrictedDslNotEvaluated`], the only
//!   place an expected script rejection becomes an `Err`.

use rdsl_core::ScriptSource;
use thiserror::Error;

use crate::evaluator::ScriptEvaluator;
use crate::receiver::ScriptReceiver;
use crate::result::{EvaluationResult, NotEvaluatedReason};

/// A host configuration scope that stops accepting mutation once a script
/// has configured it.
pub trait ConfigurationScope {
    fn lock(&mut self);
}

/// A scope that records whether it has been locked and how often.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeLock {
    locks: u32,
}

impl ScopeLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locks > 0
    }

    /// Number of times `lock` was called.
    pub fn lock_count(&self) -> u32 {
        self.locks
    }
}

impl ConfigurationScope for ScopeLock {
    fn lock(&mut self) {
        self.locks += 1;
    }
}

/// A restricted script was rejected while applying it as a plugin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("restricted script {} was not evaluated: {reason}", .script.display_name())]
pub struct RestrictedDslNotEvaluated {
    /// The rejected script, text included.
    pub script: ScriptSource,
    /// Structured cause.
    pub reason: NotEvaluatedReason,
}

/// A script bound to an evaluator, applied like a plugin.
#[derive(Debug, Clone)]
pub struct RestrictedScriptPlugin<'r> {
    evaluator: ScriptEvaluator<'r>,
    source: ScriptSource,
}

impl<'r> RestrictedScriptPlugin<'r> {
    pub fn new(evaluator: ScriptEvaluator<'r>, source: ScriptSource) -> Self {
        Self { evaluator, source }
    }

    pub fn source(&self) -> &ScriptSource {
        &self.source
    }

    /// Evaluate the script against `target`, then lock `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`RestrictedDslNotEvaluated`] if the script was not
    /// evaluated; `scope` is left unlocked.
    pub fn apply<T, S>(&self, target: &mut T, scope: &mut S) -> Result<(), RestrictedDslNotEvaluated>
    where
        T: ScriptReceiver + Clone,
        S: ConfigurationScope + ?Sized,
    {
        match self.evaluator.evaluate(target, &self.source) {
            EvaluationResult::Evaluated => {
                scope.lock();
                tracing::info!(script = self.source.display_name(), "restricted script applied");
                Ok(())
            }
            EvaluationResult::NotEvaluated(reason) => Err(RestrictedDslNotEvaluated {
                script: self.source.clone(),
                reason,
            }),
        }
    }
}

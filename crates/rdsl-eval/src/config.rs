//! Evaluator configuration.
//!
//! Defaults are abort-in-place with a nesting bound of 32. Override via
//! environment variables, a YAML file, or explicit construction.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What happens to mutations applied before a failing statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Mutations applied before the failure stand.
    #[default]
    AbortInPlace,
    /// The script runs against a copy; the target changes only on success.
    Transactional,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AbortInPlace => "abort_in_place",
            Self::Transactional => "transactional",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort_in_place" | "abort-in-place" | "in_place" | "incremental" => {
                Ok(Self::AbortInPlace)
            }
            "transactional" | "atomic" => Ok(Self::Transactional),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

pub const ENV_FAILURE_POLICY: &str = "RDSL_FAILURE_POLICY";
pub const ENV_MAX_NESTING_DEPTH: &str = "RDSL_MAX_NESTING_DEPTH";

/// Configuration for [`ScriptEvaluator`](crate::ScriptEvaluator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    pub failure_policy: FailurePolicy,
    /// Maximum block nesting depth. Zero forbids blocks entirely.
    pub max_nesting_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::AbortInPlace,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl EvaluatorConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `RDSL_FAILURE_POLICY` (`abort_in_place` or `transactional`, default: `abort_in_place`)
    /// - `RDSL_MAX_NESTING_DEPTH` (default: 32)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Apply environment overrides on top of `self`.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(
            std::env::var(ENV_FAILURE_POLICY).ok().as_deref(),
            std::env::var(ENV_MAX_NESTING_DEPTH).ok().as_deref(),
        )
    }

    fn with_overrides(mut self, policy: Option<&str>, depth: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = policy {
            self.failure_policy = raw.parse()?;
        }
        if let Some(raw) = depth {
            self.max_nesting_depth = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidDepth(raw.to_string()))?;
        }
        Ok(self)
    }

    /// Load configuration from a YAML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file cannot be read, `ConfigError::Yaml` if
    /// it is not a valid configuration document.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid failure policy {0:?}; expected abort_in_place or transactional")]
    InvalidPolicy(String),
    #[error("invalid max nesting depth {0:?}")]
    InvalidDepth(String),
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

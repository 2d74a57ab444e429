//! # Script Context — What Kind of Script Is This?
//!
//! Defines `ScriptContext`, the closed classification that decides which
//! analysis schema (if any) a script is checked against. The context is
//! determined once per script, before schema lookup, and never changes.
//!
//! `UnknownScript` is a real variant, not an error: a script nobody
//! recognizes has no schema, and absence of a schema is absence of
//! permission.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RdslError;

/// Classification of a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptContext {
    /// Settings script: configures the settings receiver and its project
    /// descriptors.
    SettingsScript,
    /// A `plugins { }` block: configures the plugin request list.
    PluginsBlock,
    /// Project build script: configures a project's dependencies and
    /// coordinates.
    ProjectScript,
    /// Anything else. Never has a schema.
    UnknownScript,
}

/// Total number of script contexts.
pub const SCRIPT_CONTEXT_COUNT: usize = 4;

impl ScriptContext {
    /// Returns all contexts in canonical order.
    pub fn all() -> &'static [ScriptContext] {
        &[
            Self::SettingsScript,
            Self::PluginsBlock,
            Self::ProjectScript,
            Self::UnknownScript,
        ]
    }

    /// Short name used on the command line and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SettingsScript => "settings",
            Self::PluginsBlock => "plugins",
            Self::ProjectScript => "project",
            Self::UnknownScript => "unknown",
        }
    }
}

impl fmt::Display for ScriptContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptContext {
    type Err = RdslError;

    /// Parse a context from its short name, as produced by [`ScriptContext::as_str`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "settings" => Ok(Self::SettingsScript),
            "plugins" => Ok(Self::PluginsBlock),
            "project" => Ok(Self::ProjectScript),
            "unknown" => Ok(Self::UnknownScript),
            other => Err(RdslError::UnknownContext(other.to_string())),
        }
    }
}

//! # Script Source
//!
//! The host-owned handle to a script: a display name for diagnostics, an
//! optional file name used for context classification, the text itself,
//! and an optional explicit context that overrides classification.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::ScriptContext;
use crate::error::RdslError;

/// A script handed to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSource {
    display_name: String,
    file_name: Option<String>,
    text: String,
    context: Option<ScriptContext>,
}

impl ScriptSource {
    /// A script that does not come from a file.
    pub fn inline(display_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            file_name: None,
            text: text.into(),
            context: None,
        }
    }

    /// Read a script from disk. The display name is the path as given and
    /// the file name is its final component.
    ///
    /// # Errors
    ///
    /// Returns `RdslError::Io` if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, RdslError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self {
            display_name: path.display().to_string(),
            file_name: path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string),
            text,
            context: None,
        })
    }

    /// Attach a file name used for classification.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Pin the script context, bypassing classification.
    pub fn with_context(mut self, context: ScriptContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Name used in diagnostics.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// File name, if the script came from (or claims to be) a file.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Script text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Explicitly pinned context, if any.
    pub fn context(&self) -> Option<ScriptContext> {
        self.context
    }
}

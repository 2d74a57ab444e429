//! The model a script of a given context is evaluated against.

use rdsl_core::{HostError, ScriptContext, Value};
use rdsl_eval::ScriptReceiver;
use serde::Serialize;

use crate::plugins::PluginsModel;
use crate::project::ProjectModel;
use crate::settings::SettingsModel;

/// Top-level target for each context with a built-in schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "context", rename_all = "snake_case")]
pub enum TargetModel {
    Settings(SettingsModel),
    Plugins(PluginsModel),
    Project(ProjectModel),
}

impl TargetModel {
    /// A fresh target for `context`; `None` for contexts without a schema.
    pub fn for_context(context: ScriptContext) -> Option<Self> {
        match context {
            ScriptContext::SettingsScript => Some(Self::Settings(SettingsModel::default())),
            ScriptContext::PluginsBlock => Some(Self::Plugins(PluginsModel::default())),
            ScriptContext::ProjectScript => Some(Self::Project(ProjectModel::default())),
            ScriptContext::UnknownScript => None,
        }
    }

    pub fn context(&self) -> ScriptContext {
        match self {
            Self::Settings(_) => ScriptContext::SettingsScript,
            Self::Plugins(_) => ScriptContext::PluginsBlock,
            Self::Project(_) => ScriptContext::ProjectScript,
        }
    }

    fn inner(&self) -> &dyn ScriptReceiver {
        match self {
            Self::Settings(m) => m,
            Self::Plugins(m) => m,
            Self::Project(m) => m,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ScriptReceiver {
        match self {
            Self::Settings(m) => m,
            Self::Plugins(m) => m,
            Self::Project(m) => m,
        }
    }
}

impl ScriptReceiver for TargetModel {
    fn receiver_type(&self) -> &str {
        self.inner().receiver_type()
    }

    fn read_property(&self, name: &str) -> Result<Value, HostError> {
        self.inner().read_property(name)
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        self.inner_mut().write_property(name, value)
    }

    fn navigate(&mut self, name: &str) -> Option<&mut dyn ScriptReceiver> {
        self.inner_mut().navigate(name)
    }

    fn add(&mut self, name: &str, args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        self.inner_mut().add(name, args)
    }

    fn configure(&mut self, name: &str, args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        self.inner_mut().configure(name, args)
    }
}

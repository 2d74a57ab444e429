//! `plugins { }` block target.

use rdsl_core::{HostError, Value};
use rdsl_eval::ScriptReceiver;
use rdsl_schema::builtin::{PLUGINS_TOP_LEVEL, PLUGIN_DEPENDENCIES_SCOPE, PLUGIN_SPEC};
use serde::Serialize;

const KOTLIN_PLUGIN_PREFIX: &str = "org.jetbrains.kotlin.";

/// One requested plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSpec {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub apply: bool,
}

impl PluginSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            apply: true,
        }
    }
}

impl ScriptReceiver for PluginSpec {
    fn receiver_type(&self) -> &str {
        PLUGIN_SPEC
    }

    fn read_property(&self, name: &str) -> Result<Value, HostError> {
        match name {
            "id" => Ok(Value::from(self.id.as_str())),
            // An unset version reads as empty.
            "version" => Ok(Value::from(self.version.as_deref().unwrap_or(""))),
            "apply" => Ok(Value::Bool(self.apply)),
            _ => Err(HostError::unsupported(PLUGIN_SPEC, name)),
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        match (name, value) {
            ("version", Value::Str(v)) => {
                if v.trim().is_empty() {
                    return Err(HostError::invalid_argument(name, "plugin version must not be blank"));
                }
                self.version = Some(v);
            }
            ("apply", Value::Bool(b)) => self.apply = b,
            _ => return Err(HostError::unsupported(PLUGIN_SPEC, name)),
        }
        Ok(())
    }
}

/// The requests collected inside `plugins { }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginRequests {
    pub requests: Vec<PluginSpec>,
}

impl PluginRequests {
    fn request(&mut self, id: String) -> Result<&mut PluginSpec, HostError> {
        if id.is_empty() || id.starts_with('.') || id.ends_with('.') || id.contains("..") {
            return Err(HostError::invalid_argument("id", format!("{id:?} is not a plugin id")));
        }
        if self.requests.iter().any(|r| r.id == id) {
            return Err(HostError::Rejected(format!("plugin {id} requested more than once")));
        }
        tracing::debug!(%id, "plugin requested");
        self.requests.push(PluginSpec::new(id));
        let last = self.requests.len() - 1;
        Ok(&mut self.requests[last])
    }

    pub fn get(&self, id: &str) -> Option<&PluginSpec> {
        self.requests.iter().find(|r| r.id == id)
    }
}

impl ScriptReceiver for PluginRequests {
    fn receiver_type(&self) -> &str {
        PLUGIN_DEPENDENCIES_SCOPE
    }

    fn add(&mut self, name: &str, args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        let arg = match args.into_iter().next() {
            Some(Value::Str(s)) => s,
            _ => return Err(HostError::invalid_argument(name, "expected one string")),
        };
        let id = match name {
            "id" => arg,
            "kotlin" => format!("{KOTLIN_PLUGIN_PREFIX}{arg}"),
            _ => return Err(HostError::unsupported(PLUGIN_DEPENDENCIES_SCOPE, name)),
        };
        let spec = self.request(id)?;
        Ok(Some(spec))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginsModel {
    pub plugins: PluginRequests,
}

impl ScriptReceiver for PluginsModel {
    fn receiver_type(&self) -> &str {
        PLUGINS_TOP_LEVEL
    }

    fn configure(&mut self, name: &str, _args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        match name {
            "plugins" => Ok(Some(&mut self.plugins)),
            _ => Err(HostError::unsupported(PLUGINS_TOP_LEVEL, name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kotlin_shorthand_expands() {
        let mut requests = PluginRequests::default();
        requests.add("kotlin", vec![Value::from("jvm")]).unwrap();
        assert!(requests.get("org.jetbrains.kotlin.jvm").is_some());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut requests = PluginRequests::default();
        requests.add("id", vec![Value::from("java")]).unwrap();
        let err = requests.add("id", vec![Value::from("java")]).err().unwrap();
        assert!(matches!(err, HostError::Rejected(_)));
        assert_eq!(requests.requests.len(), 1);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        let mut requests = PluginRequests::default();
        for bad in ["", ".java", "java.", "a..b"] {
            assert!(requests.add("id", vec![Value::from(bad)]).is_err(), "{bad}");
        }
    }

    #[test]
    fn added_spec_is_the_returned_receiver() {
        let mut requests = PluginRequests::default();
        let spec = requests
            .add("id", vec![Value::from("org.example")])
            .unwrap()
            .unwrap();
        assert_eq!(spec.receiver_type(), PLUGIN_SPEC);
        spec.write_property("version", Value::from("1.0")).unwrap();
        spec.write_property("apply", Value::Bool(false)).unwrap();
        let got = requests.get("org.example").unwrap();
        assert_eq!(got.version.as_deref(), Some("1.0"));
        assert!(!got.apply);
    }

    #[test]
    fn unset_version_reads_empty_and_id_is_read_only() {
        let mut spec = PluginSpec::new("java");
        assert_eq!(spec.read_property("version").unwrap(), Value::from(""));
        assert!(spec.write_property("id", Value::from("x")).is_err());
    }
}

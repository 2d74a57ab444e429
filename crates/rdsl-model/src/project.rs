//! Project build script target.

use rdsl_core::{HostError, Value};
use rdsl_eval::ScriptReceiver;
use rdsl_schema::builtin::{DEPENDENCIES_HANDLER, DEPENDENCY_CONFIGURATIONS, PROJECT_DEPENDENCY, PROJECT_TOP_LEVEL};
use serde::Serialize;

/// A declared dependency on another project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyEntry {
    pub configuration: String,
    pub project: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependenciesModel {
    pub entries: Vec<DependencyEntry>,
}

impl DependenciesModel {
    /// Entries declared in `configuration`, in declaration order.
    pub fn in_configuration<'a>(&'a self, configuration: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.configuration == configuration)
            .map(|e| e.project.as_str())
    }
}

impl ScriptReceiver for DependenciesModel {
    fn receiver_type(&self) -> &str {
        DEPENDENCIES_HANDLER
    }

    fn add(&mut self, name: &str, args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        if !DEPENDENCY_CONFIGURATIONS.contains(&name) {
            return Err(HostError::unsupported(DEPENDENCIES_HANDLER, name));
        }
        let project = match args.as_slice() {
            [Value::Object(obj)] if obj.type_name == PROJECT_DEPENDENCY => obj.key.clone(),
            _ => {
                return Err(HostError::invalid_argument(
                    name,
                    format!("expected one {PROJECT_DEPENDENCY}"),
                ))
            }
        };
        tracing::debug!(configuration = name, %project, "dependency declared");
        self.entries.push(DependencyEntry {
            configuration: name.to_string(),
            project,
        });
        Ok(None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dependencies: DependenciesModel,
}

impl ProjectModel {
    fn slot(&self, name: &str) -> Option<&Option<String>> {
        match name {
            "group" => Some(&self.group),
            "version" => Some(&self.version),
            "description" => Some(&self.description),
            _ => None,
        }
    }
}

impl ScriptReceiver for ProjectModel {
    fn receiver_type(&self) -> &str {
        PROJECT_TOP_LEVEL
    }

    fn read_property(&self, name: &str) -> Result<Value, HostError> {
        self.slot(name)
            .map(|v| Value::from(v.as_deref().unwrap_or("")))
            .ok_or_else(|| HostError::unsupported(PROJECT_TOP_LEVEL, name))
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        let Value::Str(s) = value else {
            return Err(HostError::invalid_argument(name, "expected a string"));
        };
        let slot = match name {
            "group" => &mut self.group,
            "version" => &mut self.version,
            "description" => &mut self.description,
            _ => return Err(HostError::unsupported(PROJECT_TOP_LEVEL, name)),
        };
        *slot = Some(s);
        Ok(())
    }

    fn navigate(&mut self, name: &str) -> Option<&mut dyn ScriptReceiver> {
        match name {
            "dependencies" => Some(&mut self.dependencies),
            _ => None,
        }
    }

    fn configure(&mut self, name: &str, _args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        match name {
            "dependencies" => Ok(Some(&mut self.dependencies)),
            _ => Err(HostError::unsupported(PROJECT_TOP_LEVEL, name)),
        }
    }
}

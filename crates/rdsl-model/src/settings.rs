//! Settings script target: the settings receiver and the root project
//! descriptor it exposes as `rootProject`.

use rdsl_core::{HostError, Value};
use rdsl_eval::ScriptReceiver;
use rdsl_schema::builtin::{PROJECT_DESCRIPTOR, SETTINGS};
use serde::Serialize;

/// Feature previews `enableFeaturePreview` accepts.
pub const KNOWN_FEATURE_PREVIEWS: [&str; 3] = [
    "TYPESAFE_PROJECT_ACCESSORS",
    "STABLE_CONFIGURATION_CACHE",
    "GROOVY_COMPILATION_AVOIDANCE",
];

/// Characters a project name may not contain.
const FORBIDDEN_NAME_CHARS: [char; 9] = ['/', '\\', ':', '<', '>', '"', '?', '*', '|'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptorModel {
    pub name: String,
    pub path: String,
    pub build_file_name: String,
}

impl ProjectDescriptorModel {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: ":".to_string(),
            build_file_name: "build.rdsl".to_string(),
        }
    }
}

impl Default for ProjectDescriptorModel {
    fn default() -> Self {
        Self::root("root")
    }
}

fn validate_project_name(name: &str) -> Result<(), HostError> {
    if name.is_empty() {
        return Err(HostError::invalid_argument("name", "project name must not be empty"));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(HostError::invalid_argument(
            "name",
            format!("project name {name:?} must not contain {c:?}"),
        ));
    }
    Ok(())
}

impl ScriptReceiver for ProjectDescriptorModel {
    fn receiver_type(&self) -> &str {
        PROJECT_DESCRIPTOR
    }

    fn read_property(&self, name: &str) -> Result<Value, HostError> {
        match name {
            "name" => Ok(Value::from(self.name.as_str())),
            "path" => Ok(Value::from(self.path.as_str())),
            "buildFileName" => Ok(Value::from(self.build_file_name.as_str())),
            _ => Err(HostError::unsupported(PROJECT_DESCRIPTOR, name)),
        }
    }

    fn write_property(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        match (name, value) {
            ("name", Value::Str(s)) => {
                validate_project_name(&s)?;
                self.name = s;
            }
            ("buildFileName", Value::Str(s)) => {
                if s.is_empty() {
                    return Err(HostError::invalid_argument(name, "build file name must not be empty"));
                }
                self.build_file_name = s;
            }
            _ => return Err(HostError::unsupported(PROJECT_DESCRIPTOR, name)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingsModel {
    pub root_project: ProjectDescriptorModel,
    /// Included project paths, normalized to a leading `:`.
    pub included: Vec<String>,
    pub feature_previews: Vec<String>,
}

impl SettingsModel {
    fn include(&mut self, path: &str) -> Result<(), HostError> {
        let trimmed = path.trim_start_matches(':');
        if trimmed.is_empty() || trimmed.split(':').any(str::is_empty) {
            return Err(HostError::invalid_argument(
                "include",
                format!("{path:?} is not a project path"),
            ));
        }
        let normalized = format!(":{trimmed}");
        if !self.included.contains(&normalized) {
            tracing::debug!(project = %normalized, "project included");
            self.included.push(normalized);
        }
        Ok(())
    }

    fn enable_feature_preview(&mut self, name: &str) -> Result<(), HostError> {
        if !KNOWN_FEATURE_PREVIEWS.contains(&name) {
            return Err(HostError::invalid_argument(
                "enableFeaturePreview",
                format!("there is no feature named {name}"),
            ));
        }
        if !self.feature_previews.iter().any(|f| f == name) {
            self.feature_previews.push(name.to_string());
        }
        Ok(())
    }
}

impl ScriptReceiver for SettingsModel {
    fn receiver_type(&self) -> &str {
        SETTINGS
    }

    fn navigate(&mut self, name: &str) -> Option<&mut dyn ScriptReceiver> {
        match name {
            "rootProject" => Some(&mut self.root_project),
            _ => None,
        }
    }

    fn add(&mut self, name: &str, args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        let arg = match args.as_slice() {
            [Value::Str(s)] => s.as_str(),
            _ => return Err(HostError::invalid_argument(name, "expected one string")),
        };
        match name {
            "include" => self.include(arg)?,
            "enableFeaturePreview" => self.enable_feature_preview(arg)?,
            _ => return Err(HostError::unsupported(SETTINGS, name)),
        }
        Ok(None)
    }
}

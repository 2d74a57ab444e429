//! Restricted functions of the built-in surfaces.

use rdsl_core::{HostError, Identifier, ObjectRef, TypeName, Value};
use rdsl_eval::RestrictedFunctions;
use rdsl_schema::builtin::{PROJECT_DEPENDENCY, PROJECT_TOP_LEVEL};

/// Serves `project(path)` on project build scripts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRestrictedFunctions;

/// `:` names the root project; otherwise `:`-separated non-empty segments
/// after a leading `:`.
pub fn is_project_path(path: &str) -> bool {
    match path.strip_prefix(':') {
        Some("") => true,
        Some(rest) => rest.split(':').all(|segment| !segment.is_empty()),
        None => false,
    }
}

fn project_dependency(args: &[Value]) -> Result<Value, HostError> {
    let path = match args {
        [Value::Str(path)] => path,
        _ => return Err(HostError::invalid_argument("project", "expected one string")),
    };
    if !is_project_path(path) {
        return Err(HostError::invalid_argument(
            "project",
            format!("{path:?} is not an absolute project path"),
        ));
    }
    let type_name = TypeName::new(PROJECT_DEPENDENCY).map_err(|e| HostError::Rejected(e.to_string()))?;
    Ok(Value::Object(ObjectRef {
        type_name,
        key: path.clone(),
    }))
}

impl RestrictedFunctions for DefaultRestrictedFunctions {
    fn invoke(&self, owner: &TypeName, name: &Identifier, args: &[Value]) -> Result<Value, HostError> {
        match (owner.as_str(), name.as_str()) {
            (PROJECT_TOP_LEVEL, "project") => project_dependency(args),
            _ => Err(HostError::unsupported(owner.as_str(), name.as_str())),
        }
    }
}

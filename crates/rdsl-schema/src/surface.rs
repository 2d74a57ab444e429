//! # Capability Surface Declarations
//!
//! A capability surface is the complete, explicit list of what a script may
//! do on one receiver type. Surfaces are plain data: they have no behavior
//! and no access to the host objects they describe.
//!
//! ## Member kinds
//!
//! - **Property**: readable value, optionally writable.
//! - **Adding function**: appends one value to a collection the receiver
//!   owns. May name an element receiver type, in which case a call can
//!   carry a block that configures the freshly added element.
//! - **Configuring function**: opens a nested block bound to a
//!   sub-receiver of the named target type.
//! - **Restricted function**: pure value factory executed by a host
//!   service, never by the receiver instance.
//!
//! ## Namespaces
//!
//! Properties and functions live in separate namespaces, so a property
//! `dependencies` and a configuring function `dependencies { }` can share a
//! name. Within one namespace names are unique.
//!
//! Composition is explicit: a receiver exposes another receiver's members
//! only through a configuring target, an adding element type, or a
//! navigable property, never through inheritance.

use std::collections::BTreeSet;
use std::fmt;

use rdsl_core::{Identifier, TypeName, ValueType};
use serde::{Deserialize, Serialize};

use crate::error::SchemaBuildError;

/// Whether a property may be assigned by scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    /// Readable only.
    ReadOnly,
    /// Readable and assignable.
    ReadWrite,
}

/// Member namespace within a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Property names.
    Property,
    /// Function names (adding, configuring, restricted).
    Function,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property => f.write_str("property"),
            Self::Function => f.write_str("function"),
        }
    }
}

/// A restricted property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: Identifier,
    pub value_type: ValueType,
    pub mutability: Mutability,
}

impl PropertyDecl {
    pub fn is_writable(&self) -> bool {
        self.mutability == Mutability::ReadWrite
    }
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: Identifier,
    pub value_type: ValueType,
}

/// Appends one value to a collection owned by the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddingFunction {
    pub name: Identifier,
    pub params: Vec<Parameter>,
    /// Receiver type of the added element, when the element is configurable.
    pub element: Option<TypeName>,
}

/// Opens a nested block bound to a sub-receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguringFunction {
    pub name: Identifier,
    pub params: Vec<Parameter>,
    pub target: TypeName,
}

/// Pure value factory executed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictedFunction {
    pub name: Identifier,
    pub params: Vec<Parameter>,
    pub returns: ValueType,
}

/// Everything a script may do on one receiver type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySurface {
    pub type_name: TypeName,
    pub properties: Vec<PropertyDecl>,
    pub adding: Vec<AddingFunction>,
    pub configuring: Vec<ConfiguringFunction>,
    pub restricted: Vec<RestrictedFunction>,
}

impl CapabilitySurface {
    /// Start declaring a surface for `type_name`.
    pub fn builder(type_name: &str) -> SurfaceBuilder {
        SurfaceBuilder {
            type_name: type_name.to_string(),
            properties: Vec::new(),
            adding: Vec::new(),
            configuring: Vec::new(),
            restricted: Vec::new(),
        }
    }

    /// Every receiver type this surface can hand a script into, with the
    /// member that does so. Object-typed properties are included; whether
    /// they are navigable depends on the schema they end up in.
    pub fn outgoing_targets(&self) -> Vec<(&Identifier, &TypeName)> {
        let mut targets = Vec::new();
        for p in &self.properties {
            if let ValueType::Object(t) = &p.value_type {
                targets.push((&p.name, t));
            }
        }
        for a in &self.adding {
            if let Some(t) = &a.element {
                targets.push((&a.name, t));
            }
        }
        for c in &self.configuring {
            targets.push((&c.name, &c.target));
        }
        targets
    }
}

/// Parse a type spelled the way surface tables spell it:
/// `String`, `Int`, `Boolean`, `Unit`, or an object type name.
pub fn parse_value_type(spec: &str) -> Result<ValueType, SchemaBuildError> {
    Ok(match spec {
        "String" => ValueType::String,
        "Int" => ValueType::Int,
        "Boolean" => ValueType::Boolean,
        "Unit" => ValueType::Unit,
        other => ValueType::Object(TypeName::new(other)?),
    })
}

fn parse_params(params: &[(String, String)]) -> Result<Vec<Parameter>, SchemaBuildError> {
    params
        .iter()
        .map(|(name, ty)| {
            Ok(Parameter {
                name: Identifier::new(name.as_str())?,
                value_type: parse_value_type(ty)?,
            })
        })
        .collect()
}

fn owned_params(params: &[(&str, &str)]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(n, t)| (n.to_string(), t.to_string()))
        .collect()
}

/// Collects a surface declaration as text and validates it in [`build`].
///
/// [`build`]: SurfaceBuilder::build
#[derive(Debug, Clone)]
pub struct SurfaceBuilder {
    type_name: String,
    properties: Vec<(String, String, Mutability)>,
    adding: Vec<(String, Vec<(String, String)>, Option<String>)>,
    configuring: Vec<(String, Vec<(String, String)>, String)>,
    restricted: Vec<(String, Vec<(String, String)>, String)>,
}

impl SurfaceBuilder {
    /// Declare a property.
    pub fn property(mut self, name: &str, ty: &str, mutability: Mutability) -> Self {
        self.properties
            .push((name.to_string(), ty.to_string(), mutability));
        self
    }

    /// Declare a read-only property.
    pub fn read_only(self, name: &str, ty: &str) -> Self {
        self.property(name, ty, Mutability::ReadOnly)
    }

    /// Declare a read-write property.
    pub fn read_write(self, name: &str, ty: &str) -> Self {
        self.property(name, ty, Mutability::ReadWrite)
    }

    /// Declare an adding function whose element is not configurable.
    pub fn adding(mut self, name: &str, params: &[(&str, &str)]) -> Self {
        self.adding
            .push((name.to_string(), owned_params(params), None));
        self
    }

    /// Declare an adding function whose added element is a receiver of type
    /// `element` and may be configured by a trailing block.
    pub fn adding_configurable(mut self, name: &str, params: &[(&str, &str)], element: &str) -> Self {
        self.adding.push((
            name.to_string(),
            owned_params(params),
            Some(element.to_string()),
        ));
        self
    }

    /// Declare a configuring function.
    pub fn configuring(mut self, name: &str, params: &[(&str, &str)], target: &str) -> Self {
        self.configuring
            .push((name.to_string(), owned_params(params), target.to_string()));
        self
    }

    /// Declare a restricted (value factory) function.
    pub fn restricted(mut self, name: &str, params: &[(&str, &str)], returns: &str) -> Self {
        self.restricted
            .push((name.to_string(), owned_params(params), returns.to_string()));
        self
    }

    /// Validate names and per-namespace uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `SchemaBuildError::InvalidName` for a malformed name and
    /// `SchemaBuildError::DuplicateMember` for a repeated one.
    pub fn build(self) -> Result<CapabilitySurface, SchemaBuildError> {
        let type_name = TypeName::new(self.type_name)?;

        let mut property_names = BTreeSet::new();
        let mut function_names = BTreeSet::new();
        let mut claim = |namespace: Namespace, name: &Identifier| {
            let fresh = match namespace {
                Namespace::Property => property_names.insert(name.clone()),
                Namespace::Function => function_names.insert(name.clone()),
            };
            if fresh {
                Ok(())
            } else {
                Err(SchemaBuildError::DuplicateMember {
                    receiver: type_name.to_string(),
                    namespace,
                    name: name.to_string(),
                })
            }
        };

        let mut properties = Vec::with_capacity(self.properties.len());
        for (name, ty, mutability) in &self.properties {
            let name = Identifier::new(name.as_str())?;
            claim(Namespace::Property, &name)?;
            properties.push(PropertyDecl {
                name,
                value_type: parse_value_type(ty)?,
                mutability: *mutability,
            });
        }

        let mut adding = Vec::with_capacity(self.adding.len());
        for (name, params, element) in &self.adding {
            let name = Identifier::new(name.as_str())?;
            claim(Namespace::Function, &name)?;
            adding.push(AddingFunction {
                name,
                params: parse_params(params)?,
                element: element.as_deref().map(TypeName::new).transpose()?,
            });
        }

        let mut configuring = Vec::with_capacity(self.configuring.len());
        for (name, params, target) in &self.configuring {
            let name = Identifier::new(name.as_str())?;
            claim(Namespace::Function, &name)?;
            configuring.push(ConfiguringFunction {
                name,
                params: parse_params(params)?,
                target: TypeName::new(target.as_str())?,
            });
        }

        let mut restricted = Vec::with_capacity(self.restricted.len());
        for (name, params, returns) in &self.restricted {
            let name = Identifier::new(name.as_str())?;
            claim(Namespace::Function, &name)?;
            restricted.push(RestrictedFunction {
                name,
                params: parse_params(params)?,
                returns: parse_value_type(returns)?,
            });
        }

        Ok(CapabilitySurface {
            type_name,
            properties,
            adding,
            configuring,
            restricted,
        })
    }
}

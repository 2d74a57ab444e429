//! # Analysis Schema
//!
//! The compiled, closed catalogue of what a script of one context may do.
//! An `AnalysisSchema` is immutable once built and carries:
//!
//! - the top-level receiver type,
//! - the surfaces reachable from it,
//! - a resolution index keyed by (receiver, namespace, identifier).
//!
//! Per-script resolution is a lookup in that index. There is no reflection
//! and no fallback: a key that is not in the index is not legal.
//!
//! ## Canonical Form
//!
//! Every map is a `BTreeMap`, so the JSON form is deterministic and its
//! SHA-256 [`fingerprint`](AnalysisSchema::fingerprint) is a deep-equality
//! witness for two independently derived schemas.

use std::collections::BTreeMap;
use std::fmt;

use rdsl_core::{canonical_digest, ContentDigest, Identifier, RdslError, TypeName, ValueType};
use serde::{Serialize, Serializer};

use crate::surface::{
    AddingFunction, CapabilitySurface, ConfiguringFunction, Namespace, Parameter, PropertyDecl,
    RestrictedFunction,
};

/// Key of the resolution index.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResolutionKey {
    pub receiver: TypeName,
    pub namespace: Namespace,
    pub name: Identifier,
}

/// What a resolved identifier does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Property that can only be read.
    PropertyRead,
    /// Property that can be read and written.
    PropertyWrite,
    /// Appends a value to the receiver.
    AddingCall,
    /// Opens a nested block on a sub-receiver.
    ConfiguringCall,
    /// Produces a value through the host function service.
    RestrictedCall,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PropertyRead => "property-read",
            Self::PropertyWrite => "property-write",
            Self::AddingCall => "adding-call",
            Self::ConfiguringCall => "configuring-call",
            Self::RestrictedCall => "restricted-call",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry in the resolution index: the declaration an identifier
/// resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    Property(PropertyDecl),
    Adding(AddingFunction),
    Configuring(ConfiguringFunction),
    Restricted(RestrictedFunction),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Property(p) if p.is_writable() => OperationKind::PropertyWrite,
            Self::Property(_) => OperationKind::PropertyRead,
            Self::Adding(_) => OperationKind::AddingCall,
            Self::Configuring(_) => OperationKind::ConfiguringCall,
            Self::Restricted(_) => OperationKind::RestrictedCall,
        }
    }

    pub fn name(&self) -> &Identifier {
        match self {
            Self::Property(p) => &p.name,
            Self::Adding(a) => &a.name,
            Self::Configuring(c) => &c.name,
            Self::Restricted(r) => &r.name,
        }
    }

    pub fn namespace(&self) -> Namespace {
        match self {
            Self::Property(_) => Namespace::Property,
            _ => Namespace::Function,
        }
    }

    /// Parameters of a function; empty for properties.
    pub fn params(&self) -> &[Parameter] {
        match self {
            Self::Property(_) => &[],
            Self::Adding(a) => &a.params,
            Self::Configuring(c) => &c.params,
            Self::Restricted(r) => &r.params,
        }
    }

    /// Human-readable signature, e.g. `implementation(dependency: ProjectDependency)`.
    pub fn signature(&self) -> String {
        match self {
            Self::Property(p) => format!("{}: {}", p.name, p.value_type),
            Self::Adding(a) => match &a.element {
                Some(element) => format!("{}({}) {{ {element} }}", a.name, render_params(&a.params)),
                None => format!("{}({})", a.name, render_params(&a.params)),
            },
            Self::Configuring(c) => {
                format!("{}({}) {{ {} }}", c.name, render_params(&c.params), c.target)
            }
            Self::Restricted(r) => {
                format!("{}({}) -> {}", r.name, render_params(&r.params), r.returns)
            }
        }
    }
}

/// Render a parameter list as `a: String, b: Int`.
pub fn render_params(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.value_type))
        .collect::<Vec<_>>()
        .join(", ")
}

fn serialize_index<S: Serializer>(
    index: &BTreeMap<ResolutionKey, Operation>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(index.iter())
}

/// Closed catalogue of legal operations for one script context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSchema {
    top_level: TypeName,
    surfaces: BTreeMap<TypeName, CapabilitySurface>,
    #[serde(serialize_with = "serialize_index")]
    index: BTreeMap<ResolutionKey, Operation>,
}

impl AnalysisSchema {
    pub(crate) fn from_parts(
        top_level: TypeName,
        surfaces: BTreeMap<TypeName, CapabilitySurface>,
        index: BTreeMap<ResolutionKey, Operation>,
    ) -> Self {
        Self {
            top_level,
            surfaces,
            index,
        }
    }

    /// Receiver type a script of this context is bound to.
    pub fn top_level(&self) -> &TypeName {
        &self.top_level
    }

    /// Surfaces reachable from the top-level receiver.
    pub fn surfaces(&self) -> impl Iterator<Item = &CapabilitySurface> {
        self.surfaces.values()
    }

    pub fn surface(&self, type_name: &TypeName) -> Option<&CapabilitySurface> {
        self.surfaces.get(type_name)
    }

    /// Whether `type_name` is a receiver in this schema.
    pub fn is_receiver(&self, type_name: &TypeName) -> bool {
        self.surfaces.contains_key(type_name)
    }

    /// The full resolution index.
    pub fn index(&self) -> &BTreeMap<ResolutionKey, Operation> {
        &self.index
    }

    /// Resolve `name` in `namespace` on `receiver`.
    pub fn lookup(
        &self,
        receiver: &TypeName,
        namespace: Namespace,
        name: &Identifier,
    ) -> Option<&Operation> {
        self.index.get(&ResolutionKey {
            receiver: receiver.clone(),
            namespace,
            name: name.clone(),
        })
    }

    /// Resolve a property on `receiver`.
    pub fn lookup_property(&self, receiver: &TypeName, name: &Identifier) -> Option<&PropertyDecl> {
        match self.lookup(receiver, Namespace::Property, name) {
            Some(Operation::Property(p)) => Some(p),
            _ => None,
        }
    }

    /// Resolve a function of any kind on `receiver`.
    pub fn lookup_function(&self, receiver: &TypeName, name: &Identifier) -> Option<&Operation> {
        self.lookup(receiver, Namespace::Function, name)
    }

    /// If `property` is navigable in this schema, the receiver type it leads to.
    pub fn navigable_target<'a>(&self, property: &'a PropertyDecl) -> Option<&'a TypeName> {
        match &property.value_type {
            ValueType::Object(t) if self.is_receiver(t) => Some(t),
            _ => None,
        }
    }

    /// SHA-256 of the canonical JSON form.
    ///
    /// # Errors
    ///
    /// Returns `RdslError::Serialization` if serialization fails.
    pub fn fingerprint(&self) -> Result<ContentDigest, RdslError> {
        canonical_digest(self)
    }
}

//! # Host Binding
//!
//! The evaluator never touches host objects except through these two
//! traits. Everything a script may do has already been checked against the
//! analysis schema by the time a method here is called, so implementations
//! only need to handle the names their surface declares.
//!
//! ## Security Invariant
//!
//! A receiver implementation may expose more than its surface declares, but
//! scripts cannot reach it: calls are only issued for resolved identifiers.

use rdsl_core::{HostError, Identifier, TypeName, Value};

/// A host object a block of script statements is bound to.
///
/// Every method except [`receiver_type`](Self::receiver_type) has a default
/// that reports the operation as unsupported.
pub trait ScriptReceiver {
    /// Receiver type name. Must equal the surface type the schema expects
    /// at the position the receiver is bound.
    fn receiver_type(&self) -> &str;

    /// Read a property value.
    fn read_property(&self, name: &str) -> Result<Value, HostError> {
        Err(HostError::unsupported(self.receiver_type(), name))
    }

    /// Assign a property.
    fn write_property(&mut self, name: &str, value: Value) -> Result<(), HostError> {
        let _ = value;
        Err(HostError::unsupported(self.receiver_type(), name))
    }

    /// The sub-receiver behind a navigable property.
    fn navigate(&mut self, name: &str) -> Option<&mut dyn ScriptReceiver> {
        let _ = name;
        None
    }

    /// Invoke an adding function. Returns the added element when the element
    /// is itself a receiver.
    fn add(&mut self, name: &str, args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        let _ = args;
        Err(HostError::unsupported(self.receiver_type(), name))
    }

    /// Invoke a configuring function, yielding the sub-receiver its block
    /// is bound to.
    fn configure(&mut self, name: &str, args: Vec<Value>) -> Result<Option<&mut dyn ScriptReceiver>, HostError> {
        let _ = args;
        Err(HostError::unsupported(self.receiver_type(), name))
    }
}

/// Host service executing restricted (value factory) functions.
pub trait RestrictedFunctions: Send + Sync {
    /// Execute `name` as declared on `owner`. Arguments are already
    /// type-checked against the declaration.
    fn invoke(&self, owner: &TypeName, name: &Identifier, args: &[Value]) -> Result<Value, HostError>;
}

/// A function service that executes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRestrictedFunctions;

impl RestrictedFunctions for NoRestrictedFunctions {
    fn invoke(&self, owner: &TypeName, name: &Identifier, _args: &[Value]) -> Result<Value, HostError> {
        Err(HostError::unsupported(owner.as_str(), name.as_str()))
    }
}

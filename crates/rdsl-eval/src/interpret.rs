//! # Application Phase
//!
//! Applies a [`ResolvedScript`] to host receivers in source order. Nothing
//! here consults the schema: every operation was bound during resolution.
//! The only failures left are dynamic ones, raised when host code rejects an
//! operation or hands back a receiver that does not match the schema.

use rdsl_core::{TypeName, Value};

use crate::receiver::{RestrictedFunctions, ScriptReceiver};
use crate::resolve::{NavStep, ResolvedBlock, ResolvedExpr, ResolvedOp, ResolvedScript};
use crate::result::NotEvaluatedReason;

type Application<T> = Result<T, NotEvaluatedReason>;

/// Applies resolved statements, delegating restricted calls to `functions`.
pub struct Interpreter<'f> {
    functions: &'f dyn RestrictedFunctions,
}

impl<'f> Interpreter<'f> {
    pub fn new(functions: &'f dyn RestrictedFunctions) -> Self {
        Self { functions }
    }

    /// Apply `script` to `target`, stopping at the first failure.
    pub fn apply(&self, target: &mut dyn ScriptReceiver, script: &ResolvedScript) -> Application<()> {
        self.block(target, &script.body)
    }

    fn block(&self, receiver: &mut dyn ScriptReceiver, block: &ResolvedBlock) -> Application<()> {
        for statement in &block.statements {
            tracing::trace!(
                receiver = %block.receiver_type,
                line = statement.location.line,
                column = statement.location.column,
                "applying statement"
            );
            self.statement(receiver, &statement.op)?;
        }
        Ok(())
    }

    fn statement(&self, receiver: &mut dyn ScriptReceiver, op: &ResolvedOp) -> Application<()> {
        match op {
            ResolvedOp::Assign {
                navigation,
                property,
                value,
            } => {
                let value = self.eval(receiver, value)?;
                let owner = navigate(receiver, navigation)?;
                owner
                    .write_property(property.as_str(), value)
                    .map_err(|e| NotEvaluatedReason::host(property, &e))
            }
            ResolvedOp::Add {
                name,
                args,
                element,
            } => {
                let values = self.eval_all(receiver, args)?;
                let receiver_type = receiver.receiver_type().to_string();
                let added = receiver
                    .add(name.as_str(), values)
                    .map_err(|e| NotEvaluatedReason::host(name, &e))?;
                match (element, added) {
                    (None, _) => Ok(()),
                    (Some(block), Some(element)) => {
                        bound_as(&*element, &block.receiver_type, name)?;
                        self.block(element, block)
                    }
                    (Some(_), None) => Err(NotEvaluatedReason::nesting(
                        name,
                        receiver_type,
                        "adding function yielded no element receiver",
                    )),
                }
            }
            ResolvedOp::Configure { name, args, body } => {
                let values = self.eval_all(receiver, args)?;
                let receiver_type = receiver.receiver_type().to_string();
                let configured = receiver
                    .configure(name.as_str(), values)
                    .map_err(|e| NotEvaluatedReason::host(name, &e))?;
                let Some(sub) = configured else {
                    return Err(NotEvaluatedReason::nesting(
                        name,
                        receiver_type,
                        "configuring function yielded no receiver",
                    ));
                };
                bound_as(&*sub, &body.receiver_type, name)?;
                self.block(sub, body)
            }
            ResolvedOp::Evaluate(expr) => self.eval(receiver, expr).map(drop),
        }
    }

    fn eval_all(&self, receiver: &mut dyn ScriptReceiver, exprs: &[ResolvedExpr]) -> Application<Vec<Value>> {
        exprs.iter().map(|e| self.eval(receiver, e)).collect()
    }

    fn eval(&self, receiver: &mut dyn ScriptReceiver, expr: &ResolvedExpr) -> Application<Value> {
        match expr {
            ResolvedExpr::Literal(value) => Ok(value.clone()),
            ResolvedExpr::Read {
                navigation,
                property,
            } => navigate(receiver, navigation)?
                .read_property(property.as_str())
                .map_err(|e| NotEvaluatedReason::host(property, &e)),
            ResolvedExpr::Restricted { owner, name, args } => {
                let values = self.eval_all(receiver, args)?;
                self.functions
                    .invoke(owner, name, &values)
                    .map_err(|e| NotEvaluatedReason::host(name, &e))
            }
        }
    }
}

/// Follow navigable properties from `receiver`.
fn navigate<'a>(
    mut receiver: &'a mut dyn ScriptReceiver,
    steps: &[NavStep],
) -> Application<&'a mut dyn ScriptReceiver> {
    for step in steps {
        let owner = receiver.receiver_type().to_string();
        receiver = match receiver.navigate(step.property.as_str()) {
            Some(next) => next,
            None => {
                return Err(NotEvaluatedReason::nesting(
                    &step.property,
                    owner,
                    "property yielded no receiver",
                ))
            }
        };
        bound_as(&*receiver, &step.target, &step.property)?;
    }
    Ok(receiver)
}

/// Check that host code handed back the receiver type the schema expects.
fn bound_as(
    receiver: &dyn ScriptReceiver,
    expected: &TypeName,
    via: &impl ToString,
) -> Application<()> {
    if receiver.receiver_type() == expected.as_str() {
        Ok(())
    } else {
        Err(NotEvaluatedReason::nesting(
            via.to_string(),
            expected,
            format!("host bound a {} receiver", receiver.receiver_type()),
        ))
    }
}

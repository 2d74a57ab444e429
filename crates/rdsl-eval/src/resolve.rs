//! # Resolution Phase
//!
//! Walks the AST against an [`AnalysisSchema`] and produces a resolved tree
//! in which every identifier is bound to a declaration and every expression
//! carries its static type. All static rejections are raised here, before
//! any host object is touched.
//!
//! ## Visibility
//!
//! Properties, adding functions and configuring functions resolve only on
//! the receiver the statement is bound to. Restricted functions resolve on
//! that receiver first and then on its enclosing receivers, innermost
//! first. An identifier that resolves nowhere is reported against the
//! innermost receiver.

use rdsl_core::{Identifier, TypeName, Value, ValueType};
use rdsl_schema::{render_params, AnalysisSchema, Operation, Parameter, PropertyDecl};

use crate::ast::{Assignment, Call, Expr, Location, PropertyPath, Script, Statement};
use crate::result::NotEvaluatedReason;

type Resolution<T> = Result<T, NotEvaluatedReason>;

/// One hop through a navigable property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStep {
    pub property: Identifier,
    /// Receiver type the property leads to.
    pub target: TypeName,
}

/// Statements bound to one receiver type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBlock {
    pub receiver_type: TypeName,
    pub statements: Vec<ResolvedStatement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStatement {
    pub location: Location,
    pub op: ResolvedOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedOp {
    /// Write `property` on the receiver reached through `navigation`.
    Assign {
        navigation: Vec<NavStep>,
        property: Identifier,
        value: ResolvedExpr,
    },
    /// Adding call, optionally configuring the added element.
    Add {
        name: Identifier,
        args: Vec<ResolvedExpr>,
        element: Option<ResolvedBlock>,
    },
    /// Configuring call and its nested block.
    Configure {
        name: Identifier,
        args: Vec<ResolvedExpr>,
        body: ResolvedBlock,
    },
    /// Restricted call used as a statement; its value is discarded.
    Evaluate(ResolvedExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedExpr {
    Literal(Value),
    Read {
        navigation: Vec<NavStep>,
        property: Identifier,
    },
    Restricted {
        owner: TypeName,
        name: Identifier,
        args: Vec<ResolvedExpr>,
    },
}

/// A script whose every identifier has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScript {
    pub body: ResolvedBlock,
}

impl ResolvedScript {
    /// Total number of statements, nested ones included.
    pub fn statement_count(&self) -> usize {
        fn count(block: &ResolvedBlock) -> usize {
            block
                .statements
                .iter()
                .map(|s| {
                    1 + match &s.op {
                        ResolvedOp::Add {
                            element: Some(b), ..
                        } => count(b),
                        ResolvedOp::Configure { body, .. } => count(body),
                        _ => 0,
                    }
                })
                .sum()
        }
        count(&self.body)
    }
}

/// Resolves scripts against one schema.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'s> {
    schema: &'s AnalysisSchema,
    max_depth: usize,
}

impl<'s> Resolver<'s> {
    pub fn new(schema: &'s AnalysisSchema, max_depth: usize) -> Self {
        Self { schema, max_depth }
    }

    /// Resolve `script` against the top-level receiver.
    pub fn resolve(&self, script: &Script) -> Resolution<ResolvedScript> {
        let mut chain = vec![self.schema.top_level().clone()];
        let statements = self.statements(&script.statements, &mut chain)?;
        Ok(ResolvedScript {
            body: ResolvedBlock {
                receiver_type: self.schema.top_level().clone(),
                statements,
            },
        })
    }

    /// Resolve statements in source order. An unresolved identifier
    /// anywhere in the list wins over an earlier static error of any other
    /// kind; otherwise the first error is reported.
    fn statements(
        &self,
        statements: &[Statement],
        chain: &mut Vec<TypeName>,
    ) -> Resolution<Vec<ResolvedStatement>> {
        let mut resolved = Vec::with_capacity(statements.len());
        let mut first_error = None;
        for s in statements {
            let op = match s {
                Statement::Assign(a) => self.assignment(a, chain),
                Statement::Call(c) => self.call(c, chain),
            };
            match op {
                Ok(op) => resolved.push(ResolvedStatement {
                    location: s.location(),
                    op,
                }),
                Err(e @ NotEvaluatedReason::UnresolvedReference { .. }) => return Err(e),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(resolved),
        }
    }

    /// Innermost receiver type. The chain always starts with the top level.
    fn current<'c>(&'c self, chain: &'c [TypeName]) -> &'c TypeName {
        chain.last().unwrap_or(self.schema.top_level())
    }

    /// Resolve a nested block bound to `receiver_type`.
    fn block(
        &self,
        owner: &Identifier,
        receiver_type: &TypeName,
        statements: &[Statement],
        chain: &mut Vec<TypeName>,
    ) -> Resolution<ResolvedBlock> {
        if chain.len() > self.max_depth {
            return Err(NotEvaluatedReason::nesting(
                owner,
                self.current(chain),
                format!("nesting depth exceeds {}", self.max_depth),
            ));
        }
        chain.push(receiver_type.clone());
        let resolved = self.statements(statements, chain);
        chain.pop();
        Ok(ResolvedBlock {
            receiver_type: receiver_type.clone(),
            statements: resolved?,
        })
    }

    fn assignment(&self, a: &Assignment, chain: &mut Vec<TypeName>) -> Resolution<ResolvedOp> {
        let current = self.current(chain).clone();
        let target = self.path(&a.target, &current).and_then(|(navigation, owner, property)| {
            if !property.is_writable() {
                return Err(NotEvaluatedReason::ReadOnlyProperty {
                    identifier: property.name.to_string(),
                    receiver_type: owner.to_string(),
                });
            }
            if self.schema.navigable_target(property).is_some() {
                return Err(NotEvaluatedReason::nesting(
                    &property.name,
                    &owner,
                    "a receiver property cannot be assigned",
                ));
            }
            Ok((navigation, property))
        });
        let value = self.expr(&a.value, chain);
        let ((navigation, property), (value, actual)) = either_unresolved(target, value)?;

        if !property.value_type.accepts(&actual) {
            return Err(NotEvaluatedReason::ArgumentMismatch {
                identifier: property.name.to_string(),
                expected: property.value_type.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(ResolvedOp::Assign {
            navigation,
            property: property.name.clone(),
            value,
        })
    }

    fn call(&self, c: &Call, chain: &mut Vec<TypeName>) -> Resolution<ResolvedOp> {
        let current = self.current(chain).clone();
        match self.schema.lookup_function(&current, &c.name) {
            Some(Operation::Adding(adding)) => {
                let args = self.arguments(&c.name, &adding.params, &c.args, chain);
                let element = match (&c.block, &adding.element) {
                    (None, _) => Ok(None),
                    (Some(_), None) => Err(NotEvaluatedReason::nesting(
                        &c.name,
                        &current,
                        "adding function has no configurable element",
                    )),
                    (Some(stmts), Some(element)) => self.block(&c.name, element, stmts, chain).map(Some),
                };
                let (args, element) = either_unresolved(args, element)?;
                Ok(ResolvedOp::Add {
                    name: c.name.clone(),
                    args,
                    element,
                })
            }
            Some(Operation::Configuring(configuring)) => {
                let args = self.arguments(&c.name, &configuring.params, &c.args, chain);
                let stmts = c.block.as_deref().unwrap_or(&[]);
                let body = self.block(&c.name, &configuring.target, stmts, chain);
                let (args, body) = either_unresolved(args, body)?;
                Ok(ResolvedOp::Configure {
                    name: c.name.clone(),
                    args,
                    body,
                })
            }
            Some(Operation::Restricted(_)) | Some(Operation::Property(_)) | None => {
                let (expr, _) = self.restricted_call(&c.name, &c.args, chain)?;
                if c.block.is_some() {
                    return Err(NotEvaluatedReason::nesting(
                        &c.name,
                        &current,
                        "restricted function takes no block",
                    ));
                }
                Ok(ResolvedOp::Evaluate(expr))
            }
        }
    }

    /// Resolve a dotted path from `start`: navigable prefix, owning
    /// receiver type, final property.
    fn path(
        &self,
        path: &PropertyPath,
        start: &TypeName,
    ) -> Resolution<(Vec<NavStep>, TypeName, &'s PropertyDecl)> {
        let mut owner = start.clone();
        let mut navigation = Vec::with_capacity(path.prefix().len());
        for segment in path.prefix() {
            let property = self
                .schema
                .lookup_property(&owner, segment)
                .ok_or_else(|| NotEvaluatedReason::unresolved(segment, &owner))?;
            let target = self.schema.navigable_target(property).ok_or_else(|| {
                NotEvaluatedReason::nesting(
                    segment,
                    &owner,
                    format!("property of type {} is not a receiver", property.value_type),
                )
            })?;
            navigation.push(NavStep {
                property: segment.clone(),
                target: target.clone(),
            });
            owner = target.clone();
        }

        let last = path
            .last()
            .ok_or_else(|| NotEvaluatedReason::unresolved("", &owner))?;
        let property = self
            .schema
            .lookup_property(&owner, last)
            .ok_or_else(|| NotEvaluatedReason::unresolved(last, &owner))?;
        Ok((navigation, owner, property))
    }

    fn expr(&self, expr: &Expr, chain: &mut Vec<TypeName>) -> Resolution<(ResolvedExpr, ValueType)> {
        match expr {
            Expr::Literal { value, .. } => Ok((ResolvedExpr::Literal(value.clone()), value.value_type())),
            Expr::Read { path, .. } => {
                let current = self.current(chain).clone();
                let (navigation, owner, property) = self.path(path, &current)?;
                if self.schema.navigable_target(property).is_some() {
                    return Err(NotEvaluatedReason::nesting(
                        &property.name,
                        &owner,
                        "a receiver property cannot be used as a value",
                    ));
                }
                Ok((
                    ResolvedExpr::Read {
                        navigation,
                        property: property.name.clone(),
                    },
                    property.value_type.clone(),
                ))
            }
            Expr::Call { name, args, .. } => self.restricted_call(name, args, chain),
        }
    }

    fn restricted_call(
        &self,
        name: &Identifier,
        args: &[Expr],
        chain: &mut Vec<TypeName>,
    ) -> Resolution<(ResolvedExpr, ValueType)> {
        let found = chain.iter().rev().find_map(|receiver| {
            match self.schema.lookup_function(receiver, name) {
                Some(Operation::Restricted(f)) => Some((receiver.clone(), f)),
                _ => None,
            }
        });
        let Some((owner, function)) = found else {
            return Err(NotEvaluatedReason::unresolved(name, self.current(chain)));
        };
        let args = self.arguments(name, &function.params, args, chain)?;
        Ok((
            ResolvedExpr::Restricted {
                owner,
                name: name.clone(),
                args,
            },
            function.returns.clone(),
        ))
    }

    /// Resolve arguments, then match them against `params`. Unresolved
    /// identifiers inside arguments take precedence over a mismatch.
    fn arguments(
        &self,
        name: &Identifier,
        params: &[Parameter],
        args: &[Expr],
        chain: &mut Vec<TypeName>,
    ) -> Resolution<Vec<ResolvedExpr>> {
        let mut resolved = Vec::with_capacity(args.len());
        let mut types = Vec::with_capacity(args.len());
        for arg in args {
            let (expr, ty) = self.expr(arg, chain)?;
            resolved.push(expr);
            types.push(ty);
        }

        let matches = params.len() == types.len()
            && params
                .iter()
                .zip(&types)
                .all(|(p, t)| p.value_type.accepts(t));
        if !matches {
            return Err(NotEvaluatedReason::ArgumentMismatch {
                identifier: name.to_string(),
                expected: render_params(params),
                actual: types
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Ok(resolved)
    }
}

/// Join two independently resolved parts of one statement. An unresolved
/// identifier in either part wins; otherwise the first error does.
fn either_unresolved<A, B>(a: Resolution<A>, b: Resolution<B>) -> Resolution<(A, B)> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(e @ NotEvaluatedReason::UnresolvedReference { .. }), _)
        | (_, Err(e @ NotEvaluatedReason::UnresolvedReference { .. })) => Err(e),
        (Err(e), _) | (_, Err(e)) => Err(e),
    }
}

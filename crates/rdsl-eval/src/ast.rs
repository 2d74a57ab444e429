//! Syntax tree of a parsed script. Carries source locations; carries no
//! schema information.

use std::fmt;

use rdsl_core::{Identifier, Value};
use serde::Serialize;

/// 1-based line and column in the script text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A parsed script: a statement list bound to the top-level receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `a.b.c = expr`
    Assign(Assignment),
    /// `name(args)`, `name(args) { ... }` or `name { ... }`
    Call(Call),
}

impl Statement {
    pub fn location(&self) -> Location {
        match self {
            Self::Assign(a) => a.location,
            Self::Call(c) => c.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: PropertyPath,
    pub value: Expr,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub name: Identifier,
    pub args: Vec<Expr>,
    /// Statements of a trailing block, if present.
    pub block: Option<Vec<Statement>>,
    pub location: Location,
}

/// Dotted property path; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    pub segments: Vec<Identifier>,
}

impl PropertyPath {
    /// The property the path ends in.
    pub fn last(&self) -> Option<&Identifier> {
        self.segments.last()
    }

    /// Segments before the final one.
    pub fn prefix(&self) -> &[Identifier] {
        match self.segments.split_last() {
            Some((_, prefix)) => prefix,
            None => &[],
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal {
        value: Value,
        location: Location,
    },
    Read {
        path: PropertyPath,
        location: Location,
    },
    Call {
        name: Identifier,
        args: Vec<Expr>,
        location: Location,
    },
}

impl Expr {
    pub fn location(&self) -> Location {
        match self {
            Self::Literal { location, .. }
            | Self::Read { location, .. }
            | Self::Call { location, .. } => *location,
        }
    }
}

//! # Script Parser
//!
//! pest grammar (`grammar.pest`) plus a builder that turns the pair tree
//! into the typed AST in [`crate::ast`]. Every failure, including ones the
//! grammar cannot express (integer overflow), is a [`ParseError`] carrying
//! a 1-based location.

use pest::error::{ErrorVariant, LineColLocation};
use pest::iterators::Pair;
use pest::Parser;
use rdsl_core::{Identifier, Value};
use thiserror::Error;

use crate::ast::{Assignment, Call, Expr, Location, PropertyPath, Script, Statement};

#[derive(pest_derive::Parser)]
#[grammar = "grammar.pest"] // Path relative to src/
struct ScriptParser;

/// Script text that does not parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: {message}")]
pub struct ParseError {
    pub location: Location,
    pub message: String,
    limit_reached: bool,
}

impl ParseError {
    fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            limit_reached: false,
        }
    }

    fn at(pair: &Pair<'_, Rule>, message: impl Into<String>) -> Self {
        Self::new(location_of(pair), message)
    }

    /// The parser gave up because the script nests deeper than its stack
    /// or call budget allows, not because the text is malformed.
    pub fn is_nesting_limit(&self) -> bool {
        self.limit_reached
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, column) = match e.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        let limit_reached = matches!(
            &e.variant,
            ErrorVariant::CustomError { message } if message.ends_with("limit reached")
        );
        Self {
            location: Location::new(line, column),
            message: e.variant.message().into_owned(),
            limit_reached,
        }
    }
}

fn location_of(pair: &Pair<'_, Rule>) -> Location {
    let (line, column) = pair.as_span().start_pos().line_col();
    Location::new(line, column)
}

/// Parse script text into an AST.
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed text.
pub fn parse_script(text: &str) -> Result<Script, ParseError> {
    let mut pairs = ScriptParser::parse(Rule::script, text)?;
    let statements = match pairs.next() {
        Some(script) => build_statements(script)?,
        None => Vec::new(),
    };
    Ok(Script { statements })
}

fn build_statements(parent: Pair<'_, Rule>) -> Result<Vec<Statement>, ParseError> {
    parent
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(build_statement)
        .collect()
}

fn build_statement(pair: Pair<'_, Rule>) -> Result<Statement, ParseError> {
    match pair.as_rule() {
        Rule::assignment => {
            let location = location_of(&pair);
            let mut inner = pair.into_inner();
            let (Some(target), Some(value)) = (inner.next(), inner.next()) else {
                return Err(ParseError::new(location, "incomplete assignment"));
            };
            Ok(Statement::Assign(Assignment {
                target: build_path(target)?,
                value: build_expr(value)?,
                location,
            }))
        }
        Rule::call => build_call(pair).map(Statement::Call),
        other => Err(ParseError::at(&pair, format!("unexpected {other:?}"))),
    }
}

fn build_call(pair: Pair<'_, Rule>) -> Result<Call, ParseError> {
    let location = location_of(&pair);
    let mut name = None;
    let mut args = Vec::new();
    let mut block = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::identifier => name = Some(build_identifier(&part)?),
            Rule::arguments => args = build_arguments(part)?,
            Rule::block => block = Some(build_statements(part)?),
            other => return Err(ParseError::at(&part, format!("unexpected {other:?}"))),
        }
    }
    let name = name.ok_or_else(|| ParseError::new(location, "call without a name"))?;
    Ok(Call {
        name,
        args,
        block,
        location,
    })
}

fn build_arguments(pair: Pair<'_, Rule>) -> Result<Vec<Expr>, ParseError> {
    pair.into_inner().map(build_expr).collect()
}

fn build_identifier(pair: &Pair<'_, Rule>) -> Result<Identifier, ParseError> {
    Identifier::new(pair.as_str()).map_err(|e| ParseError::at(pair, e.to_string()))
}

fn build_path(pair: Pair<'_, Rule>) -> Result<PropertyPath, ParseError> {
    let segments = pair
        .into_inner()
        .map(|p| build_identifier(&p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PropertyPath { segments })
}

fn build_expr(pair: Pair<'_, Rule>) -> Result<Expr, ParseError> {
    let location = location_of(&pair);
    match pair.as_rule() {
        Rule::string => {
            let body = pair.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            Ok(Expr::Literal {
                value: Value::Str(unescape(body)),
                location,
            })
        }
        Rule::integer => {
            let n: i64 = pair
                .as_str()
                .parse()
                .map_err(|_| ParseError::at(&pair, format!("integer {} out of range", pair.as_str())))?;
            Ok(Expr::Literal {
                value: Value::Int(n),
                location,
            })
        }
        Rule::boolean => Ok(Expr::Literal {
            value: Value::Bool(pair.as_str() == "true"),
            location,
        }),
        Rule::property_path => Ok(Expr::Read {
            path: build_path(pair)?,
            location,
        }),
        Rule::call_expr => {
            let mut name = None;
            let mut args = Vec::new();
            for part in pair.into_inner() {
                match part.as_rule() {
                    Rule::identifier => name = Some(build_identifier(&part)?),
                    Rule::arguments => args = build_arguments(part)?,
                    other => return Err(ParseError::at(&part, format!("unexpected {other:?}"))),
                }
            }
            let name = name.ok_or_else(|| ParseError::new(location, "call without a name"))?;
            Ok(Expr::Call {
                name,
                args,
                location,
            })
        }
        other => Err(ParseError::at(&pair, format!("unexpected {other:?}"))),
    }
}

/// Resolve escape sequences; the grammar only admits valid ones.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Statement {
        let mut script = parse_script(text).unwrap();
        assert_eq!(script.statements.len(), 1, "{text}");
        script.statements.remove(0)
    }

    #[test]
    fn parses_assignment_with_path() {
        let Statement::Assign(a) = single("rootProject.name = \"app\"") else {
            panic!("expected assignment");
        };
        assert_eq!(a.target.to_string(), "rootProject.name");
        assert!(matches!(a.value, Expr::Literal { value: Value::Str(ref s), .. } if s == "app"));
        assert_eq!(a.location, Location::new(1, 1));
    }

    #[test]
    fn parses_nested_calls_and_blocks() {
        let Statement::Call(c) = single("dependencies {\n    implementation(project(\":core\"))\n}") else {
            panic!("expected call");
        };
        assert_eq!(c.name, "dependencies");
        assert!(c.args.is_empty());
        let body = c.block.unwrap();
        let Statement::Call(inner) = &body[0] else {
            panic!("expected inner call");
        };
        assert_eq!(inner.location, Location::new(2, 5));
        assert!(matches!(&inner.args[0], Expr::Call { name, args, .. } if name == "project" && args.len() == 1));
    }

    #[test]
    fn parses_call_with_arguments_and_block() {
        let Statement::Call(c) = single("id(\"org.example\") { version = \"1.0\"; apply = false }") else {
            panic!("expected call");
        };
        assert_eq!(c.args.len(), 1);
        assert_eq!(c.block.unwrap().len(), 2);
    }

    #[test]
    fn literals() {
        let Statement::Call(c) = single("f(-42, true, false, \"a\\\"b\\n\\$\", x.y)") else {
            panic!("expected call");
        };
        let values: Vec<_> = c
            .args
            .iter()
            .filter_map(|e| match e {
                Expr::Literal { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            values,
            [
                Value::Int(-42),
                Value::Bool(true),
                Value::Bool(false),
                Value::Str("a\"b\n$".into())
            ]
        );
        assert!(matches!(&c.args[4], Expr::Read { path, .. } if path.segments.len() == 2));
    }

    #[test]
    fn comments_and_separators_are_ignored() {
        let script = parse_script("// header\n;include(\":a\");; /* x */ include(\":b\")\n").unwrap();
        assert_eq!(script.statements.len(), 2);
    }

    #[test]
    fn empty_script_has_no_statements() {
        assert!(parse_script("").unwrap().statements.is_empty());
        assert!(parse_script("  // nothing\n").unwrap().statements.is_empty());
    }

    #[test]
    fn keyword_prefixed_identifiers_are_identifiers() {
        let Statement::Assign(a) = single("trueValue = falsehood") else {
            panic!("expected assignment");
        };
        assert_eq!(a.target.to_string(), "trueValue");
        assert!(matches!(a.value, Expr::Read { .. }));
    }

    #[test]
    fn syntax_errors_carry_location() {
        let err = parse_script("include(\":a\"\n").unwrap_err();
        assert_eq!(err.location, Location::new(1, 8));

        let err = parse_script("x = \n = 3").unwrap_err();
        assert_eq!(err.location.line, 2);
    }

    #[test]
    fn runaway_nesting_hits_the_parser_limit() {
        let depth = 20_000;
        let blocks = format!("{}{}", "dependencies {\n".repeat(depth), "}\n".repeat(depth));
        let err = parse_script(&blocks).unwrap_err();
        assert!(err.is_nesting_limit(), "{err}");

        let calls = format!("use({}1{})", "f(".repeat(depth), ")".repeat(depth));
        assert!(parse_script(&calls).unwrap_err().is_nesting_limit());

        assert!(!parse_script("x = ").unwrap_err().is_nesting_limit());
    }

    #[test]
    fn integer_overflow_is_a_syntax_error() {
        let err = parse_script("x = 99999999999999999999").unwrap_err();
        assert_eq!(err.location, Location::new(1, 5));
        assert!(err.message.contains("out of range"));
    }

    #[test]
    fn keywords_cannot_be_assigned() {
        assert!(parse_script("true = 1").is_err());
    }
}

//! boolean expression system for test selection
//!
//! provides a small sandboxed language supporting:
//! - logical operators: and, or, not, parentheses
//! - comparison operators: ==, !=, >, >=, <, <=
//! - membership operators: in, not in
//! - identifiers resolved as test attributes (missing names are false)
//!
//! expressions are the `--eval-attr` form of a selection rule.

mod eval;
mod parser;
mod types;

pub use eval::{evaluate, evaluate_value, EvalContext, EvalError};
pub use parser::{parse_expression, ParseError};
pub use types::{CompareOp, Expr};

use crate::attributes::{AttributeResolver, Candidate};

/// a parsed expression together with its source text
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Ok(Self {
            source: source.to_string(),
            root: parse_expression(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// evaluate against a candidate, names resolved through `resolver`
    pub fn evaluate(
        &self,
        resolver: &AttributeResolver,
        candidate: Candidate<'_>,
    ) -> Result<bool, EvalError> {
        evaluate(&self.root, &EvalContext::new(resolver, candidate))
    }
}

//! expression evaluator
//!
//! evaluates parsed expressions against a candidate's attributes. names are
//! the only way in: every identifier goes through the attribute resolver.

use thiserror::Error;

use super::types::{CompareOp, Expr};
use crate::attributes::{AttrValue, AttributeResolver, Candidate};

/// error raised while evaluating an expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: CompareOp,
        left: &'static str,
        right: &'static str,
    },
}

/// context for evaluating expressions
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub resolver: &'a AttributeResolver,
    pub candidate: Candidate<'a>,
}

impl<'a> EvalContext<'a> {
    pub fn new(resolver: &'a AttributeResolver, candidate: Candidate<'a>) -> Self {
        Self {
            resolver,
            candidate,
        }
    }
}

/// evaluate an expression to a boolean (truthiness of its value)
pub fn evaluate(expr: &Expr, ctx: &EvalContext) -> Result<bool, EvalError> {
    Ok(evaluate_value(expr, ctx)?.is_truthy())
}

/// evaluate an expression to a value
pub fn evaluate_value(expr: &Expr, ctx: &EvalContext) -> Result<AttrValue, EvalError> {
    match expr {
        Expr::All(items) => {
            for item in items {
                if !evaluate(item, ctx)? {
                    return Ok(AttrValue::Bool(false));
                }
            }
            Ok(AttrValue::Bool(true))
        }
        Expr::Any(items) => {
            for item in items {
                if evaluate(item, ctx)? {
                    return Ok(AttrValue::Bool(true));
                }
            }
            Ok(AttrValue::Bool(false))
        }
        Expr::Not(inner) => Ok(AttrValue::Bool(!evaluate(inner, ctx)?)),
        Expr::Compare { left, op, right } => {
            let left = evaluate_value(left, ctx)?;
            let right = evaluate_value(right, ctx)?;
            compare(*op, &left, &right).map(AttrValue::Bool)
        }
        Expr::Ident(name) => Ok(ctx
            .resolver
            .resolve_or_false(&ctx.candidate, name)
            .clone()),
        Expr::Literal(value) => Ok(value.clone()),
    }
}

// ============================================================================
// Comparison Helpers
// ============================================================================

fn compare(op: CompareOp, left: &AttrValue, right: &AttrValue) -> Result<bool, EvalError> {
    let mismatch = || EvalError::TypeMismatch {
        op,
        left: left.kind(),
        right: right.kind(),
    };

    match op {
        CompareOp::Eq => Ok(values_equal(left, right)),
        CompareOp::Ne => Ok(!values_equal(left, right)),
        CompareOp::In => contains(right, left).ok_or_else(mismatch),
        CompareOp::NotIn => contains(right, left).map(|b| !b).ok_or_else(mismatch),
        CompareOp::Gt | CompareOp::Gte | CompareOp::Lt | CompareOp::Lte => {
            let ordering = match (left, right) {
                (AttrValue::String(a), AttrValue::String(b)) => a.partial_cmp(b),
                _ => match (left.as_f64(), right.as_f64()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => return Err(mismatch()),
                },
            };
            let Some(ordering) = ordering else {
                // NaN never orders
                return Ok(false);
            };
            Ok(match op {
                CompareOp::Gt => ordering.is_gt(),
                CompareOp::Gte => ordering.is_ge(),
                CompareOp::Lt => ordering.is_lt(),
                _ => ordering.is_le(),
            })
        }
    }
}

fn values_equal(a: &AttrValue, b: &AttrValue) -> bool {
    match (a, b) {
        (AttrValue::Bool(x), AttrValue::Bool(y)) => x == y,
        (AttrValue::String(x), AttrValue::String(y)) => x == y,
        (AttrValue::List(x), AttrValue::List(y)) => x == y,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// `needle in haystack`; `None` when the haystack can't hold values
///
/// list elements are strings, so any other needle is simply absent
fn contains(haystack: &AttrValue, needle: &AttrValue) -> Option<bool> {
    match haystack {
        AttrValue::List(items) => Some(
            needle
                .as_str()
                .map_or(false, |text| items.iter().any(|item| item == text)),
        ),
        AttrValue::String(s) => Some(s.contains(needle.as_str()?)),
        _ => None,
    }
}

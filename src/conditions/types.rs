//! core types for selection expressions

use std::fmt;

use crate::attributes::AttrValue;

/// comparison operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// equality: ==
    Eq,
    /// inequality: !=
    Ne,
    /// greater than: >
    Gt,
    /// greater than or equal: >=
    Gte,
    /// less than: <
    Lt,
    /// less than or equal: <=
    Lte,
    /// membership: in
    In,
    /// negated membership: not in
    NotIn,
}

impl CompareOp {
    /// parse a symbolic operator
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            _ => None,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Ne => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::In => write!(f, "in"),
            CompareOp::NotIn => write!(f, "not in"),
        }
    }
}

/// the expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// all operands must be truthy (and)
    All(Vec<Expr>),
    /// any operand must be truthy (or)
    Any(Vec<Expr>),
    /// negated truthiness (not)
    Not(Box<Expr>),
    /// binary comparison
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    /// attribute name, resolved through the attribute resolver
    Ident(String),
    /// literal value
    Literal(AttrValue),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn negate(expr: Expr) -> Self {
        Expr::Not(Box::new(expr))
    }

    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// attribute names referenced anywhere in the expression
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::All(items) | Expr::Any(items) => {
                for item in items {
                    item.collect_identifiers(out);
                }
            }
            Expr::Not(inner) => inner.collect_identifiers(out),
            Expr::Compare { left, right, .. } => {
                left.collect_identifiers(out);
                right.collect_identifiers(out);
            }
            Expr::Ident(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name.as_str());
                }
            }
            Expr::Literal(_) => {}
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", sep)?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, ")")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::All(items) => write_joined(f, items, "and"),
            Expr::Any(items) => write_joined(f, items, "or"),
            Expr::Not(inner) => write!(f, "not {}", inner),
            Expr::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Literal(AttrValue::String(s)) => write!(f, "{:?}", s),
            Expr::Literal(value) => write!(f, "{}", value),
        }
    }
}

//! rule compiler - turns raw selection text into rule groups
//!
//! a rule source is a comma separated list of clauses:
//! - `key=value` attribute must equal value (case-insensitive)
//! - `key`       attribute must be truthy
//! - `!key`      attribute must be falsy or absent
//!
//! each source becomes one group (AND); each expression becomes a group of
//! its own holding a single dynamic rule.

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::conditions::{Expression, ParseError};

/// error raised while compiling selection rules
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("invalid expression '{source_text}': {error}")]
    Expression {
        source_text: String,
        error: ParseError,
    },
    #[error("rule '{clause}' in '{source_text}' has no attribute name")]
    EmptyKey { clause: String, source_text: String },
}

/// what a rule expects of the resolved attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// bare `key`: attribute must be truthy
    Truthy,
    /// `!key`: attribute must be falsy (absent counts as false)
    Falsy,
    /// `key=value`: attribute must equal value, or contain it if a list
    Value(String),
    /// free-form boolean expression
    Expression(Expression),
}

/// one atomic selection clause
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// attribute name, or the expression text for dynamic rules
    pub key: String,
    pub expected: Expected,
}

impl Rule {
    pub fn truthy(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expected: Expected::Truthy,
        }
    }

    pub fn falsy(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expected: Expected::Falsy,
        }
    }

    pub fn value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expected: Expected::Value(value.into()),
        }
    }

    pub fn expression(expr: Expression) -> Self {
        Self {
            key: expr.source().to_string(),
            expected: Expected::Expression(expr),
        }
    }

    /// parse one clause of a rule source; `None` for empty clauses
    pub fn parse_clause(clause: &str, source: &str) -> Result<Option<Self>, CompileError> {
        let clause = clause.trim();
        if clause.is_empty() {
            return Ok(None);
        }

        let rule = if let Some((key, value)) = clause.split_once('=') {
            Rule::value(key, value)
        } else if let Some(key) = clause.strip_prefix('!') {
            Rule::falsy(key)
        } else {
            Rule::truthy(clause)
        };

        if rule.key.is_empty() {
            return Err(CompileError::EmptyKey {
                clause: clause.to_string(),
                source_text: source.to_string(),
            });
        }

        Ok(Some(rule))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expected {
            Expected::Truthy => write!(f, "{}", self.key),
            Expected::Falsy => write!(f, "!{}", self.key),
            Expected::Value(v) => write!(f, "{}={}", self.key, v),
            Expected::Expression(e) => write!(f, "eval({})", e.source()),
        }
    }
}

/// rules that must all match (AND)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleGroup {
    rules: Vec<Rule>,
}

impl RuleGroup {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// parse one comma separated rule source
    pub fn parse(source: &str) -> Result<Self, CompileError> {
        let mut rules = Vec::new();
        for clause in source.trim().split(',') {
            if let Some(rule) = Rule::parse_clause(clause, source)? {
                trace!(rule = %rule, "parsed clause");
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}

/// groups of which any may match (OR); empty means selection is inactive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    groups: Vec<RuleGroup>,
}

impl RuleSet {
    pub fn new(groups: Vec<RuleGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    /// whether any rule was configured at all
    pub fn is_active(&self) -> bool {
        !self.groups.is_empty()
    }

    /// every attribute name a static rule refers to
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for group in &self.groups {
            for rule in group.rules() {
                let names = match &rule.expected {
                    Expected::Expression(e) => e.root().identifiers(),
                    _ => vec![rule.key.as_str()],
                };
                for name in names {
                    if !keys.contains(&name) {
                        keys.push(name);
                    }
                }
            }
        }
        keys
    }
}

/// compile rule sources and expressions into a rule set
///
/// expression groups come first, then source groups, each in input order
pub fn compile<S, E>(sources: &[S], expressions: &[E]) -> Result<RuleSet, CompileError>
where
    S: AsRef<str>,
    E: AsRef<str>,
{
    let mut groups = Vec::new();

    for text in expressions {
        let text = text.as_ref();
        let expr = Expression::parse(text).map_err(|error| CompileError::Expression {
            source_text: text.to_string(),
            error,
        })?;
        groups.push(RuleGroup::new(vec![Rule::expression(expr)]));
    }

    for text in sources {
        let group = RuleGroup::parse(text.as_ref())?;
        if group.is_empty() {
            debug!(source = text.as_ref(), "rule source has no clauses, skipping");
            continue;
        }
        groups.push(group);
    }

    debug!(groups = groups.len(), "compiled selection rules");
    Ok(RuleSet::new(groups))
}

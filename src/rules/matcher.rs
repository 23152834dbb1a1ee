//! rule matcher - decides whether a candidate is eligible under a rule set

use tracing::trace;

use super::compile::{Expected, Rule, RuleGroup, RuleSet};
use crate::attributes::{AttrValue, AttributeResolver, Candidate};
use crate::conditions::EvalError;

/// outcome of matching a candidate
///
/// a match only makes a test eligible; other filters may still drop it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Eligible,
    Reject,
}

impl Decision {
    pub fn is_eligible(self) -> bool {
        matches!(self, Decision::Eligible)
    }
}

/// whether a single rule holds for the candidate
pub fn rule_matches(
    rule: &Rule,
    resolver: &AttributeResolver,
    candidate: &Candidate<'_>,
) -> Result<bool, EvalError> {
    let actual = || resolver.resolve_or_false(candidate, &rule.key);
    let matched = match &rule.expected {
        Expected::Expression(expr) => return expr.evaluate(resolver, *candidate),
        Expected::Truthy => actual().is_truthy(),
        Expected::Falsy => !actual().is_truthy(),
        Expected::Value(expected) => match actual() {
            AttrValue::List(items) => {
                let expected = expected.to_lowercase();
                items.iter().any(|item| item.to_lowercase() == expected)
            }
            other => other.matches_text(expected),
        },
    };
    Ok(matched)
}

/// whether every rule in the group holds; stops at the first miss
pub fn group_matches(
    group: &RuleGroup,
    resolver: &AttributeResolver,
    candidate: &Candidate<'_>,
) -> Result<bool, EvalError> {
    for rule in group.rules() {
        if !rule_matches(rule, resolver, candidate)? {
            trace!(rule = %rule, "rule did not match");
            return Ok(false);
        }
    }
    Ok(true)
}

/// eligible iff any group matches
///
/// an empty rule set matches nothing; check [`RuleSet::is_active`] first
pub fn matches(
    rule_set: &RuleSet,
    resolver: &AttributeResolver,
    candidate: &Candidate<'_>,
) -> Result<Decision, EvalError> {
    for group in rule_set.groups() {
        if group_matches(group, resolver, candidate)? {
            return Ok(Decision::Eligible);
        }
    }
    Ok(Decision::Reject)
}

/// a compiled rule set bound to its resolver, consulted once per candidate
#[derive(Debug, Clone, Default)]
pub struct Selector {
    rules: RuleSet,
    resolver: AttributeResolver,
}

impl Selector {
    pub fn new(rules: RuleSet, resolver: AttributeResolver) -> Self {
        Self { rules, resolver }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn resolver(&self) -> &AttributeResolver {
        &self.resolver
    }

    pub fn is_active(&self) -> bool {
        self.rules.is_active()
    }

    /// the host's per-candidate query; everything is eligible when inactive
    pub fn wants(&self, candidate: &Candidate<'_>) -> Result<Decision, EvalError> {
        if !self.is_active() {
            return Ok(Decision::Eligible);
        }
        matches(&self.rules, &self.resolver, candidate)
    }
}

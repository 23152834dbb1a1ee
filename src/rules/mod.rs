//! selection rules: compilation and matching
//!
//! rules are organised as a [`RuleSet`] of [`RuleGroup`]s. all rules in a
//! group must match (AND); any group matching is enough (OR).

mod compile;
mod matcher;

pub use compile::{compile, CompileError, Expected, Rule, RuleGroup, RuleSet};
pub use matcher::{group_matches, matches, rule_matches, Decision, Selector};

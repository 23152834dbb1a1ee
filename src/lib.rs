// library crate for tagsel
// the selection engine, plus the CLI layer used by the binary

pub mod attributes;
pub mod cli;
pub mod collect;
pub mod conditions;
pub mod config;
pub mod registry;
pub mod rules;
pub mod suggest;

pub use attributes::{AttrMap, AttrValue, AttributeResolver, Candidate, Prefix};
pub use rules::{compile, CompileError, Decision, RuleSet, Selector};

//! attribute lookup across a test and its enclosing class

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AttrValue;

/// default namespace token for attribute keys
pub const DEFAULT_PREFIX: &str = "tst";

static FALSE: AttrValue = AttrValue::Bool(false);

/// namespace prefix for attribute keys (`<prefix>_<name>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix(String);

impl Prefix {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `speed` -> `tst_speed`
    pub fn add(&self, name: &str) -> String {
        format!("{}_{}", self.0, name)
    }

    /// `tst_speed` -> `Some("speed")`; keys outside the namespace give `None`
    pub fn strip<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.0.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|name| !name.is_empty())
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// attributes attached to a test or class, keyed by their full (prefixed) name
///
/// may also hold unrelated metadata; the resolver only ever asks for prefixed keys
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrMap(BTreeMap<String, AttrValue>);

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// entries inside the prefix namespace, with the prefix removed
    pub fn namespaced<'a>(
        &'a self,
        prefix: &'a Prefix,
    ) -> impl Iterator<Item = (&'a str, &'a AttrValue)> + 'a {
        self.0
            .iter()
            .filter_map(move |(k, v)| prefix.strip(k).map(|name| (name, v)))
    }
}

impl From<BTreeMap<String, AttrValue>> for AttrMap {
    fn from(map: BTreeMap<String, AttrValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// the subject of a match decision: a test unit plus its optional class
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub unit: &'a AttrMap,
    pub context: Option<&'a AttrMap>,
}

impl<'a> Candidate<'a> {
    /// a free function, no enclosing class
    pub fn function(unit: &'a AttrMap) -> Self {
        Self {
            unit,
            context: None,
        }
    }

    /// a method with its class
    pub fn method(unit: &'a AttrMap, class: &'a AttrMap) -> Self {
        Self {
            unit,
            context: Some(class),
        }
    }
}

/// looks up prefixed attributes on a candidate, unit first, then class
#[derive(Debug, Clone, Default)]
pub struct AttributeResolver {
    prefix: Prefix,
}

impl AttributeResolver {
    pub fn new(prefix: Prefix) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// the attribute if present on the unit or its class
    ///
    /// a present value, even `false`, stops the search
    pub fn lookup<'a>(&self, candidate: &Candidate<'a>, name: &str) -> Option<&'a AttrValue> {
        let key = self.prefix.add(name);
        candidate
            .unit
            .get(&key)
            .or_else(|| candidate.context.and_then(|ctx| ctx.get(&key)))
    }

    /// the attribute, or `default` when absent on both levels
    pub fn resolve<'a>(
        &self,
        candidate: &Candidate<'a>,
        name: &str,
        default: &'a AttrValue,
    ) -> &'a AttrValue {
        self.lookup(candidate, name).unwrap_or(default)
    }

    /// the attribute, or `false` when absent
    pub fn resolve_or_false<'a>(&self, candidate: &Candidate<'a>, name: &str) -> &'a AttrValue {
        self.resolve(candidate, name, &FALSE)
    }

    /// all namespaced attributes, unit entries overriding class entries
    pub fn merged(&self, candidate: &Candidate<'_>) -> BTreeMap<String, AttrValue> {
        let mut out = BTreeMap::new();
        if let Some(ctx) = candidate.context {
            for (name, value) in ctx.namespaced(&self.prefix) {
                out.insert(name.to_string(), value.clone());
            }
        }
        for (name, value) in candidate.unit.namespaced(&self.prefix) {
            out.insert(name.to_string(), value.clone());
        }
        out
    }
}

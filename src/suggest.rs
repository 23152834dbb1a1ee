//! "did you mean" hints for rule keys no test carries

use std::collections::BTreeSet;

use strsim::levenshtein;

use crate::attributes::Prefix;
use crate::registry::Registry;

/// maximum edit distance for a suggestion
pub const DEFAULT_THRESHOLD: usize = 2;

/// every attribute name (prefix stripped) found on any test or class
pub fn known_keys(registry: &Registry, prefix: &Prefix) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for case in registry.cases() {
        let levels = std::iter::once(case.candidate.unit).chain(case.candidate.context);
        for attrs in levels {
            keys.extend(attrs.namespaced(prefix).map(|(name, _)| name.to_string()));
        }
    }
    keys
}

/// known names within `threshold` edits of `name`, closest first
pub fn similar<'a>(
    name: &str,
    known: impl IntoIterator<Item = &'a String>,
    threshold: usize,
) -> Vec<String> {
    let query = name.to_lowercase();
    let mut scored: Vec<(usize, &String)> = known
        .into_iter()
        .map(|k| (levenshtein(&query, &k.to_lowercase()), k))
        .filter(|(distance, _)| *distance <= threshold)
        .collect();
    scored.sort();
    scored.into_iter().map(|(_, k)| k.clone()).collect()
}

/// rule keys missing from the catalog, each with its suggestions
pub fn unknown_keys<'k>(
    keys: &[&'k str],
    known: &BTreeSet<String>,
) -> Vec<(&'k str, Vec<String>)> {
    keys.iter()
        .filter(|key| !known.contains(**key))
        .map(|key| (*key, similar(key, known, DEFAULT_THRESHOLD)))
        .collect()
}

//! attribute collector - reports the attributes of selected tests
//!
//! produces a map from `module.Class.method` to the test's attributes with
//! the prefix stripped, as pretty JSON with sorted keys.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::attributes::{AttrValue, AttributeResolver};
use crate::registry::TestCase;

lazy_static! {
    static ref TEST_NAME: Regex = Regex::new(r"^test_\S+").expect("valid test name pattern");
}

/// qualified test name -> stripped attribute name -> value
pub type CollectedCases = BTreeMap<String, BTreeMap<String, AttrValue>>;

/// only functions and methods named `test_*` are collected
pub fn is_test_name(name: &str) -> bool {
    TEST_NAME.is_match(name)
}

/// gather the attributes of the given cases
pub fn collect<'a>(
    cases: impl IntoIterator<Item = TestCase<'a>>,
    resolver: &AttributeResolver,
) -> CollectedCases {
    cases
        .into_iter()
        .filter(|case| is_test_name(case.name))
        .map(|case| (case.qualified_name(), resolver.merged(&case.candidate)))
        .collect()
}

/// serialize collected cases with four-space indentation
pub fn to_json(cases: &CollectedCases) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    cases.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

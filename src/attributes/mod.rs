//! attribute storage and lookup
//!
//! tests and classes carry an explicit [`AttrMap`]; the [`AttributeResolver`]
//! reads `<prefix>_<name>` from the test first and falls back to its class.

mod resolve;
mod value;

pub use resolve::{AttrMap, AttributeResolver, Candidate, Prefix, DEFAULT_PREFIX};
pub use value::AttrValue;

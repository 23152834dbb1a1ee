//! attribute values attached to tests and classes

use std::fmt;

use serde::{Deserialize, Serialize};

/// a value that can be attached to a test or its class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// boolean value (bare tags are stored as `true`)
    Bool(bool),
    /// integer value
    Number(i64),
    /// floating point value
    Float(f64),
    /// string value
    String(String),
    /// ordered list of strings (e.g. supported platforms)
    List(Vec<String>),
}

impl AttrValue {
    /// try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// try to get as float (integers widen)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n as f64),
            AttrValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// try to get as list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AttrValue::List(l) => Some(l),
            _ => None,
        }
    }

    /// check if value is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Bool(b) => *b,
            AttrValue::Number(n) => *n != 0,
            AttrValue::Float(f) => *f != 0.0,
            AttrValue::String(s) => !s.is_empty(),
            AttrValue::List(l) => !l.is_empty(),
        }
    }

    /// short name of the value's kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "bool",
            AttrValue::Number(_) => "number",
            AttrValue::Float(_) => "float",
            AttrValue::String(_) => "string",
            AttrValue::List(_) => "list",
        }
    }

    /// case-insensitive comparison of the string forms
    pub fn matches_text(&self, text: &str) -> bool {
        if let AttrValue::String(s) = self {
            if s == text {
                return true;
            }
        }
        self.to_string().to_lowercase() == text.to_lowercase()
    }
}

/// renders the plain string form: no quotes around strings
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{}", b),
            AttrValue::Number(n) => write!(f, "{}", n),
            // `{:?}` keeps the `.0` of integral floats
            AttrValue::Float(n) if n.is_finite() => write!(f, "{:?}", n),
            AttrValue::Float(n) => write!(f, "{}", n),
            AttrValue::String(s) => write!(f, "{}", s),
            AttrValue::List(l) => write!(f, "[{}]", l.join(", ")),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::String(s)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(l: Vec<String>) -> Self {
        AttrValue::List(l)
    }
}

impl From<&[&str]> for AttrValue {
    fn from(l: &[&str]) -> Self {
        AttrValue::List(l.iter().map(|s| s.to_string()).collect())
    }
}

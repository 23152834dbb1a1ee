use serde::{Deserialize, Serialize};

use crate::attributes::DEFAULT_PREFIX;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// namespace token for attribute keys
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub selection: Selection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            selection: Selection::default(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// selection rules configured ahead of the command line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// rule sources, e.g. `"slow,speed=fast"`; one group each
    #[serde(default)]
    pub attr: Vec<String>,
    /// boolean expressions, e.g. `"db and not slow"`
    #[serde(default)]
    pub eval_attr: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.attr.is_empty() && self.eval_attr.is_empty()
    }

    /// CLI rules replace configured rules of the same kind
    pub fn override_with(&mut self, attr: Vec<String>, eval_attr: Vec<String>) {
        if !attr.is_empty() {
            self.attr = attr;
        }
        if !eval_attr.is_empty() {
            self.eval_attr = eval_attr;
        }
    }
}

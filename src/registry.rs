//! test registration records
//!
//! tests and classes are registered with explicit attribute maps. [`Tag`]
//! is the way attributes get attached at definition time: bare flags become
//! `true`, named values are stored as given, both under the prefix.

use serde::{Deserialize, Serialize};

use crate::attributes::{AttrMap, AttrValue, Candidate, Prefix};

/// attributes to attach to a test or class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    entries: Vec<(String, AttrValue)>,
}

impl Tag {
    pub fn new() -> Self {
        Self::default()
    }

    /// a bare tag, stored as `true`
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.entries.push((name.into(), AttrValue::Bool(true)));
        self
    }

    /// a named value
    pub fn value(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// write the entries into `attrs`, later entries winning
    pub fn apply(&self, prefix: &Prefix, attrs: &mut AttrMap) {
        for (name, value) in &self.entries {
            attrs.insert(prefix.add(name), value.clone());
        }
    }
}

/// a free test function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestFunction {
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub attributes: AttrMap,
}

impl TestFunction {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            attributes: AttrMap::new(),
        }
    }

    pub fn tagged(mut self, prefix: &Prefix, tag: &Tag) -> Self {
        tag.apply(prefix, &mut self.attributes);
        self
    }
}

/// a test method inside a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestMethod {
    pub name: String,
    #[serde(default)]
    pub attributes: AttrMap,
}

impl TestMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: AttrMap::new(),
        }
    }

    pub fn tagged(mut self, prefix: &Prefix, tag: &Tag) -> Self {
        tag.apply(prefix, &mut self.attributes);
        self
    }
}

/// a test class; its attributes apply to every method that lacks its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestClass {
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub attributes: AttrMap,
    #[serde(default)]
    pub methods: Vec<TestMethod>,
}

impl TestClass {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
            attributes: AttrMap::new(),
            methods: Vec::new(),
        }
    }

    pub fn tagged(mut self, prefix: &Prefix, tag: &Tag) -> Self {
        tag.apply(prefix, &mut self.attributes);
        self
    }

    pub fn with_method(mut self, method: TestMethod) -> Self {
        self.methods.push(method);
        self
    }
}

/// whether a test case is a free function or a method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseKind {
    Function,
    Method,
}

/// a borrowed view of one registered test
#[derive(Debug, Clone, Copy)]
pub struct TestCase<'a> {
    pub module: &'a str,
    pub class: Option<&'a str>,
    pub name: &'a str,
    pub kind: CaseKind,
    pub candidate: Candidate<'a>,
}

impl TestCase<'_> {
    /// `module.Class.method` or `module.function`
    pub fn qualified_name(&self) -> String {
        match self.class {
            Some(class) => format!("{}.{}.{}", self.module, class, self.name),
            None => format!("{}.{}", self.module, self.name),
        }
    }
}

/// every registered test function and class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub functions: Vec<TestFunction>,
    #[serde(default)]
    pub classes: Vec<TestClass>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, function: TestFunction) {
        self.functions.push(function);
    }

    pub fn add_class(&mut self, class: TestClass) {
        self.classes.push(class);
    }

    /// all tests: functions first, then methods class by class
    pub fn cases(&self) -> impl Iterator<Item = TestCase<'_>> {
        let functions = self.functions.iter().map(|f| TestCase {
            module: &f.module,
            class: None,
            name: &f.name,
            kind: CaseKind::Function,
            candidate: Candidate::function(&f.attributes),
        });

        let methods = self.classes.iter().flat_map(|class| {
            class.methods.iter().map(move |m| TestCase {
                module: &class.module,
                class: Some(&class.name),
                name: &m.name,
                kind: CaseKind::Method,
                candidate: Candidate::method(&m.attributes, &class.attributes),
            })
        });

        functions.chain(methods)
    }

    pub fn len(&self) -> usize {
        self.functions.len() + self.classes.iter().map(|c| c.methods.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

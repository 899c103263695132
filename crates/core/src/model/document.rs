use std::fmt;

use serde::{Deserialize, Serialize};

/// A node in a hierarchical configuration document.
///
/// Plugin configuration blocks are free-form XML, so they are carried as a
/// tree of named elements rather than deserialized into structs. Element
/// order is preserved; lookups return the first match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigElement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConfigElement>,
}

impl ConfigElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    pub fn add_child(&mut self, child: ConfigElement) {
        self.children.push(child);
    }

    /// First child with the given element name, if any.
    pub fn child(&self, name: &str) -> Option<&ConfigElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text value of the first child with the given name.
    pub fn child_value(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.value.as_deref())
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{}<{}", indent, self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }
        match (&self.value, self.children.is_empty()) {
            (None, true) => writeln!(f, "/>"),
            (Some(value), true) => writeln!(f, ">{}</{}>", value, self.name),
            (_, false) => {
                writeln!(f, ">")?;
                for child in &self.children {
                    child.render(f, depth + 1)?;
                }
                writeln!(f, "{}</{}>", indent, self.name)
            }
        }
    }
}

impl fmt::Display for ConfigElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

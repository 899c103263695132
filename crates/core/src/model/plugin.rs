use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConfigElement;

/// Group/artifact pair identifying a build plugin, independent of version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginKey {
    pub group_id: String,
    pub artifact_id: String,
}

impl PluginKey {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// A plugin declaration in a source project model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPlugin {
    pub key: PluginKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<ConfigElement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executions: Vec<PluginExecutionDecl>,
}

impl BuildPlugin {
    pub fn new(key: PluginKey) -> Self {
        Self {
            key,
            version: None,
            configuration: None,
            executions: Vec::new(),
        }
    }

    /// Value of a top-level configuration element, if declared.
    pub fn configuration_value(&self, name: &str) -> Option<&str> {
        self.configuration
            .as_ref()
            .and_then(|config| config.child_value(name))
    }
}

/// A bound execution inside a plugin declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginExecutionDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let key = PluginKey::new("org.apache.maven.plugins", "maven-compiler-plugin");
        assert_eq!(key.to_string(), "org.apache.maven.plugins:maven-compiler-plugin");
    }

    #[test]
    fn test_configuration_value() {
        let mut config = ConfigElement::new("configuration");
        config.add_child(ConfigElement::new("source").with_value("1.8"));
        let mut plugin = BuildPlugin::new(PluginKey::new("g", "a"));
        plugin.configuration = Some(config);

        assert_eq!(plugin.configuration_value("source"), Some("1.8"));
        assert!(plugin.configuration_value("target").is_none());
    }
}

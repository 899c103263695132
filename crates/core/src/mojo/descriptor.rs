use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::Coordinate;
use crate::xml::{child_element, child_text, element_text, is_named};

/// Role every goal implementation is registered under in the execution
/// container; the role hint distinguishes individual goals.
pub const MOJO_ROLE: &str = "org.apache.maven.plugin.Mojo";

/// Isolated classloading scope for one plugin archive. Keeps the plugin's
/// own dependencies from colliding with the host classpath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRealm {
    pub id: String,
    pub archive: PathBuf,
}

impl PluginRealm {
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            id: "maven.plugin".to_string(),
            archive: archive.into(),
        }
    }
}

/// One declared parameter of a goal. The expression is the explicit value
/// wired in the descriptor; the default applies when the expression
/// evaluates to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Descriptor of a single goal inside a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MojoSpec {
    pub goal: String,
    pub implementation: String,
    /// Role hint under which the implementation is registered, derived from
    /// the plugin's goal prefix at parse time.
    pub role_hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurator: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSpec>,
}

impl MojoSpec {
    pub fn role(&self) -> &'static str {
        MOJO_ROLE
    }
}

/// The plugin descriptor extracted from a packaged plugin archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub coordinate: Coordinate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_prefix: Option<String>,
    pub mojos: Vec<MojoSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    realm: Option<PluginRealm>,
}

impl PluginDescriptor {
    /// Parse descriptor XML. The archive path is only used for error context.
    pub fn parse(archive: &Path, xml: &str) -> Result<Self> {
        let document = Document::parse(xml).map_err(|e| malformed(archive, e.to_string()))?;
        let root = document.root_element();
        if root.tag_name().name() != "plugin" {
            return Err(malformed(
                archive,
                format!(
                    "expected <plugin> root element, found <{}>",
                    root.tag_name().name()
                ),
            ));
        }

        let group_id = required_text(archive, root, "groupId")?;
        let artifact_id = required_text(archive, root, "artifactId")?;
        let version = required_text(archive, root, "version")?;
        let coordinate = Coordinate::new(group_id, artifact_id, version)
            .ok_or_else(|| malformed(archive, "empty plugin coordinate element".to_string()))?;
        let goal_prefix = child_text(root, "goalPrefix");

        let mut mojos = Vec::new();
        if let Some(mojos_node) = child_element(root, "mojos") {
            for node in mojos_node.children().filter(|c| is_named(c, "mojo")) {
                mojos.push(parse_mojo(archive, node, goal_prefix.as_deref())?);
            }
        }
        debug!(plugin = %coordinate, goals = mojos.len(), "parsed plugin descriptor");

        Ok(Self {
            coordinate,
            goal_prefix,
            mojos,
            realm: None,
        })
    }

    /// Look up a goal by name.
    pub fn goal(&self, name: &str) -> Result<&MojoSpec> {
        self.mojos
            .iter()
            .find(|mojo| mojo.goal == name)
            .ok_or_else(|| Error::GoalNotFound {
                goal: name.to_string(),
            })
    }

    pub fn bind_realm(&mut self, realm: PluginRealm) {
        self.realm = Some(realm);
    }

    pub fn realm(&self) -> Option<&PluginRealm> {
        self.realm.as_ref()
    }
}

fn parse_mojo(
    archive: &Path,
    node: Node<'_, '_>,
    goal_prefix: Option<&str>,
) -> Result<MojoSpec> {
    let goal = child_text(node, "goal")
        .ok_or_else(|| malformed(archive, "mojo entry missing <goal>".to_string()))?;
    let implementation = child_text(node, "implementation")
        .ok_or_else(|| malformed(archive, format!("goal '{goal}' missing <implementation>")))?;
    let role_hint = match goal_prefix {
        Some(prefix) => format!("{prefix}:{goal}"),
        None => goal.clone(),
    };

    let mut parameters = Vec::new();
    if let Some(parameters_node) = child_element(node, "parameters") {
        for parameter in parameters_node.children().filter(|c| is_named(c, "parameter")) {
            let Some(name) = child_text(parameter, "name") else {
                debug!(goal = %goal, "skipping unnamed parameter");
                continue;
            };
            parameters.push(ParameterSpec {
                name,
                expression: None,
                default_value: None,
            });
        }
    }
    // Values and defaults live in the mojo's own configuration section,
    // keyed by parameter name.
    if let Some(configuration) = child_element(node, "configuration") {
        for element in configuration.children().filter(|c| c.is_element()) {
            let name = element.tag_name().name();
            if let Some(parameter) = parameters.iter_mut().find(|p| p.name == name) {
                parameter.expression = element_text(element);
                parameter.default_value =
                    element.attribute("default-value").map(str::to_string);
            }
        }
    }

    Ok(MojoSpec {
        goal,
        implementation,
        role_hint,
        configurator: child_text(node, "configurator"),
        parameters,
    })
}

fn required_text(archive: &Path, node: Node<'_, '_>, name: &str) -> Result<String> {
    child_text(node, name).ok_or_else(|| malformed(archive, format!("missing <{name}> element")))
}

fn malformed(archive: &Path, message: String) -> Error {
    Error::DescriptorError {
        archive: archive.to_path_buf(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plugin>
  <name>Compiler Plugin</name>
  <groupId>org.apache.maven.plugins</groupId>
  <artifactId>maven-compiler-plugin</artifactId>
  <version>2.3.2</version>
  <goalPrefix>compiler</goalPrefix>
  <mojos>
    <mojo>
      <goal>compile</goal>
      <implementation>org.apache.maven.plugin.CompilerMojo</implementation>
      <language>java</language>
      <parameters>
        <parameter>
          <name>source</name>
          <type>java.lang.String</type>
          <required>false</required>
        </parameter>
        <parameter>
          <name>verbose</name>
          <type>boolean</type>
          <required>false</required>
        </parameter>
        <parameter>
          <name>outputDirectory</name>
          <type>java.io.File</type>
          <required>true</required>
        </parameter>
      </parameters>
      <configuration>
        <source default-value="1.5">${maven.compiler.source}</source>
        <outputDirectory default-value="${project.build.outputDirectory}"/>
      </configuration>
    </mojo>
    <mojo>
      <goal>testCompile</goal>
      <implementation>org.apache.maven.plugin.TestCompilerMojo</implementation>
      <configurator>override</configurator>
    </mojo>
  </mojos>
</plugin>
"#;

    fn parse() -> PluginDescriptor {
        PluginDescriptor::parse(Path::new("plugin.jar"), DESCRIPTOR_XML).unwrap()
    }

    #[test]
    fn test_parses_identity_and_goals() {
        let descriptor = parse();
        assert_eq!(
            descriptor.coordinate.to_string(),
            "org.apache.maven.plugins:maven-compiler-plugin:2.3.2"
        );
        assert_eq!(descriptor.goal_prefix.as_deref(), Some("compiler"));
        assert_eq!(descriptor.mojos.len(), 2);
    }

    #[test]
    fn test_role_hint_uses_goal_prefix() {
        let descriptor = parse();
        let compile = descriptor.goal("compile").unwrap();
        assert_eq!(compile.role_hint, "compiler:compile");
        assert_eq!(compile.role(), MOJO_ROLE);
    }

    #[test]
    fn test_parameters_join_with_configuration_section() {
        let descriptor = parse();
        let compile = descriptor.goal("compile").unwrap();
        assert_eq!(compile.parameters.len(), 3);

        let source = &compile.parameters[0];
        assert_eq!(source.expression.as_deref(), Some("${maven.compiler.source}"));
        assert_eq!(source.default_value.as_deref(), Some("1.5"));

        let verbose = &compile.parameters[1];
        assert_eq!(verbose.expression, None);
        assert_eq!(verbose.default_value, None);

        let output = &compile.parameters[2];
        assert_eq!(output.expression, None);
        assert_eq!(
            output.default_value.as_deref(),
            Some("${project.build.outputDirectory}")
        );
    }

    #[test]
    fn test_unknown_goal_lookup_fails() {
        let descriptor = parse();
        let result = descriptor.goal("install");
        assert!(matches!(result, Err(Error::GoalNotFound { goal }) if goal == "install"));
    }

    #[test]
    fn test_missing_implementation_is_malformed() {
        let xml = r#"<plugin>
  <groupId>g</groupId>
  <artifactId>a</artifactId>
  <version>1.0</version>
  <mojos>
    <mojo><goal>run</goal></mojo>
  </mojos>
</plugin>"#;
        let result = PluginDescriptor::parse(Path::new("plugin.jar"), xml);
        assert!(matches!(result, Err(Error::DescriptorError { .. })));
    }
}

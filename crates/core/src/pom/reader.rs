use std::path::Path;

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{BuildPlugin, Exclusion, PluginExecutionDecl, PluginKey, RepositoryRecord};
use crate::xml::{child_element, child_text, convert_config, element_text, is_named};

/// Plugins without an explicit group default to the tool's own namespace.
const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

/// Raw fields extracted from one descriptor, before validation.
///
/// Coordinate fields stay optional here; the builder decides which gaps are
/// acceptable for the requested validation level.
#[derive(Debug, Default)]
pub(crate) struct RawDescriptor {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    pub parent: Option<RawParent>,
    pub dependencies: Vec<RawDependency>,
    pub repositories: Vec<RepositoryRecord>,
    pub plugins: Vec<BuildPlugin>,
    pub modules: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct RawParent {
    pub group_id: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug)]
pub(crate) struct RawDependency {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub exclusions: Vec<Exclusion>,
}

/// Parse descriptor XML into raw owned fields.
pub(crate) fn parse_descriptor(path: &Path, text: &str) -> Result<RawDescriptor> {
    let document = Document::parse(text).map_err(|e| Error::ModelError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let project = document.root_element();
    if project.tag_name().name() != "project" {
        return Err(Error::ModelError {
            path: path.to_path_buf(),
            message: format!(
                "expected <project> root element, found <{}>",
                project.tag_name().name()
            ),
        });
    }

    let mut raw = RawDescriptor {
        group_id: child_text(project, "groupId"),
        artifact_id: child_text(project, "artifactId"),
        version: child_text(project, "version"),
        packaging: child_text(project, "packaging"),
        name: child_text(project, "name"),
        ..RawDescriptor::default()
    };

    if let Some(parent) = child_element(project, "parent") {
        raw.parent = Some(RawParent {
            group_id: child_text(parent, "groupId"),
            version: child_text(parent, "version"),
        });
    }

    if let Some(dependencies) = child_element(project, "dependencies") {
        for node in dependencies.children().filter(|c| is_named(c, "dependency")) {
            raw.dependencies.push(parse_dependency(node));
        }
    }

    if let Some(repositories) = child_element(project, "repositories") {
        for node in repositories.children().filter(|c| is_named(c, "repository")) {
            if let Some(repository) = parse_repository(node) {
                raw.repositories.push(repository);
            } else {
                debug!(path = %path.display(), "skipping repository without id or url");
            }
        }
    }

    if let Some(plugins) = child_element(project, "build")
        .and_then(|build| child_element(build, "plugins"))
    {
        for node in plugins.children().filter(|c| is_named(c, "plugin")) {
            raw.plugins.push(parse_plugin(node));
        }
    }

    if let Some(modules) = child_element(project, "modules") {
        for node in modules.children().filter(|c| is_named(c, "module")) {
            if let Some(module) = element_text(node) {
                raw.modules.push(module);
            }
        }
    }

    Ok(raw)
}

fn parse_dependency(node: Node<'_, '_>) -> RawDependency {
    let mut exclusions = Vec::new();
    if let Some(exclusions_node) = child_element(node, "exclusions") {
        for exclusion in exclusions_node.children().filter(|c| is_named(c, "exclusion")) {
            exclusions.push(Exclusion {
                group_id: child_text(exclusion, "groupId").unwrap_or_default(),
                artifact_id: child_text(exclusion, "artifactId").unwrap_or_default(),
            });
        }
    }
    RawDependency {
        group_id: child_text(node, "groupId"),
        artifact_id: child_text(node, "artifactId"),
        version: child_text(node, "version"),
        scope: child_text(node, "scope"),
        exclusions,
    }
}

fn parse_repository(node: Node<'_, '_>) -> Option<RepositoryRecord> {
    let id = child_text(node, "id")?;
    let url = child_text(node, "url")?;
    let mut repository = RepositoryRecord::new(id, url);
    repository.name = child_text(node, "name");
    Some(repository)
}

fn parse_plugin(node: Node<'_, '_>) -> BuildPlugin {
    let group_id =
        child_text(node, "groupId").unwrap_or_else(|| DEFAULT_PLUGIN_GROUP.to_string());
    let artifact_id = child_text(node, "artifactId").unwrap_or_default();
    let mut plugin = BuildPlugin::new(PluginKey::new(group_id, artifact_id));
    plugin.version = child_text(node, "version");
    plugin.configuration = child_element(node, "configuration").map(convert_config);

    if let Some(executions) = child_element(node, "executions") {
        for execution in executions.children().filter(|c| is_named(c, "execution")) {
            let mut goals = Vec::new();
            if let Some(goals_node) = child_element(execution, "goals") {
                for goal in goals_node.children().filter(|c| is_named(c, "goal")) {
                    if let Some(goal) = element_text(goal) {
                        goals.push(goal);
                    }
                }
            }
            plugin.executions.push(PluginExecutionDecl {
                id: child_text(execution, "id"),
                goals,
            });
        }
    }
    plugin
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <groupId>org.example</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <packaging>war</packaging>
  <name>Example App</name>
  <dependencies>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
      <version>1.7.36</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13.2</version>
      <scope>test</scope>
      <exclusions>
        <exclusion>
          <groupId>org.hamcrest</groupId>
          <artifactId>hamcrest-core</artifactId>
        </exclusion>
      </exclusions>
    </dependency>
  </dependencies>
  <repositories>
    <repository>
      <id>central-mirror</id>
      <name>Central Mirror</name>
      <url>https://repo.example.org/maven2</url>
    </repository>
  </repositories>
  <build>
    <plugins>
      <plugin>
        <artifactId>maven-compiler-plugin</artifactId>
        <configuration>
          <source>1.8</source>
          <target>1.8</target>
        </configuration>
      </plugin>
    </plugins>
  </build>
</project>
"#;

    fn parse(text: &str) -> RawDescriptor {
        parse_descriptor(&PathBuf::from("pom.xml"), text).unwrap()
    }

    #[test]
    fn test_parses_identity_and_packaging() {
        let raw = parse(SAMPLE);
        assert_eq!(raw.group_id.as_deref(), Some("org.example"));
        assert_eq!(raw.artifact_id.as_deref(), Some("app"));
        assert_eq!(raw.version.as_deref(), Some("1.0"));
        assert_eq!(raw.packaging.as_deref(), Some("war"));
        assert_eq!(raw.name.as_deref(), Some("Example App"));
    }

    #[test]
    fn test_parses_dependencies_in_declaration_order() {
        let raw = parse(SAMPLE);
        assert_eq!(raw.dependencies.len(), 2);
        assert_eq!(raw.dependencies[0].artifact_id.as_deref(), Some("slf4j-api"));
        assert_eq!(raw.dependencies[0].scope, None);
        assert_eq!(raw.dependencies[1].scope.as_deref(), Some("test"));
        assert_eq!(raw.dependencies[1].exclusions.len(), 1);
        assert_eq!(raw.dependencies[1].exclusions[0].group_id, "org.hamcrest");
    }

    #[test]
    fn test_plugin_group_defaults_to_tool_namespace() {
        let raw = parse(SAMPLE);
        assert_eq!(raw.plugins.len(), 1);
        assert_eq!(
            raw.plugins[0].key.to_string(),
            "org.apache.maven.plugins:maven-compiler-plugin"
        );
        assert_eq!(
            raw.plugins[0].configuration.as_ref().unwrap().child_value("source"),
            Some("1.8")
        );
    }

    #[test]
    fn test_parses_repositories() {
        let raw = parse(SAMPLE);
        assert_eq!(raw.repositories.len(), 1);
        assert_eq!(raw.repositories[0].id, "central-mirror");
        assert_eq!(raw.repositories[0].url, "https://repo.example.org/maven2");
    }

    #[test]
    fn test_rejects_wrong_root_element() {
        let result = parse_descriptor(&PathBuf::from("pom.xml"), "<settings/>");
        assert!(matches!(result, Err(Error::ModelError { .. })));
    }

    #[test]
    fn test_parses_parent_fallback_fields() {
        let text = r#"<project>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>2.0</version>
  </parent>
  <artifactId>child</artifactId>
</project>"#;
        let raw = parse(text);
        assert_eq!(raw.group_id, None);
        let parent = raw.parent.unwrap();
        assert_eq!(parent.group_id.as_deref(), Some("org.example"));
        assert_eq!(parent.version.as_deref(), Some("2.0"));
    }
}

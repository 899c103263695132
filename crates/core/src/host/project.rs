use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::RepositoryRecord;

use super::{ConfigurationGraph, ProjectId};

/// Test framework driving the host project's test task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    #[default]
    JUnit,
    TestNg,
}

/// Compilation and classpath state added when a JVM-language plugin is
/// applied. Its presence is what marks a project as "evaluated" for
/// cross-project resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JavaExtension {
    pub main_compile_classpath: Vec<String>,
    pub main_runtime_classpath: Vec<String>,
    pub test_compile_classpath: Vec<String>,
    pub test_runtime_classpath: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_compatibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_compatibility: Option<String>,
    #[serde(default)]
    pub test_framework: TestFramework,
}

impl JavaExtension {
    pub(crate) fn standard() -> Self {
        Self {
            main_compile_classpath: vec!["compile".to_string()],
            main_runtime_classpath: vec!["compile".to_string(), "runtime".to_string()],
            test_compile_classpath: vec!["compile".to_string(), "testCompile".to_string()],
            test_runtime_classpath: vec![
                "compile".to_string(),
                "runtime".to_string(),
                "testCompile".to_string(),
                "testRuntime".to_string(),
            ],
            source_compatibility: None,
            target_compatibility: None,
            test_framework: TestFramework::JUnit,
        }
    }

    /// Make a configuration visible on every compile and runtime classpath.
    pub fn add_to_all_classpaths(&mut self, configuration: &str) {
        for classpath in [
            &mut self.main_compile_classpath,
            &mut self.main_runtime_classpath,
            &mut self.test_compile_classpath,
            &mut self.test_runtime_classpath,
        ] {
            if !classpath.iter().any(|name| name == configuration) {
                classpath.push(configuration.to_string());
            }
        }
    }

    pub(crate) fn add_to_compile_classpaths(&mut self, configuration: &str) {
        for classpath in [&mut self.main_compile_classpath, &mut self.test_compile_classpath] {
            if !classpath.iter().any(|name| name == configuration) {
                classpath.push(configuration.to_string());
            }
        }
    }

    pub(crate) fn add_to_runtime_classpaths(&mut self, configuration: &str) {
        for classpath in [&mut self.main_runtime_classpath, &mut self.test_runtime_classpath] {
            if !classpath.iter().any(|name| name == configuration) {
                classpath.push(configuration.to_string());
            }
        }
    }
}

/// IDE integration state. When present, configurations materialized after
/// project setup must be registered here too or the IDE model misses them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeExtension {
    pub extra_scopes: Vec<String>,
}

impl IdeExtension {
    pub fn register_scope(&mut self, configuration: &str) {
        if !self.extra_scopes.iter().any(|name| name == configuration) {
            self.extra_scopes.push(configuration.to_string());
        }
    }
}

/// A task registered on the host project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostTask {
    pub name: String,
    pub task_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A test-output reference that could not be resolved when the requesting
/// project was translated. Held by the *target* project and drained once
/// that project is evaluated; the edge then lands back in the requester's
/// graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredReference {
    pub requester: ProjectId,
    pub configuration: String,
}

/// One project in the host build session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostProject {
    pub name: String,
    pub dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub graph: ConfigurationGraph,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<JavaExtension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ide: Option<IdeExtension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<HostTask>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) deferred: Vec<DeferredReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provided_configuration: Option<String>,
}

impl HostProject {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            group: None,
            version: None,
            status: None,
            graph: ConfigurationGraph::new(),
            java: None,
            ide: None,
            repositories: Vec::new(),
            tasks: Vec::new(),
            deferred: Vec::new(),
            provided_configuration: None,
        }
    }

    /// Whether this project's own build configuration has been evaluated.
    pub fn is_evaluated(&self) -> bool {
        self.java.is_some()
    }

    /// Park a test-output reference until this project is evaluated.
    pub fn defer_reference(&mut self, reference: DeferredReference) {
        self.deferred.push(reference);
    }

    pub(crate) fn take_deferred(&mut self) -> Vec<DeferredReference> {
        std::mem::take(&mut self.deferred)
    }

    /// Create the lazily materialized configuration on first use, wiring it
    /// into every compile/runtime classpath and any IDE extension, but not
    /// into the published configurations. Memoized per project.
    pub fn materialize_configuration(&mut self, name: &str) {
        if self.provided_configuration.as_deref() == Some(name) {
            return;
        }
        self.graph.create(name);
        if let Some(java) = &mut self.java {
            java.add_to_all_classpaths(name);
        }
        if let Some(ide) = &mut self.ide {
            ide.register_scope(name);
        }
        self.provided_configuration = Some(name.to_string());
    }

    pub fn register_task(&mut self, task: HostTask) {
        if !self.tasks.iter().any(|t| t.name == task.name) {
            self.tasks.push(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_is_unevaluated() {
        let project = HostProject::new("app", "/tmp/app");
        assert!(!project.is_evaluated());
    }

    #[test]
    fn test_materialize_configuration_is_memoized() {
        let mut project = HostProject::new("app", "/tmp/app");
        project.java = Some(JavaExtension::standard());
        project.ide = Some(IdeExtension::default());

        project.materialize_configuration("provided");
        project.materialize_configuration("provided");

        assert!(project.graph.contains("provided"));
        let java = project.java.as_ref().unwrap();
        assert_eq!(
            java.main_compile_classpath
                .iter()
                .filter(|name| *name == "provided")
                .count(),
            1
        );
        assert!(java.test_runtime_classpath.contains(&"provided".to_string()));
        assert_eq!(project.ide.as_ref().unwrap().extra_scopes, vec!["provided"]);
    }

    #[test]
    fn test_materialized_configuration_stays_out_of_published_set() {
        let mut project = HostProject::new("app", "/tmp/app");
        project.graph.create("default");
        project.graph.create("archives");
        project.java = Some(JavaExtension::standard());

        project.materialize_configuration("provided");

        assert!(project.graph.edges("default").unwrap().is_empty());
        assert!(project.graph.edges("archives").unwrap().is_empty());
    }
}

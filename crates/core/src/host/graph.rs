use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::DependencyEdge;

/// Configurations whose edges must resolve to test output rather than the
/// packaged artifact when they point at another project.
pub fn is_test_configuration(name: &str) -> bool {
    matches!(name, "testCompile" | "testRuntime")
}

/// A named, ordered bucket of dependency edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<DependencyEdge>,
}

impl Configuration {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            edges: Vec::new(),
        }
    }
}

/// The host project's dependency graph: named configurations, each holding
/// edges in insertion order. The graph only grows; nothing removes edges or
/// configurations once added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationGraph {
    configurations: Vec<Configuration>,
}

impl ConfigurationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a configuration if it does not already exist.
    pub fn create(&mut self, name: &str) {
        if !self.contains(name) {
            self.configurations.push(Configuration::new(name));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.configurations.iter().any(|c| c.name == name)
    }

    /// Append an edge to a known configuration. Unknown names are an error
    /// here; lazily created configurations go through `create` first.
    pub fn add_edge(&mut self, configuration: &str, edge: DependencyEdge) -> Result<()> {
        let target = self
            .configurations
            .iter_mut()
            .find(|c| c.name == configuration)
            .ok_or_else(|| Error::UnknownConfiguration(configuration.to_string()))?;
        target.edges.push(edge);
        Ok(())
    }

    pub fn edges(&self, configuration: &str) -> Option<&[DependencyEdge]> {
        self.configurations
            .iter()
            .find(|c| c.name == configuration)
            .map(|c| c.edges.as_slice())
    }

    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.configurations.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configurations.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    #[test]
    fn test_create_is_idempotent() {
        let mut graph = ConfigurationGraph::new();
        graph.create("compile");
        graph.create("compile");
        assert_eq!(graph.names().count(), 1);
    }

    #[test]
    fn test_add_edge_to_unknown_configuration_fails() {
        let mut graph = ConfigurationGraph::new();
        let edge = DependencyEdge::external(
            Coordinate::new("g", "a", "1.0").unwrap(),
            Vec::new(),
        );
        let result = graph.add_edge("compile", edge);
        assert!(matches!(result, Err(Error::UnknownConfiguration(name)) if name == "compile"));
    }

    #[test]
    fn test_edges_preserve_insertion_order() {
        let mut graph = ConfigurationGraph::new();
        graph.create("compile");
        for artifact in ["first", "second", "third"] {
            graph
                .add_edge(
                    "compile",
                    DependencyEdge::external(
                        Coordinate::new("g", artifact, "1.0").unwrap(),
                        Vec::new(),
                    ),
                )
                .unwrap();
        }
        let edges = graph.edges("compile").unwrap();
        let artifacts: Vec<_> = edges
            .iter()
            .map(|edge| match edge {
                DependencyEdge::ExternalModule { coordinate, .. } => {
                    coordinate.artifact_id.as_str()
                }
                _ => panic!("expected external edge"),
            })
            .collect();
        assert_eq!(artifacts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_test_configuration_names() {
        assert!(is_test_configuration("testCompile"));
        assert!(is_test_configuration("testRuntime"));
        assert!(!is_test_configuration("compile"));
        assert!(!is_test_configuration("provided"));
    }
}

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{BuildPlugin, Coordinate, DependencyRecord, RepositoryRecord};

/// A fully built source project model.
///
/// Parent inheritance is already resolved: `coordinate` holds the effective
/// group/version even when the descriptor relied on parent fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectModel {
    pub coordinate: Coordinate,
    pub packaging: String,
    pub basedir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<BuildPlugin>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
}

impl ProjectModel {
    pub fn new(coordinate: Coordinate, basedir: PathBuf) -> Self {
        Self {
            coordinate,
            packaging: "jar".to_string(),
            basedir,
            name: None,
            dependencies: Vec::new(),
            repositories: Vec::new(),
            plugins: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// Look up a declared plugin by its "groupId:artifactId" key.
    pub fn plugin(&self, key: &str) -> Option<&BuildPlugin> {
        self.plugins.iter().find(|p| p.key.to_string() == key)
    }

    /// Whether this model aggregates child modules.
    pub fn is_aggregator(&self) -> bool {
        !self.modules.is_empty()
    }
}

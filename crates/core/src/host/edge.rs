use serde::{Deserialize, Serialize};

use crate::model::{Coordinate, Exclusion};

use super::ProjectId;

/// Which output of a referenced project an edge resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectOutput {
    /// The project's published artifact, through the named configuration.
    PackagedArtifact { target_configuration: String },
    /// The project's compiled test classes. Test code is never packaged, so
    /// test-scope references cannot go through the published artifact.
    TestClasses,
}

impl ProjectOutput {
    pub fn packaged_default() -> Self {
        ProjectOutput::PackagedArtifact {
            target_configuration: "default".to_string(),
        }
    }
}

/// One dependency edge in a host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DependencyEdge {
    /// Resolved from a repository. Exclusion filters only make sense here.
    ExternalModule {
        coordinate: Coordinate,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exclusions: Vec<Exclusion>,
    },
    /// Another project in the same build session.
    ProjectReference {
        project: ProjectId,
        output: ProjectOutput,
        /// Whether the referenced project is rebuilt before use, from the
        /// host run's global setting.
        rebuild_dependencies: bool,
    },
}

impl DependencyEdge {
    pub fn external(coordinate: Coordinate, exclusions: Vec<Exclusion>) -> Self {
        DependencyEdge::ExternalModule {
            coordinate,
            exclusions,
        }
    }

    pub fn is_project_reference(&self) -> bool {
        matches!(self, DependencyEdge::ProjectReference { .. })
    }
}

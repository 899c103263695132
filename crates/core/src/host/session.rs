use std::path::Path;

use serde::{Deserialize, Serialize};

use super::HostProject;

/// Index of a project within its build session. Stable for the session's
/// lifetime; projects are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub usize);

/// All host projects participating in one build invocation, in the order the
/// host tool processes them.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BuildSession {
    projects: Vec<HostProject>,
    /// Global setting: whether project references rebuild their target
    /// before use.
    pub rebuild_dependencies: bool,
}

impl BuildSession {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            rebuild_dependencies: true,
        }
    }

    pub fn with_rebuild_dependencies(mut self, rebuild: bool) -> Self {
        self.rebuild_dependencies = rebuild;
        self
    }

    pub fn add_project(&mut self, project: HostProject) -> ProjectId {
        self.projects.push(project);
        ProjectId(self.projects.len() - 1)
    }

    pub fn project(&self, id: ProjectId) -> &HostProject {
        &self.projects[id.0]
    }

    pub fn project_mut(&mut self, id: ProjectId) -> &mut HostProject {
        &mut self.projects[id.0]
    }

    /// Locate the host project rooted at the given directory.
    pub fn find_by_dir(&self, dir: &Path) -> Option<ProjectId> {
        self.projects
            .iter()
            .position(|project| project.dir == dir)
            .map(ProjectId)
    }

    pub fn ids(&self) -> impl Iterator<Item = ProjectId> {
        (0..self.projects.len()).map(ProjectId)
    }

    pub fn projects(&self) -> impl Iterator<Item = (ProjectId, &HostProject)> {
        self.projects
            .iter()
            .enumerate()
            .map(|(index, project)| (ProjectId(index), project))
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

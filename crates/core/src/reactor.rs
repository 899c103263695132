use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::model::{Coordinate, ProjectModel};
use crate::pom::{ModelBuildRequest, ProjectModelBuilder, ValidationLevel};

/// Every module participating in one multi-module build, in discovery order.
///
/// Built once before translation starts and read-only afterwards. Lookup is
/// exact-triple coordinate equality; when several modules share a coordinate
/// the first discovered one wins, which keeps resolution deterministic.
#[derive(Debug, Default)]
pub struct ReactorIndex {
    modules: Vec<ProjectModel>,
}

impl ReactorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_modules(modules: Vec<ProjectModel>) -> Self {
        Self { modules }
    }

    /// Discover the reactor rooted at a descriptor. Validation is relaxed to
    /// minimal because sibling modules are frequently not buildable in
    /// isolation, yet must still be indexable by coordinate.
    pub fn discover(builder: &dyn ProjectModelBuilder, descriptor: &Path) -> Result<Self> {
        let request =
            ModelBuildRequest::new(descriptor).with_validation(ValidationLevel::Minimal);
        let modules = builder.build_reactor(&request)?;
        debug!(modules = modules.len(), root = %descriptor.display(), "discovered reactor");
        Ok(Self { modules })
    }

    /// First module whose coordinate matches exactly on all three fields.
    pub fn find(&self, coordinate: &Coordinate) -> Option<&ProjectModel> {
        self.modules
            .iter()
            .find(|module| module.coordinate.matches(coordinate))
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.find(coordinate).is_some()
    }

    pub fn modules(&self) -> &[ProjectModel] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

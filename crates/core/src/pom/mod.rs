pub mod builder;
pub mod reader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::ProjectModel;

pub use builder::PomModelBuilder;

/// How strictly a descriptor is validated while building its model.
///
/// Sibling modules in a multi-module build are often not buildable in
/// isolation, so reactor discovery runs at `Minimal` and only the entry
/// project is held to `Strict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Strict,
    Minimal,
}

/// Request describing which descriptor to build and how.
#[derive(Debug, Clone)]
pub struct ModelBuildRequest {
    pub descriptor_path: PathBuf,
    pub validation: ValidationLevel,
}

impl ModelBuildRequest {
    pub fn new(descriptor_path: impl Into<PathBuf>) -> Self {
        Self {
            descriptor_path: descriptor_path.into(),
            validation: ValidationLevel::Strict,
        }
    }

    pub fn with_validation(mut self, validation: ValidationLevel) -> Self {
        self.validation = validation;
        self
    }

    /// Directory containing the descriptor.
    pub fn basedir(&self) -> &Path {
        self.descriptor_path.parent().unwrap_or(Path::new("."))
    }
}

/// Builds source project models from on-disk descriptors.
pub trait ProjectModelBuilder {
    /// Build the model for a single descriptor, without following modules.
    fn build(&self, request: &ModelBuildRequest) -> Result<ProjectModel>;

    /// Build the descriptor's model plus every transitive `<module>` entry,
    /// in document order, parent before children.
    fn build_reactor(&self, request: &ModelBuildRequest) -> Result<Vec<ProjectModel>>;
}

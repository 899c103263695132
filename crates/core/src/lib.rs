//! m2bridge - Projects Maven project metadata onto a Gradle-style build model
//!
//! This crate provides functionality to:
//! - Build project models from `pom.xml` descriptors, including multi-module reactors
//! - Translate dependency declarations into host configurations, resolving reactor
//!   siblings to project references instead of external artifacts
//! - Extract plugin descriptors from packaged plugin archives and drive single
//!   goal executions through an opaque execution session
pub mod bridge;
pub mod error;
pub mod host;
pub mod mapping;
pub mod model;
pub mod mojo;
pub mod pom;
pub mod reactor;
pub mod translate;

mod xml;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use model::*;

// Re-export main API components
pub use bridge::MetadataBridge;
pub use host::{BuildSession, DependencyEdge, HostProject, ProjectId, ProjectOutput};
pub use mapping::MappingTables;
pub use mojo::{ClassRef, ExternalGoalRunner, MojoInvocationBridge, MojoRunner, PluginArchiveLoader};
pub use pom::{ModelBuildRequest, PomModelBuilder, ProjectModelBuilder, ValidationLevel};
pub use reactor::ReactorIndex;
pub use translate::ModelTranslator;

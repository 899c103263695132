pub mod edge;
pub mod graph;
pub mod plugins;
pub mod project;
pub mod session;

pub use edge::{DependencyEdge, ProjectOutput};
pub use graph::{Configuration, ConfigurationGraph, is_test_configuration};
pub use plugins::HostPlugin;
pub use project::{
    DeferredReference, HostProject, HostTask, IdeExtension, JavaExtension, TestFramework,
};
pub use session::{BuildSession, ProjectId};

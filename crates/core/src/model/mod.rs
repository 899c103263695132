pub mod coordinate;
pub mod dependency;
pub mod document;
pub mod plugin;
pub mod project;
pub mod repository;

pub use coordinate::Coordinate;
pub use dependency::{DependencyRecord, DependencyScope, Exclusion};
pub use document::ConfigElement;
pub use plugin::{BuildPlugin, PluginExecutionDecl, PluginKey};
pub use project::ProjectModel;
pub use repository::RepositoryRecord;

use std::io;
use std::path::PathBuf;

/// Errors that can occur during m2bridge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("failed to read project descriptor {path}: {message}")]
    ModelError { path: PathBuf, message: String },

    #[error("configuration '{0}' is not known to the host model")]
    UnknownConfiguration(String),

    #[error("no host project found for reactor module {module} at {basedir}")]
    UnresolvedProjectReference { module: String, basedir: PathBuf },

    #[error("class {class} was not loaded from a packaged archive: {location}")]
    NotPackagedArchive { class: String, location: String },

    #[error("failed to read plugin archive {archive}: {message}")]
    ArchiveError { archive: PathBuf, message: String },

    #[error("descriptor entry {entry} missing from plugin archive {archive}")]
    MissingDescriptor { archive: PathBuf, entry: String },

    #[error("malformed plugin descriptor in {archive}: {message}")]
    DescriptorError { archive: PathBuf, message: String },

    #[error("goal '{goal}' not found in plugin descriptor")]
    GoalNotFound { goal: String },

    #[error("no class realm bound for plugin '{plugin}'")]
    RealmNotBound { plugin: String },

    #[error("execution container error: {0}")]
    ContainerError(String),

    #[error("failed to execute goal '{goal}'")]
    GoalExecutionError {
        goal: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a failure with the identity of the goal that caused it.
    pub fn goal_execution(goal: impl Into<String>, source: Error) -> Self {
        Error::GoalExecutionError {
            goal: goal.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for m2bridge operations
pub type Result<T> = std::result::Result<T, Error>;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The (group, artifact, version) triple identifying a module or dependency.
///
/// Equality is exact string match on all three fields; there is no version
/// range or "latest" handling anywhere in the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    /// Build a coordinate, rejecting empty fields.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Option<Self> {
        let coordinate = Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        };
        if coordinate.group_id.is_empty()
            || coordinate.artifact_id.is_empty()
            || coordinate.version.is_empty()
        {
            None
        } else {
            Some(coordinate)
        }
    }

    /// Whether this coordinate names a snapshot version.
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with("-SNAPSHOT")
    }

    /// Exact-triple match against another coordinate.
    pub fn matches(&self, other: &Coordinate) -> bool {
        self == other
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

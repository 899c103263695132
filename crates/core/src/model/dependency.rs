use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Declared scope of a dependency in the source model.
///
/// The well-known scopes get variants; anything else is carried through
/// verbatim so the mapping table can still match on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Compile,
    Test,
    Runtime,
    Provided,
    Custom(String),
}

impl DependencyScope {
    /// Parse a scope string; absent or empty scope defaults to compile.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("compile") => DependencyScope::Compile,
            Some("test") => DependencyScope::Test,
            Some("runtime") => DependencyScope::Runtime,
            Some("provided") => DependencyScope::Provided,
            Some(other) => DependencyScope::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DependencyScope::Compile => "compile",
            DependencyScope::Test => "test",
            DependencyScope::Runtime => "runtime",
            DependencyScope::Provided => "provided",
            DependencyScope::Custom(name) => name,
        }
    }
}

/// A group/artifact pair excluded from a dependency's transitive closure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

/// One dependency declaration from a source project model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub coordinate: Coordinate,
    pub scope: DependencyScope,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<Exclusion>,
}

impl DependencyRecord {
    pub fn new(coordinate: Coordinate, scope: DependencyScope) -> Self {
        Self {
            coordinate,
            scope,
            exclusions: Vec::new(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: Vec<Exclusion>) -> Self {
        self.exclusions = exclusions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_compile() {
        assert_eq!(DependencyScope::parse(None), DependencyScope::Compile);
        assert_eq!(DependencyScope::parse(Some("")), DependencyScope::Compile);
        assert_eq!(
            DependencyScope::parse(Some("compile")),
            DependencyScope::Compile
        );
    }

    #[test]
    fn test_parse_well_known_scopes() {
        assert_eq!(DependencyScope::parse(Some("test")), DependencyScope::Test);
        assert_eq!(
            DependencyScope::parse(Some("runtime")),
            DependencyScope::Runtime
        );
        assert_eq!(
            DependencyScope::parse(Some("provided")),
            DependencyScope::Provided
        );
    }

    #[test]
    fn test_parse_keeps_unknown_scope_verbatim() {
        let scope = DependencyScope::parse(Some("system"));
        assert_eq!(scope, DependencyScope::Custom("system".to_string()));
        assert_eq!(scope.as_str(), "system");
    }
}

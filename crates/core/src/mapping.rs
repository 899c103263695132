use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::DependencyScope;

/// One row of the scope mapping table. A row with no packaging applies to
/// every packaging type; more specific rows win by being listed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeMappingRow {
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    pub configuration: String,
    /// Whether the configuration may be created on the host project the
    /// first time this row is used, instead of being required to pre-exist.
    #[serde(default)]
    pub lazy: bool,
}

/// Mapping from (dependency scope, packaging type) to a host configuration
/// name. First matching row wins; lookup misses are reported to the caller,
/// never resolved to a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeConfigurationTable {
    rows: Vec<ScopeMappingRow>,
}

impl ScopeConfigurationTable {
    pub fn new(rows: Vec<ScopeMappingRow>) -> Self {
        Self { rows }
    }

    /// The built-in mapping. "provided" differs per packaging: the web
    /// archive plugin ships its own providedCompile configuration, while
    /// plain archives need one materialized on first use.
    pub fn standard() -> Self {
        Self::new(vec![
            row("provided", Some("war"), "providedCompile", false),
            row("provided", None, "provided", true),
            row("compile", None, "compile", false),
            row("test", None, "testCompile", false),
            row("runtime", None, "runtime", false),
        ])
    }

    pub fn row_for(&self, scope: &DependencyScope, packaging: &str) -> Option<&ScopeMappingRow> {
        self.rows.iter().find(|row| {
            row.scope == scope.as_str()
                && row
                    .packaging
                    .as_deref()
                    .map(|p| p == packaging)
                    .unwrap_or(true)
        })
    }

    pub fn configuration_for(&self, scope: &DependencyScope, packaging: &str) -> Option<&str> {
        self.row_for(scope, packaging)
            .map(|row| row.configuration.as_str())
    }
}

impl Default for ScopeConfigurationTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn row(scope: &str, packaging: Option<&str>, configuration: &str, lazy: bool) -> ScopeMappingRow {
    ScopeMappingRow {
        scope: scope.to_string(),
        packaging: packaging.map(str::to_string),
        configuration: configuration.to_string(),
        lazy,
    }
}

/// Mapping from a packaging type to the id of the host plugin that knows how
/// to build it. Unmapped packagings are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackagingPluginTable {
    rows: Vec<PackagingPluginRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingPluginRow {
    pub packaging: String,
    pub plugin: String,
}

impl PackagingPluginTable {
    pub fn new(rows: Vec<PackagingPluginRow>) -> Self {
        Self { rows }
    }

    pub fn standard() -> Self {
        Self::new(vec![
            PackagingPluginRow {
                packaging: "jar".to_string(),
                plugin: "java".to_string(),
            },
            PackagingPluginRow {
                packaging: "war".to_string(),
                plugin: "war".to_string(),
            },
        ])
    }

    pub fn plugin_for(&self, packaging: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.packaging == packaging)
            .map(|row| row.plugin.as_str())
    }
}

impl Default for PackagingPluginTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Both lookup tables bundled for loading from one mappings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingTables {
    #[serde(default)]
    pub scopes: ScopeConfigurationTable,
    #[serde(default)]
    pub packagings: PackagingPluginTable,
}

impl MappingTables {
    pub fn standard() -> Self {
        Self::default()
    }

    /// Load overriding tables from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(Error::IoError)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_scope_maps_to_test_compile() {
        let table = ScopeConfigurationTable::standard();
        assert_eq!(
            table.configuration_for(&DependencyScope::Test, "jar"),
            Some("testCompile")
        );
    }

    #[test]
    fn test_provided_differs_by_packaging() {
        let table = ScopeConfigurationTable::standard();
        let war = table.configuration_for(&DependencyScope::Provided, "war");
        let jar = table.configuration_for(&DependencyScope::Provided, "jar");
        assert_eq!(war, Some("providedCompile"));
        assert_eq!(jar, Some("provided"));
        assert_ne!(war, jar);
    }

    #[test]
    fn test_lazy_flag_is_per_row() {
        let table = ScopeConfigurationTable::standard();
        assert!(table.row_for(&DependencyScope::Provided, "jar").unwrap().lazy);
        assert!(!table.row_for(&DependencyScope::Provided, "war").unwrap().lazy);
        assert!(!table.row_for(&DependencyScope::Compile, "jar").unwrap().lazy);
    }

    #[test]
    fn test_unknown_scope_has_no_mapping() {
        let table = ScopeConfigurationTable::standard();
        let scope = DependencyScope::Custom("system".to_string());
        assert_eq!(table.configuration_for(&scope, "jar"), None);
    }

    #[test]
    fn test_packaging_plugin_lookup() {
        let table = PackagingPluginTable::standard();
        assert_eq!(table.plugin_for("jar"), Some("java"));
        assert_eq!(table.plugin_for("war"), Some("war"));
        assert_eq!(table.plugin_for("unknown"), None);
    }

    #[test]
    fn test_tables_round_trip_through_json() {
        let tables = MappingTables::standard();
        let json = serde_json::to_string(&tables).unwrap();
        let loaded: MappingTables = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.scopes, tables.scopes);
        assert_eq!(loaded.packagings, tables.packagings);
    }
}

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Coordinate, DependencyRecord, DependencyScope, ProjectModel};
use crate::pom::reader::{self, RawDependency, RawDescriptor};
use crate::pom::{ModelBuildRequest, ProjectModelBuilder, ValidationLevel};

/// Builds project models from `pom.xml` descriptors on disk.
///
/// Group and version fall back to the `<parent>` declaration at every
/// validation level; what `Minimal` relaxes is how incomplete dependency
/// declarations and broken sibling modules are treated.
#[derive(Debug, Default)]
pub struct PomModelBuilder;

impl PomModelBuilder {
    pub fn new() -> Self {
        Self
    }

    fn build_one(&self, path: &Path, validation: ValidationLevel) -> Result<ProjectModel> {
        let text = fs::read_to_string(path).map_err(|e| Error::ModelError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let raw = reader::parse_descriptor(path, &text)?;
        self.resolve_model(path, raw, validation)
    }

    fn resolve_model(
        &self,
        path: &Path,
        raw: RawDescriptor,
        validation: ValidationLevel,
    ) -> Result<ProjectModel> {
        let artifact_id = raw
            .artifact_id
            .clone()
            .ok_or_else(|| missing_element(path, "artifactId"))?;
        let group_id = raw
            .group_id
            .clone()
            .or_else(|| raw.parent.as_ref().and_then(|p| p.group_id.clone()))
            .ok_or_else(|| missing_element(path, "groupId"))?;
        let version = raw
            .version
            .clone()
            .or_else(|| raw.parent.as_ref().and_then(|p| p.version.clone()))
            .ok_or_else(|| missing_element(path, "version"))?;
        let coordinate =
            Coordinate::new(group_id, artifact_id, version).ok_or_else(|| Error::ModelError {
                path: path.to_path_buf(),
                message: "empty coordinate element".to_string(),
            })?;

        let basedir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let mut model = ProjectModel::new(coordinate, basedir);
        if let Some(packaging) = raw.packaging {
            model.packaging = packaging;
        }
        model.name = raw.name;
        model.repositories = raw.repositories;
        model.plugins = raw.plugins;
        model.modules = raw.modules;

        for dependency in raw.dependencies {
            if let Some(record) = self.resolve_dependency(path, dependency, validation)? {
                model.dependencies.push(record);
            }
        }
        debug!(
            project = %model.coordinate,
            dependencies = model.dependencies.len(),
            modules = model.modules.len(),
            "built project model"
        );
        Ok(model)
    }

    fn resolve_dependency(
        &self,
        path: &Path,
        raw: RawDependency,
        validation: ValidationLevel,
    ) -> Result<Option<DependencyRecord>> {
        let coordinate = match (&raw.group_id, &raw.artifact_id, &raw.version) {
            (Some(group), Some(artifact), Some(version)) => {
                Coordinate::new(group.clone(), artifact.clone(), version.clone())
            }
            _ => None,
        };
        let Some(coordinate) = coordinate else {
            return match validation {
                ValidationLevel::Strict => Err(Error::ModelError {
                    path: path.to_path_buf(),
                    message: format!(
                        "dependency {:?}:{:?} is missing coordinate elements",
                        raw.group_id, raw.artifact_id
                    ),
                }),
                ValidationLevel::Minimal => {
                    warn!(
                        path = %path.display(),
                        group = raw.group_id.as_deref().unwrap_or("?"),
                        artifact = raw.artifact_id.as_deref().unwrap_or("?"),
                        "dropping dependency with incomplete coordinate"
                    );
                    Ok(None)
                }
            };
        };
        let scope = DependencyScope::parse(raw.scope.as_deref());
        Ok(Some(
            DependencyRecord::new(coordinate, scope).with_exclusions(raw.exclusions),
        ))
    }

    fn collect_modules(
        &self,
        model: &ProjectModel,
        validation: ValidationLevel,
        visited: &mut HashSet<PathBuf>,
        output: &mut Vec<ProjectModel>,
    ) -> Result<()> {
        for module in &model.modules {
            let descriptor = model.basedir.join(module).join("pom.xml");
            let key = descriptor.canonicalize().unwrap_or_else(|_| descriptor.clone());
            if !visited.insert(key) {
                warn!(module = %module, "module already visited, skipping cycle");
                continue;
            }
            let child = match self.build_one(&descriptor, validation) {
                Ok(child) => child,
                Err(e) if validation == ValidationLevel::Minimal => {
                    warn!(
                        module = %module,
                        error = %e,
                        "skipping module that failed to build"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };
            output.push(child.clone());
            self.collect_modules(&child, validation, visited, output)?;
        }
        Ok(())
    }
}

impl ProjectModelBuilder for PomModelBuilder {
    fn build(&self, request: &ModelBuildRequest) -> Result<ProjectModel> {
        self.build_one(&request.descriptor_path, request.validation)
    }

    fn build_reactor(&self, request: &ModelBuildRequest) -> Result<Vec<ProjectModel>> {
        let root = self.build_one(&request.descriptor_path, request.validation)?;
        let mut visited = HashSet::new();
        visited.insert(
            request
                .descriptor_path
                .canonicalize()
                .unwrap_or_else(|_| request.descriptor_path.clone()),
        );
        let mut output = vec![root.clone()];
        self.collect_modules(&root, request.validation, &mut visited, &mut output)?;
        Ok(output)
    }
}

fn missing_element(path: &Path, name: &str) -> Error {
    Error::ModelError {
        path: path.to_path_buf(),
        message: format!("missing <{name}> element"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_pom(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("pom.xml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_builds_single_model() {
        let dir = TempDir::new().unwrap();
        let path = write_pom(
            dir.path(),
            r#"<project>
  <groupId>org.example</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
</project>"#,
        );
        let builder = PomModelBuilder::new();
        let model = builder.build(&ModelBuildRequest::new(&path)).unwrap();
        assert_eq!(model.coordinate.to_string(), "org.example:app:1.0");
        assert_eq!(model.packaging, "jar");
        assert_eq!(model.basedir, dir.path());
    }

    #[test]
    fn test_group_and_version_fall_back_to_parent() {
        let dir = TempDir::new().unwrap();
        let path = write_pom(
            dir.path(),
            r#"<project>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>parent</artifactId>
    <version>2.0</version>
  </parent>
  <artifactId>child</artifactId>
</project>"#,
        );
        let builder = PomModelBuilder::new();
        let model = builder.build(&ModelBuildRequest::new(&path)).unwrap();
        assert_eq!(model.coordinate.to_string(), "org.example:child:2.0");
    }

    #[test]
    fn test_strict_rejects_incomplete_dependency() {
        let dir = TempDir::new().unwrap();
        let path = write_pom(
            dir.path(),
            r#"<project>
  <groupId>org.example</groupId>
  <artifactId>app</artifactId>
  <version>1.0</version>
  <dependencies>
    <dependency>
      <groupId>org.slf4j</groupId>
      <artifactId>slf4j-api</artifactId>
    </dependency>
  </dependencies>
</project>"#,
        );
        let builder = PomModelBuilder::new();
        let strict = builder.build(&ModelBuildRequest::new(&path));
        assert!(matches!(strict, Err(Error::ModelError { .. })));

        let minimal = builder
            .build(&ModelBuildRequest::new(&path).with_validation(ValidationLevel::Minimal))
            .unwrap();
        assert!(minimal.dependencies.is_empty());
    }

    #[test]
    fn test_reactor_walks_modules_in_document_order() {
        let dir = TempDir::new().unwrap();
        write_pom(
            dir.path(),
            r#"<project>
  <groupId>org.example</groupId>
  <artifactId>root</artifactId>
  <version>1.0</version>
  <packaging>pom</packaging>
  <modules>
    <module>core</module>
    <module>web</module>
  </modules>
</project>"#,
        );
        for module in ["core", "web"] {
            let module_dir = dir.path().join(module);
            fs::create_dir(&module_dir).unwrap();
            write_pom(
                &module_dir,
                &format!(
                    r#"<project>
  <parent>
    <groupId>org.example</groupId>
    <artifactId>root</artifactId>
    <version>1.0</version>
  </parent>
  <artifactId>{module}</artifactId>
</project>"#
                ),
            );
        }
        let builder = PomModelBuilder::new();
        let reactor = builder
            .build_reactor(
                &ModelBuildRequest::new(dir.path().join("pom.xml"))
                    .with_validation(ValidationLevel::Minimal),
            )
            .unwrap();
        let artifacts: Vec<_> = reactor
            .iter()
            .map(|m| m.coordinate.artifact_id.as_str())
            .collect();
        assert_eq!(artifacts, vec!["root", "core", "web"]);
    }

    #[test]
    fn test_reactor_guards_against_module_cycles() {
        let dir = TempDir::new().unwrap();
        write_pom(
            dir.path(),
            r#"<project>
  <groupId>org.example</groupId>
  <artifactId>root</artifactId>
  <version>1.0</version>
  <modules>
    <module>child</module>
  </modules>
</project>"#,
        );
        let child_dir = dir.path().join("child");
        fs::create_dir(&child_dir).unwrap();
        write_pom(
            &child_dir,
            r#"<project>
  <groupId>org.example</groupId>
  <artifactId>child</artifactId>
  <version>1.0</version>
  <modules>
    <module>..</module>
  </modules>
</project>"#,
        );
        let builder = PomModelBuilder::new();
        let reactor = builder
            .build_reactor(
                &ModelBuildRequest::new(dir.path().join("pom.xml"))
                    .with_validation(ValidationLevel::Minimal),
            )
            .unwrap();
        assert_eq!(reactor.len(), 2);
    }

    #[test]
    fn test_minimal_skips_broken_module() {
        let dir = TempDir::new().unwrap();
        write_pom(
            dir.path(),
            r#"<project>
  <groupId>org.example</groupId>
  <artifactId>root</artifactId>
  <version>1.0</version>
  <modules>
    <module>missing</module>
  </modules>
</project>"#,
        );
        let builder = PomModelBuilder::new();
        let reactor = builder
            .build_reactor(
                &ModelBuildRequest::new(dir.path().join("pom.xml"))
                    .with_validation(ValidationLevel::Minimal),
            )
            .unwrap();
        assert_eq!(reactor.len(), 1);
    }
}

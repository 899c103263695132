use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::host::{
    BuildSession, DependencyEdge, HostPlugin, HostProject, HostTask, ProjectId, TestFramework,
};
use crate::mapping::MappingTables;
use crate::model::ProjectModel;
use crate::reactor::ReactorIndex;
use crate::translate::ModelTranslator;

const COMPILER_PLUGIN_KEY: &str = "org.apache.maven.plugins:maven-compiler-plugin";
const SOURCE_PLUGIN_KEY: &str = "org.apache.maven.plugins:maven-source-plugin";
const TESTNG_GROUP: &str = "org.testng";
const TESTNG_ARTIFACT: &str = "testng";

/// Drives the full projection of source models onto host projects.
///
/// Per project, in order: identity, packaging plugin, draining references
/// other projects parked here (only once the java extension exists), known
/// plugin metadata, repositories, dependency translation, test framework.
pub struct MetadataBridge<'a> {
    tables: &'a MappingTables,
    reactor: &'a ReactorIndex,
}

impl<'a> MetadataBridge<'a> {
    pub fn new(tables: &'a MappingTables, reactor: &'a ReactorIndex) -> Self {
        Self { tables, reactor }
    }

    /// Create one bare host project per reactor module, in discovery order.
    /// Projects start unevaluated; `configure_all` or the host's own
    /// processing order evaluates them later.
    pub fn prepare_session(&self, rebuild_dependencies: bool) -> BuildSession {
        let mut session = BuildSession::new().with_rebuild_dependencies(rebuild_dependencies);
        for module in self.reactor.modules() {
            session.add_project(HostProject::new(
                module.coordinate.artifact_id.clone(),
                module.basedir.clone(),
            ));
        }
        session
    }

    /// Configure every project in reactor discovery order.
    pub fn configure_all(&self, session: &mut BuildSession) -> Result<()> {
        for model in self.reactor.modules() {
            let id = session.find_by_dir(&model.basedir).ok_or_else(|| {
                Error::UnresolvedProjectReference {
                    module: model.coordinate.to_string(),
                    basedir: model.basedir.clone(),
                }
            })?;
            self.configure_project(session, id, model)?;
        }
        Ok(())
    }

    /// Project one source model onto its host project.
    pub fn configure_project(
        &self,
        session: &mut BuildSession,
        project: ProjectId,
        model: &ProjectModel,
    ) -> Result<()> {
        info!(project = %model.coordinate, packaging = %model.packaging, "configuring host project");
        let translator = ModelTranslator::new(&self.tables.scopes, self.reactor);

        self.configure_identity(session.project_mut(project), model);
        self.apply_packaging_plugin(session.project_mut(project), model);

        // References other projects parked here resolve only once this
        // project's own configuration exists; a project that never gets a
        // java extension keeps them parked, since it has no test output.
        if session.project(project).is_evaluated() {
            let drained = translator.drain_deferred(session, project)?;
            if drained > 0 {
                debug!(project = %model.coordinate, drained, "resolved deferred references");
            }
        }

        self.apply_known_plugin_metadata(session.project_mut(project), model);
        self.add_repositories(session.project_mut(project), model);
        translator.translate(session, project, model)?;
        self.configure_test_framework(session.project_mut(project));
        Ok(())
    }

    fn configure_identity(&self, project: &mut HostProject, model: &ProjectModel) {
        project.group = Some(model.coordinate.group_id.clone());
        project.version = Some(model.coordinate.version.clone());
        project.status = Some(
            if model.coordinate.is_snapshot() {
                "integration"
            } else {
                "release"
            }
            .to_string(),
        );
    }

    fn apply_packaging_plugin(&self, project: &mut HostProject, model: &ProjectModel) {
        let Some(plugin_id) = self.tables.packagings.plugin_for(&model.packaging) else {
            // Aggregator projects have nothing to build themselves.
            if model.packaging == "pom" {
                debug!(project = %model.coordinate, "aggregator packaging, no plugin applied");
            } else {
                warn!(
                    project = %model.coordinate,
                    packaging = %model.packaging,
                    "no host plugin mapped for packaging, project left unconfigured"
                );
            }
            return;
        };
        let Some(plugin) = HostPlugin::from_id(plugin_id) else {
            warn!(plugin = plugin_id, "packaging table names an unknown host plugin");
            return;
        };
        plugin.apply(project);
    }

    /// Pull metadata out of plugin declarations the bridge understands
    /// natively: the compiler plugin's language level and the source
    /// plugin's sources jar.
    fn apply_known_plugin_metadata(&self, project: &mut HostProject, model: &ProjectModel) {
        let Some(java) = project.java.as_mut() else {
            return;
        };
        if let Some(compiler) = model.plugin(COMPILER_PLUGIN_KEY) {
            if let Some(source) = compiler.configuration_value("source") {
                java.source_compatibility = Some(source.to_string());
            }
            if let Some(target) = compiler.configuration_value("target") {
                java.target_compatibility = Some(target.to_string());
            }
        }
        if model.plugin(SOURCE_PLUGIN_KEY).is_some() {
            project.register_task(HostTask {
                name: "sourcesJar".to_string(),
                task_type: "jar".to_string(),
                description: Some(
                    "Assembles a jar archive containing the main source.".to_string(),
                ),
            });
        }
    }

    fn add_repositories(&self, project: &mut HostProject, model: &ProjectModel) {
        for repository in &model.repositories {
            debug!(id = %repository.id, url = %repository.url, "adding repository");
            project.repositories.push(repository.clone());
        }
    }

    /// Switch the test tasks to TestNG when an external testng artifact
    /// landed on a test configuration. Only the translated test-classpath
    /// edges count; a compile-scope testng dependency does not change how
    /// tests run.
    fn configure_test_framework(&self, project: &mut HostProject) {
        let uses_testng = ["testCompile", "testRuntime"].into_iter().any(|configuration| {
            project
                .graph
                .edges(configuration)
                .unwrap_or_default()
                .iter()
                .any(is_testng_edge)
        });
        if !uses_testng {
            return;
        }
        if let Some(java) = project.java.as_mut() {
            debug!(project = %project.name, "switching test framework to TestNG");
            java.test_framework = TestFramework::TestNg;
        }
    }
}

fn is_testng_edge(edge: &DependencyEdge) -> bool {
    matches!(
        edge,
        DependencyEdge::ExternalModule { coordinate, .. }
            if coordinate.group_id == TESTNG_GROUP && coordinate.artifact_id == TESTNG_ARTIFACT
    )
}

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::host::{
    BuildSession, DeferredReference, DependencyEdge, ProjectId, ProjectOutput,
    is_test_configuration,
};
use crate::mapping::ScopeConfigurationTable;
use crate::model::{DependencyRecord, DependencyScope, ProjectModel};
use crate::reactor::ReactorIndex;

/// Translates one source project's dependency list into host dependency
/// edges, deciding per record whether it is an external artifact or a
/// reference to a sibling project in the same build.
///
/// Translation mutates only the graph of the project currently being
/// translated, with one exception: draining deferred references adds edges
/// into the original requester's graph.
pub struct ModelTranslator<'a> {
    table: &'a ScopeConfigurationTable,
    reactor: &'a ReactorIndex,
}

impl<'a> ModelTranslator<'a> {
    pub fn new(table: &'a ScopeConfigurationTable, reactor: &'a ReactorIndex) -> Self {
        Self { table, reactor }
    }

    /// Add edges for every dependency of `model` into `project`'s graph.
    ///
    /// A scope with no configuration mapping is skipped with a warning and
    /// the remaining groups continue. A reactor match without a host project
    /// is fatal: continuing would silently drop a module from the build.
    pub fn translate(
        &self,
        session: &mut BuildSession,
        project: ProjectId,
        model: &ProjectModel,
    ) -> Result<()> {
        let rebuild = session.rebuild_dependencies;
        for (scope, records) in group_by_scope(&model.dependencies) {
            let Some(row) = self.table.row_for(scope, &model.packaging) else {
                warn!(
                    scope = scope.as_str(),
                    packaging = %model.packaging,
                    "no configuration mapped for scope, skipping its dependencies"
                );
                continue;
            };
            let configuration = row.configuration.clone();
            if row.lazy {
                session.project_mut(project).materialize_configuration(&configuration);
            }

            for record in records {
                match self.reactor.find(&record.coordinate) {
                    None => {
                        session.project_mut(project).graph.add_edge(
                            &configuration,
                            DependencyEdge::external(
                                record.coordinate.clone(),
                                record.exclusions.clone(),
                            ),
                        )?;
                    }
                    Some(module) => {
                        if !record.exclusions.is_empty() {
                            debug!(
                                dependency = %record.coordinate,
                                "exclusions ignored on project reference"
                            );
                        }
                        let target = session.find_by_dir(&module.basedir).ok_or_else(|| {
                            Error::UnresolvedProjectReference {
                                module: record.coordinate.to_string(),
                                basedir: module.basedir.clone(),
                            }
                        })?;
                        if is_test_configuration(&configuration) {
                            self.reference_test_output(
                                session,
                                project,
                                target,
                                &configuration,
                                rebuild,
                            )?;
                        } else {
                            session.project_mut(project).graph.add_edge(
                                &configuration,
                                DependencyEdge::ProjectReference {
                                    project: target,
                                    output: ProjectOutput::packaged_default(),
                                    rebuild_dependencies: rebuild,
                                },
                            )?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Test-scope references need the target's compiled test output. When
    /// the target has not been evaluated yet that output does not exist, so
    /// the reference is parked on the target instead of resolved now.
    fn reference_test_output(
        &self,
        session: &mut BuildSession,
        requester: ProjectId,
        target: ProjectId,
        configuration: &str,
        rebuild: bool,
    ) -> Result<()> {
        if session.project(target).is_evaluated() {
            session.project_mut(requester).graph.add_edge(
                configuration,
                DependencyEdge::ProjectReference {
                    project: target,
                    output: ProjectOutput::TestClasses,
                    rebuild_dependencies: rebuild,
                },
            )
        } else {
            debug!(
                requester = %session.project(requester).name,
                target = %session.project(target).name,
                configuration,
                "target not evaluated yet, deferring test output reference"
            );
            session.project_mut(target).defer_reference(DeferredReference {
                requester,
                configuration: configuration.to_string(),
            });
            Ok(())
        }
    }

    /// Resolve every reference parked on `target` now that it is evaluated.
    /// Each one becomes an edge in its requester's graph. Returns how many
    /// references were drained.
    pub fn drain_deferred(&self, session: &mut BuildSession, target: ProjectId) -> Result<usize> {
        let rebuild = session.rebuild_dependencies;
        let deferred = session.project_mut(target).take_deferred();
        let drained = deferred.len();
        for reference in deferred {
            debug!(
                requester = %session.project(reference.requester).name,
                target = %session.project(target).name,
                configuration = %reference.configuration,
                "resolving deferred test output reference"
            );
            session.project_mut(reference.requester).graph.add_edge(
                &reference.configuration,
                DependencyEdge::ProjectReference {
                    project: target,
                    output: ProjectOutput::TestClasses,
                    rebuild_dependencies: rebuild,
                },
            )?;
        }
        Ok(drained)
    }
}

/// Group records by scope, keeping scopes in first-seen order and records in
/// declaration order, so translation output is reproducible.
fn group_by_scope(
    records: &[DependencyRecord],
) -> Vec<(&DependencyScope, Vec<&DependencyRecord>)> {
    let mut groups: Vec<(&DependencyScope, Vec<&DependencyRecord>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(scope, _)| *scope == &record.scope) {
            Some((_, group)) => group.push(record),
            None => groups.push((&record.scope, vec![record])),
        }
    }
    groups
}

use tracing::{debug, info};

use crate::error::{Error, Result};

use super::archive::{ClassRef, PluginArchiveLoader};
use super::descriptor::PluginDescriptor;
use super::execution::{
    DEFAULT_CONFIGURATOR, ExecutionSession, MojoExecution, build_configuration,
};

/// Submits single goal executions to the source tool's execution service.
///
/// Every failure along the way, from goal lookup to the goal's own internal
/// error, surfaces as one wrapped error carrying the goal identity. Nothing
/// is retried.
#[derive(Debug, Default)]
pub struct MojoInvocationBridge;

impl MojoInvocationBridge {
    pub fn new() -> Self {
        Self
    }

    /// Run one goal from an already-extracted descriptor, synchronously.
    pub fn invoke(
        &self,
        session: &mut dyn ExecutionSession,
        descriptor: &PluginDescriptor,
        goal: &str,
        execution_id: &str,
    ) -> Result<()> {
        self.invoke_inner(session, descriptor, goal, execution_id)
            .map_err(|e| Error::goal_execution(goal, e))
    }

    fn invoke_inner(
        &self,
        session: &mut dyn ExecutionSession,
        descriptor: &PluginDescriptor,
        goal: &str,
        execution_id: &str,
    ) -> Result<()> {
        let mojo = descriptor.goal(goal)?;
        let realm = descriptor.realm().ok_or_else(|| Error::RealmNotBound {
            plugin: descriptor.coordinate.to_string(),
        })?;
        let execution = MojoExecution {
            plugin: descriptor.coordinate.clone(),
            goal: mojo.goal.clone(),
            execution_id: execution_id.to_string(),
            configuration: build_configuration(mojo),
        };

        info!(
            plugin = %descriptor.coordinate,
            goal = %mojo.goal,
            execution_id,
            "executing goal"
        );
        let component = session.instantiate(&mojo.implementation, realm)?;
        session.add_component(component, mojo.role(), &mojo.role_hint)?;
        let configurator = mojo
            .configurator
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CONFIGURATOR);
        session.lookup_configurator(configurator)?;
        session.execute(&execution)?;
        debug!(goal = %mojo.goal, "goal finished");
        Ok(())
    }
}

/// Capability to run a goal of a packaged plugin, given only the class the
/// plugin resolves to. Implementations own how executions actually happen.
pub trait ExternalGoalRunner {
    fn run(&mut self, class: &ClassRef, goal: &str, execution_id: &str) -> Result<()>;
}

/// Standard pipeline: locate the archive, extract its descriptor, merge
/// parameter defaults, invoke through the execution session.
pub struct MojoRunner<S> {
    loader: PluginArchiveLoader,
    bridge: MojoInvocationBridge,
    session: S,
}

impl<S: ExecutionSession> MojoRunner<S> {
    pub fn new(session: S) -> Self {
        Self {
            loader: PluginArchiveLoader::new(),
            bridge: MojoInvocationBridge::new(),
            session,
        }
    }

    pub fn with_loader(mut self, loader: PluginArchiveLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }
}

impl<S: ExecutionSession> ExternalGoalRunner for MojoRunner<S> {
    fn run(&mut self, class: &ClassRef, goal: &str, execution_id: &str) -> Result<()> {
        let descriptor = self
            .loader
            .load(class)
            .map_err(|e| Error::goal_execution(goal, e))?;
        self.bridge
            .invoke(&mut self.session, &descriptor, goal, execution_id)
    }
}

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{ConfigElement, Coordinate};

use super::descriptor::{MojoSpec, PluginRealm};

/// Configurator used when a goal does not declare one.
pub const DEFAULT_CONFIGURATOR: &str = "basic";

/// Handle to a component registered in the execution container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(pub usize);

/// One goal execution: plugin identity, goal, execution id, and the merged
/// configuration document submitted with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MojoExecution {
    pub plugin: Coordinate,
    pub goal: String,
    pub execution_id: String,
    pub configuration: ConfigElement,
}

/// Build the configuration document for a goal by walking its declared
/// parameters. A parameter contributes an entry when it has an explicit
/// value or a default; the default rides along as metadata so the
/// configurator can fall back to it. Parameters with neither are omitted.
pub fn build_configuration(mojo: &MojoSpec) -> ConfigElement {
    let mut configuration = ConfigElement::new("configuration");
    for parameter in &mojo.parameters {
        if parameter.expression.is_none() && parameter.default_value.is_none() {
            continue;
        }
        let mut element = ConfigElement::new(parameter.name.clone());
        element.value = parameter.expression.clone();
        if let Some(default) = &parameter.default_value {
            element.set_attribute("default-value", default.clone());
        }
        configuration.add_child(element);
    }
    configuration
}

/// The source tool's execution container, supplied by the caller and used
/// opaquely: the bridge registers the goal implementation, resolves a
/// configurator, and submits exactly one execution.
pub trait ExecutionSession {
    /// Instantiate the goal implementation via its default constructor,
    /// inside the given realm.
    fn instantiate(&mut self, implementation: &str, realm: &PluginRealm) -> Result<ComponentId>;

    /// Register the instantiated component under a role and role hint.
    fn add_component(&mut self, component: ComponentId, role: &str, role_hint: &str)
    -> Result<()>;

    /// Resolve the named parameter configurator, failing if absent.
    fn lookup_configurator(&mut self, name: &str) -> Result<()>;

    /// Run the goal to completion. Synchronous and blocking.
    fn execute(&mut self, execution: &MojoExecution) -> Result<()>;
}

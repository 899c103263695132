pub mod archive;
pub mod bridge;
pub mod descriptor;
pub mod execution;

pub use archive::{ClassRef, DESCRIPTOR_ENTRY, PluginArchiveLoader};
pub use bridge::{ExternalGoalRunner, MojoInvocationBridge, MojoRunner};
pub use descriptor::{MOJO_ROLE, MojoSpec, ParameterSpec, PluginDescriptor, PluginRealm};
pub use execution::{
    ComponentId, DEFAULT_CONFIGURATOR, ExecutionSession, MojoExecution, build_configuration,
};

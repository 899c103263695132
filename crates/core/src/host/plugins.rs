use tracing::debug;

use super::{HostProject, HostTask, JavaExtension};

/// Configurations every JVM project starts with. "default" and "archives"
/// carry the published artifact; the rest are classpath buckets.
const JAVA_CONFIGURATIONS: [&str; 6] = [
    "default",
    "archives",
    "compile",
    "runtime",
    "testCompile",
    "testRuntime",
];

/// Host plugins that can be applied to a project based on its packaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlugin {
    Java,
    War,
}

impl HostPlugin {
    /// Resolve a plugin id from the packaging table.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "java" => Some(HostPlugin::Java),
            "war" => Some(HostPlugin::War),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            HostPlugin::Java => "java",
            HostPlugin::War => "war",
        }
    }

    /// Apply this plugin to a project. Reapplication is a no-op, and the web
    /// archive plugin implies the base JVM plugin.
    pub fn apply(&self, project: &mut HostProject) {
        match self {
            HostPlugin::Java => {
                if project.is_evaluated() {
                    return;
                }
                debug!(project = %project.name, "applying java plugin");
                for name in JAVA_CONFIGURATIONS {
                    project.graph.create(name);
                }
                project.java = Some(JavaExtension::standard());
                project.register_task(HostTask {
                    name: "jar".to_string(),
                    task_type: "jar".to_string(),
                    description: None,
                });
            }
            HostPlugin::War => {
                HostPlugin::Java.apply(project);
                if project.graph.contains("providedCompile") {
                    return;
                }
                debug!(project = %project.name, "applying war plugin");
                project.graph.create("providedCompile");
                project.graph.create("providedRuntime");
                if let Some(java) = &mut project.java {
                    java.add_to_compile_classpaths("providedCompile");
                    java.add_to_runtime_classpaths("providedCompile");
                    java.add_to_runtime_classpaths("providedRuntime");
                }
                project.register_task(HostTask {
                    name: "war".to_string(),
                    task_type: "war".to_string(),
                    description: None,
                });
            }
        }
    }
}

//! Execution sessions backing the run-goal command.
//!
//! Goal implementations are JVM classes, so real execution crosses a
//! subprocess boundary: a launcher program owns the container and this side
//! only feeds it the registration protocol plus the merged configuration.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use m2bridge_core::mojo::{ComponentId, ExecutionSession, MojoExecution, PluginRealm};
use m2bridge_core::{Error, Result};

struct Registration {
    implementation: String,
    archive: PathBuf,
    role_hint: Option<String>,
}

/// Runs each execution through an external launcher process.
pub struct SubprocessSession {
    launcher: PathBuf,
    registered: Vec<Registration>,
    configurator: Option<String>,
}

impl SubprocessSession {
    pub fn new(launcher: impl Into<PathBuf>) -> Self {
        Self {
            launcher: launcher.into(),
            registered: Vec::new(),
            configurator: None,
        }
    }
}

impl ExecutionSession for SubprocessSession {
    fn instantiate(&mut self, implementation: &str, realm: &PluginRealm) -> Result<ComponentId> {
        self.registered.push(Registration {
            implementation: implementation.to_string(),
            archive: realm.archive.clone(),
            role_hint: None,
        });
        Ok(ComponentId(self.registered.len() - 1))
    }

    fn add_component(
        &mut self,
        component: ComponentId,
        _role: &str,
        role_hint: &str,
    ) -> Result<()> {
        let registration = self
            .registered
            .get_mut(component.0)
            .ok_or_else(|| Error::ContainerError(format!("unknown component {}", component.0)))?;
        registration.role_hint = Some(role_hint.to_string());
        Ok(())
    }

    fn lookup_configurator(&mut self, name: &str) -> Result<()> {
        self.configurator = Some(name.to_string());
        Ok(())
    }

    fn execute(&mut self, execution: &MojoExecution) -> Result<()> {
        let registration = self
            .registered
            .last()
            .ok_or_else(|| Error::ContainerError("no component registered".to_string()))?;

        let mut command = Command::new(&self.launcher);
        command
            .arg("--archive")
            .arg(&registration.archive)
            .arg("--implementation")
            .arg(&registration.implementation)
            .arg("--goal")
            .arg(&execution.goal)
            .arg("--execution-id")
            .arg(&execution.execution_id);
        if let Some(role_hint) = &registration.role_hint {
            command.arg("--role-hint").arg(role_hint);
        }
        if let Some(configurator) = &self.configurator {
            command.arg("--configurator").arg(configurator);
        }
        command
            .arg("--configuration")
            .arg(execution.configuration.to_string());

        debug!(launcher = %self.launcher.display(), goal = %execution.goal, "spawning launcher");
        let status = command
            .status()
            .map_err(|e| Error::ContainerError(format!("failed to spawn launcher: {e}")))?;
        if !status.success() {
            return Err(Error::ContainerError(format!(
                "launcher exited with {status}"
            )));
        }
        Ok(())
    }
}

/// Records the registration protocol instead of executing anything.
#[derive(Debug, Default)]
pub struct DryRunSession {
    pub calls: Vec<String>,
    pub execution: Option<MojoExecution>,
}

impl ExecutionSession for DryRunSession {
    fn instantiate(&mut self, implementation: &str, realm: &PluginRealm) -> Result<ComponentId> {
        self.calls.push(format!(
            "instantiate {} (realm {}, archive {})",
            implementation,
            realm.id,
            realm.archive.display()
        ));
        Ok(ComponentId(self.calls.len() - 1))
    }

    fn add_component(&mut self, _component: ComponentId, role: &str, role_hint: &str) -> Result<()> {
        self.calls.push(format!("register {role} / {role_hint}"));
        Ok(())
    }

    fn lookup_configurator(&mut self, name: &str) -> Result<()> {
        self.calls.push(format!("configurator {name}"));
        Ok(())
    }

    fn execute(&mut self, execution: &MojoExecution) -> Result<()> {
        self.calls.push(format!(
            "execute {}:{} ({})",
            execution.plugin, execution.goal, execution.execution_id
        ));
        self.execution = Some(execution.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use m2bridge_core::ConfigElement;
    use m2bridge_core::model::Coordinate;

    fn execution() -> MojoExecution {
        MojoExecution {
            plugin: Coordinate::new("org.example.plugins", "example-plugin", "1.2").unwrap(),
            goal: "run".to_string(),
            execution_id: "default-cli".to_string(),
            configuration: ConfigElement::new("configuration"),
        }
    }

    #[test]
    fn test_dry_run_records_protocol_in_order() {
        let mut session = DryRunSession::default();
        let realm = PluginRealm::new("/repo/example-plugin-1.2.jar");
        let component = session.instantiate("org.example.RunMojo", &realm).unwrap();
        session
            .add_component(component, "org.apache.maven.plugin.Mojo", "example:run")
            .unwrap();
        session.lookup_configurator("basic").unwrap();
        session.execute(&execution()).unwrap();

        assert_eq!(session.calls.len(), 4);
        assert!(session.calls[0].starts_with("instantiate org.example.RunMojo"));
        assert!(session.calls[3].contains("default-cli"));
        assert!(session.execution.is_some());
    }

    #[test]
    fn test_subprocess_execute_without_registration_fails() {
        let mut session = SubprocessSession::new("/usr/bin/true");
        let result = session.execute(&execution());
        assert!(matches!(result, Err(Error::ContainerError(_))));
    }

    #[test]
    fn test_subprocess_rejects_unknown_component() {
        let mut session = SubprocessSession::new("/usr/bin/true");
        let result = session.add_component(ComponentId(3), "role", "hint");
        assert!(matches!(result, Err(Error::ContainerError(_))));
    }
}

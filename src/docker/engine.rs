use std::time::Duration;

use crate::error::{DockerError, EngineError};

use super::run::{execute, execute_checked};
use super::types::{ContainerState, DockerCommand, RunSpec};

/// Lifecycle operations the deployer needs from a container engine.
///
/// Implementations are used strictly sequentially from one thread.
pub trait Engine {
    /// `Ok(None)` when no container with that name exists.
    fn inspect_container(&self, name: &str) -> Result<Option<ContainerState>, DockerError>;
    fn stop_container(&self, name: &str) -> Result<(), DockerError>;
    fn remove_container(&self, name: &str) -> Result<(), DockerError>;
    fn volume_exists(&self, name: &str) -> Result<bool, DockerError>;
    fn create_volume(&self, name: &str) -> Result<(), DockerError>;
    fn image_exists(&self, image: &str) -> Result<bool, DockerError>;
    fn pull_image(&self, image: &str) -> Result<(), DockerError>;
    /// Start a detached instance and return its id.
    fn run_detached(&self, spec: &RunSpec) -> Result<String, DockerError>;
    /// Everything the instance has logged so far, stdout then stderr.
    fn logs(&self, name: &str) -> Result<String, DockerError>;
}

/// [`Engine`] backed by the `docker` CLI.
#[derive(Debug, Clone)]
pub struct DockerCli {
    timeout: Duration,
}

impl DockerCli {
    /// Verify the daemon is reachable and return a handle for the rest of the
    /// run.
    pub fn connect(timeout: Duration) -> Result<Self, EngineError> {
        let cli = Self { timeout };
        cli.ping()?;
        Ok(cli)
    }

    pub fn ping(&self) -> Result<(), EngineError> {
        let output = execute_checked(&self.cmd(["version", "--format", "{{.Server.Version}}"]))
            .map_err(EngineError::Unavailable)?;
        tracing::debug!(server = output.stdout.trim(), "docker daemon reachable");
        Ok(())
    }

    fn cmd<I, S>(&self, args: I) -> DockerCommand
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DockerCommand::new(args, self.timeout)
    }

    /// Run an `inspect`-style command where a non-zero exit means "absent".
    fn exists(&self, args: &[&str]) -> Result<bool, DockerError> {
        let cmd = self.cmd(args.iter().copied());
        let output = execute(&cmd)?;
        if output.success() {
            return Ok(true);
        }
        if is_not_found(&output.stderr) {
            return Ok(false);
        }
        Err(DockerError::Failed {
            command: cmd.label(),
            code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}

impl Engine for DockerCli {
    fn inspect_container(&self, name: &str) -> Result<Option<ContainerState>, DockerError> {
        let cmd = self.cmd(["container", "inspect", "--format", "{{json .State}}", name]);
        let output = execute(&cmd)?;
        if !output.success() {
            if is_not_found(&output.stderr) {
                return Ok(None);
            }
            return Err(DockerError::Failed {
                command: cmd.label(),
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        let state = serde_json::from_str(output.stdout.trim()).map_err(|e| DockerError::Output {
            command: cmd.label(),
            reason: e.to_string(),
        })?;
        Ok(Some(state))
    }

    fn stop_container(&self, name: &str) -> Result<(), DockerError> {
        execute_checked(&self.cmd(["stop", name]))?;
        Ok(())
    }

    fn remove_container(&self, name: &str) -> Result<(), DockerError> {
        execute_checked(&self.cmd(["rm", name]))?;
        Ok(())
    }

    fn volume_exists(&self, name: &str) -> Result<bool, DockerError> {
        self.exists(&["volume", "inspect", name])
    }

    fn create_volume(&self, name: &str) -> Result<(), DockerError> {
        execute_checked(&self.cmd(["volume", "create", name]))?;
        Ok(())
    }

    fn image_exists(&self, image: &str) -> Result<bool, DockerError> {
        self.exists(&["image", "inspect", image])
    }

    fn pull_image(&self, image: &str) -> Result<(), DockerError> {
        execute_checked(&self.cmd(["pull", "--quiet", image]))?;
        Ok(())
    }

    fn run_detached(&self, spec: &RunSpec) -> Result<String, DockerError> {
        let cmd = self.cmd(spec.to_args());
        let output = execute_checked(&cmd)?;
        let id = output.stdout.trim();
        if id.is_empty() {
            return Err(DockerError::Output {
                command: cmd.label(),
                reason: "no container id printed".into(),
            });
        }
        Ok(id.to_string())
    }

    fn logs(&self, name: &str) -> Result<String, DockerError> {
        let output = execute_checked(&self.cmd(["logs", name]))?;
        let mut log = output.stdout;
        log.push_str(&output.stderr);
        Ok(log)
    }
}

fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no such") || lower.contains("not found")
}

/// Returns `["--user", "uid:gid"]` on Unix so the instance writes bind-mounted
/// files as the invoking user. Empty on other platforms.
pub fn user_args() -> Vec<String> {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() and getegid() are simple POSIX getters that always succeed and have no side effects.
        let uid = unsafe { libc::geteuid() };
        let gid = unsafe { libc::getegid() };
        vec!["--user".into(), format!("{uid}:{gid}")]
    }

    #[cfg(not(unix))]
    {
        Vec::new()
    }
}

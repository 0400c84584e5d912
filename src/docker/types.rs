use std::time::Duration;

use serde::Deserialize;

/// Describes one `docker` CLI invocation. `args` is the full argument list
/// after the `docker` program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerCommand {
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl DockerCommand {
    pub fn new<I, S>(args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    /// Short label for diagnostics, e.g. `container inspect`.
    pub fn label(&self) -> String {
        self.args
            .iter()
            .take_while(|a| !a.starts_with('-'))
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// `.State` of `docker container inspect`, reduced to what the lifecycle
/// manager needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContainerState {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Running")]
    pub running: bool,
}

/// A host directory or named volume mounted into the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bind {
    pub source: String,
    pub target: String,
}

impl Bind {
    pub fn rw(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn to_arg(&self) -> String {
        format!("{}:{}:rw", self.source, self.target)
    }
}

/// Everything needed to start one detached instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub name: String,
    pub image: String,
    pub host_port: u16,
    pub container_port: u16,
    pub binds: Vec<Bind>,
    pub restart_policy: String,
    pub extra_args: Vec<String>,
}

impl RunSpec {
    /// Arguments for `docker run`, image last.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--detach".to_string(),
            "--name".to_string(),
            self.name.clone(),
            "--publish".to_string(),
            format!("{}:{}/tcp", self.host_port, self.container_port),
        ];
        for bind in &self.binds {
            args.push("--volume".to_string());
            args.push(bind.to_arg());
        }
        if !self.restart_policy.is_empty() {
            args.push("--restart".to_string());
            args.push(self.restart_policy.clone());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push(self.image.clone());
        args
    }
}

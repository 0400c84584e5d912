use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to run a single `docker` CLI invocation.
#[derive(Debug, Error)]
pub enum DockerError {
    #[error("failed to invoke `docker`: is it installed and on PATH?")]
    Spawn(#[source] std::io::Error),
    #[error("`docker {command}` timed out after {}s", .timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },
    #[error("`docker {command}` exited with {code:?}: {stderr}")]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("unexpected output from `docker {command}`: {reason}")]
    Output { command: String, reason: String },
}

/// The engine could not be reached. Fatal for the whole run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("container engine is not available")]
    Unavailable(#[source] DockerError),
}

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("failed to resolve workspace root {path}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("failed to stop stale instance {name}")]
    Stop {
        name: String,
        #[source]
        source: DockerError,
    },
    #[error("failed to remove stale instance {name}")]
    Remove {
        name: String,
        #[source]
        source: DockerError,
    },
    #[error("failed to prepare volume {name}")]
    Volume {
        name: String,
        #[source]
        source: DockerError,
    },
    #[error("image {image} is not available")]
    Image {
        image: String,
        #[source]
        source: DockerError,
    },
    #[error("image {image} is not present locally and pulling is disabled")]
    ImageMissing { image: String },
    #[error("invalid extra run arguments: {0}")]
    RunArgs(String),
    #[error("failed to start instance {name}")]
    Start {
        name: String,
        #[source]
        source: DockerError,
    },
    #[error("failed to read logs of {name}")]
    Logs {
        name: String,
        #[source]
        source: DockerError,
    },
}

//! Docker engine access through the CLI: connectivity, bounded command execution, lifecycle primitives.

pub mod engine;
pub mod run;
pub mod types;

pub use engine::{DockerCli, Engine, user_args};
pub use types::{Bind, CommandOutput, ContainerState, DockerCommand, RunSpec};

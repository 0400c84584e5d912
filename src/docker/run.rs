use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::DockerError;

use super::types::{CommandOutput, DockerCommand};

pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run a `docker` command to completion and capture its output.
///
/// The child is killed once `cmd.timeout` elapses. A non-zero exit is not an
/// error here; see [`execute_checked`].
pub fn execute(cmd: &DockerCommand) -> Result<CommandOutput, DockerError> {
    let mut child = Command::new("docker")
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(DockerError::Spawn)?;

    // Both pipes were requested above.
    let mut stdout = child.stdout.take().ok_or_else(|| missing_pipe(cmd))?;
    let mut stderr = child.stderr.take().ok_or_else(|| missing_pipe(cmd))?;

    // Drain on separate threads so a chatty child never blocks on a full pipe.
    let stdout_handle = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stdout.read_to_end(&mut buf);
        buf
    });
    let stderr_handle = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf);
        buf
    });

    let start = Instant::now();
    let exit_status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(_) => break None,
        }

        if start.elapsed() > cmd.timeout {
            let _ = child.kill();
            let _ = child.wait();
            let _ = stdout_handle.join();
            let _ = stderr_handle.join();
            return Err(DockerError::TimedOut {
                command: cmd.label(),
                timeout: cmd.timeout,
            });
        }

        std::thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();

    Ok(CommandOutput {
        exit_code: exit_status.and_then(|s| s.code()),
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

/// Like [`execute`], but a non-zero exit becomes [`DockerError::Failed`].
pub fn execute_checked(cmd: &DockerCommand) -> Result<CommandOutput, DockerError> {
    let output = execute(cmd)?;
    if !output.success() {
        return Err(DockerError::Failed {
            command: cmd.label(),
            code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(output)
}

fn missing_pipe(cmd: &DockerCommand) -> DockerError {
    DockerError::Output {
        command: cmd.label(),
        reason: "child process pipe unavailable".into(),
    }
}

//! Subprocess runner — spawns a command with timeout-kill and captures output.
//!
//! `CommandRunner` is the seam between the executor and the operating system.
//! `TokioCommandRunner` is the production implementation; tests substitute a
//! scripted runner so the executor never has to touch a real `torero`.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ToreroError;

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Render a program and its args the way a shell user would type them.
pub fn display_command(program: &str, args: &[&str]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Read a child pipe to EOF. A missing pipe reads as empty.
async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Combine the wait status and both pipe reads. Any I/O failure is an
/// `Execution` error so it is never mistaken for malformed output.
fn collect_output(
    command: &str,
    status: std::io::Result<ExitStatus>,
    stdout: std::io::Result<Vec<u8>>,
    stderr: std::io::Result<Vec<u8>>,
) -> crate::Result<CommandOutput> {
    let io_error = |what: &str, e: std::io::Error| ToreroError::Execution {
        command: command.to_string(),
        message: format!("failed to execute torero command: {}: {}", what, e),
        exit_code: None,
    };
    let status = status.map_err(|e| io_error("process wait error", e))?;
    let stdout = stdout.map_err(|e| io_error("stdout read error", e))?;
    let stderr = stderr.map_err(|e| io_error("stderr read error", e))?;
    Ok(CommandOutput {
        exit_code: status.code(),
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

/// Abstracts process execution so the executor can be tested without torero.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Resolve `program` through the search path. Never spawns anything.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run `program` with `args`, waiting at most `timeout`.
    ///
    /// Returns `ToreroError::Timeout` if the deadline passes (the child is
    /// killed first) and `ToreroError::Execution` if the process could not be
    /// spawned or its pipes failed. A non-zero exit is NOT an error here; it
    /// is reported through `CommandOutput::exit_code`.
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> crate::Result<CommandOutput>;
}

/// Production `CommandRunner` backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    async fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> crate::Result<CommandOutput> {
        let start = Instant::now();
        let command = display_command(program, args);

        // Never a shell: structured args only. kill_on_drop reaps the child
        // if the caller's future is dropped mid-flight (client went away).
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToreroError::Execution {
                command: command.clone(),
                message: format!("failed to execute torero command: {}", e),
                exit_code: None,
            })?;

        let mut stdout_pipe = child.stdout.take();
        let mut stderr_pipe = child.stderr.take();

        // Drain both pipes while waiting so a chatty child can't block on a
        // full pipe buffer. wait() borrows child, leaving kill() available.
        let output = tokio::select! {
            (status, stdout, stderr) = async {
                tokio::join!(
                    child.wait(),
                    drain(stdout_pipe.as_mut()),
                    drain(stderr_pipe.as_mut()),
                )
            } => collect_output(&command, status, stdout, stderr)?,
            _ = tokio::time::sleep(timeout) => {
                // Kill the process, not just the future.
                let _ = child.kill().await;
                tracing::error!(
                    command = %command,
                    timeout_secs = timeout.as_secs(),
                    "torero command timed out"
                );
                return Err(ToreroError::Timeout {
                    command,
                    timeout_secs: timeout.as_secs(),
                });
            }
        };

        tracing::info!(
            command = %command,
            exit_code = ?output.exit_code,
            duration_ms = %start.elapsed().as_millis(),
            "torero invocation"
        );

        if !output.stderr.is_empty() {
            tracing::debug!(command = %command, stderr = %output.stderr, "torero stderr");
        }

        Ok(output)
    }
}

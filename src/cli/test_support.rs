//! Scripted `CommandRunner` for executor and router tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::cli::runner::{display_command, CommandOutput, CommandRunner};
use crate::error::ToreroError;

#[derive(Clone)]
enum Scripted {
    Output(CommandOutput),
    Timeout,
    SpawnError(String),
}

/// Answers `run` calls from a table keyed by the joined argument list
/// (e.g. `"get services --raw"`) and records every call it sees.
pub(crate) struct FakeRunner {
    installed: bool,
    responses: HashMap<String, Scripted>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    /// A runner whose torero is on PATH.
    pub(crate) fn new() -> Self {
        Self {
            installed: true,
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A runner whose torero cannot be located.
    pub(crate) fn missing() -> Self {
        Self {
            installed: false,
            ..Self::new()
        }
    }

    pub(crate) fn respond(mut self, args: &str, stdout: &str, stderr: &str, code: i32) -> Self {
        self.responses.insert(
            args.to_string(),
            Scripted::Output(CommandOutput {
                exit_code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            }),
        );
        self
    }

    pub(crate) fn ok(self, args: &str, stdout: &str) -> Self {
        self.respond(args, stdout, "", 0)
    }

    pub(crate) fn fail(self, args: &str, stderr: &str, code: i32) -> Self {
        self.respond(args, "", stderr, code)
    }

    pub(crate) fn timeout(mut self, args: &str) -> Self {
        self.responses.insert(args.to_string(), Scripted::Timeout);
        self
    }

    pub(crate) fn spawn_error(mut self, args: &str, reason: &str) -> Self {
        self.responses
            .insert(args.to_string(), Scripted::SpawnError(reason.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.installed
            .then(|| PathBuf::from("/usr/local/bin").join(program))
    }

    async fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> crate::Result<CommandOutput> {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());
        let command = display_command(program, args);

        match self.responses.get(&key).cloned() {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::Timeout) => Err(ToreroError::Timeout {
                command,
                timeout_secs: timeout.as_secs(),
            }),
            Some(Scripted::SpawnError(reason)) => Err(ToreroError::Execution {
                command,
                message: format!("failed to execute torero command: {}", reason),
                exit_code: None,
            }),
            None => Err(ToreroError::Execution {
                command,
                message: format!("no scripted response for '{}'", key),
                exit_code: None,
            }),
        }
    }
}

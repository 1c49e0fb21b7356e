//! torero executor — runs torero subcommands and translates their output.
//!
//! Every data call has the same shape: `torero get <kind> --raw`, wait up to
//! the fetch timeout, decode stdout as a JSON array, deserialize each element
//! into the kind's record type. `ToreroExecutor::get_resources` implements
//! that once, generic over `Resource`; the per-kind methods are thin wrappers.
//!
//! `torero version` backs both the availability check and the version query.
//! `probe` answers both from a single invocation.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::cli::runner::{display_command, CommandOutput, CommandRunner, TokioCommandRunner};
use crate::config::ToreroConfig;
use crate::error::ToreroError;
use crate::models::{Decorator, Repository, Resource, Secret, Service};

/// Name torero prints at the start of its version line.
pub const TOOL_NAME: &str = "torero";

/// Returned by `version` whenever the real version cannot be determined.
pub const UNKNOWN_VERSION: &str = "unknown";

/// How much raw stdout to keep in the debug log when decoding fails.
const RAW_OUTPUT_LOG_LIMIT: usize = 1000;

/// Outcome of the availability check. Not an error: an unavailable torero is
/// a status to report, not a reason to fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub available: bool,
    pub message: String,
}

/// Availability and version from one `torero version` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToreroStatus {
    pub available: bool,
    pub message: String,
    pub version: String,
}

impl ToreroStatus {
    fn unavailable(message: impl Into<String>) -> Self {
        Self {
            available: false,
            message: message.into(),
            version: UNKNOWN_VERSION.to_string(),
        }
    }
}

impl From<ToreroStatus> for Availability {
    fn from(status: ToreroStatus) -> Self {
        Self {
            available: status.available,
            message: status.message,
        }
    }
}

/// Extract the version from `torero version` output.
///
/// Looks for the first line (ignoring surrounding whitespace) starting with
/// `torero` that has at least three whitespace-separated tokens
/// (`torero version 1.3.1`) and returns the third.
pub fn parse_version(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(TOOL_NAME))
        .find_map(|line| line.split_whitespace().nth(2))
        .map(str::to_string)
}

/// Truncate to at most `limit` characters, respecting char boundaries.
fn truncate_chars(raw: &str, limit: usize) -> &str {
    match raw.char_indices().nth(limit) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

/// Decode torero `--raw` output into records of kind `T`.
///
/// Invalid JSON is a `Parse` error; valid JSON that is not an array of
/// conforming objects is a `Validation` error. Order is preserved.
pub fn decode_records<T: Resource>(raw: &str) -> crate::Result<Vec<T>> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        tracing::error!(kind = %T::KIND, error = %e, "invalid JSON from torero");
        tracing::debug!(
            kind = %T::KIND,
            raw_output = %truncate_chars(raw, RAW_OUTPUT_LOG_LIMIT),
            "raw torero output"
        );
        ToreroError::Parse(e.to_string())
    })?;

    let records: Vec<T> = serde_json::from_value(value).map_err(|e| {
        tracing::error!(kind = %T::KIND, error = %e, "torero output failed validation");
        ToreroError::Validation {
            kind: T::KIND,
            message: e.to_string(),
        }
    })?;

    tracing::debug!(
        kind = %T::KIND,
        count = records.len(),
        "retrieved records from torero"
    );
    Ok(records)
}

/// Runs torero subcommands and translates their output into records.
///
/// Holds no state beyond its configuration and runner; every call is an
/// independent subprocess invocation. Cheap to clone.
#[derive(Clone)]
pub struct ToreroExecutor {
    binary: String,
    probe_timeout: Duration,
    fetch_timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl ToreroExecutor {
    /// Executor backed by real subprocesses.
    pub fn new(config: &ToreroConfig) -> Self {
        Self::with_runner(config, Arc::new(TokioCommandRunner))
    }

    pub fn with_runner(config: &ToreroConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary: config.binary.clone(),
            probe_timeout: config.probe_timeout(),
            fetch_timeout: config.fetch_timeout(),
            runner,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    async fn run_version(&self) -> crate::Result<CommandOutput> {
        self.runner
            .run(&self.binary, &["version"], self.probe_timeout)
            .await
    }

    /// Resolve torero on PATH and run `torero version` once, reporting both
    /// availability and version.
    ///
    /// When the executable is not on PATH no subprocess is spawned.
    pub async fn probe(&self) -> ToreroStatus {
        if self.runner.locate(&self.binary).is_none() {
            tracing::warn!(binary = %self.binary, "torero executable not found in PATH");
            return ToreroStatus::unavailable("torero executable not found in PATH");
        }

        match self.run_version().await {
            Ok(output) if output.success() => ToreroStatus {
                available: true,
                message: "torero is available".to_string(),
                version: parse_version(&output.stdout)
                    .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            },
            Ok(output) => {
                tracing::warn!(
                    exit_code = ?output.exit_code,
                    stderr = %output.stderr.trim(),
                    "torero version check failed"
                );
                ToreroStatus::unavailable(format!(
                    "torero command failed: {}",
                    output.stderr.trim()
                ))
            }
            Err(ToreroError::Timeout { .. }) => {
                ToreroStatus::unavailable("torero command timed out")
            }
            Err(e) => {
                tracing::warn!(error = %e, "torero version check errored");
                ToreroStatus::unavailable(format!("Error checking torero: {}", e))
            }
        }
    }

    /// Whether torero is on PATH and answers `torero version`.
    pub async fn check_available(&self) -> Availability {
        self.probe().await.into()
    }

    /// The installed torero version, or `"unknown"`. Never fails.
    pub async fn version(&self) -> String {
        match self.run_version().await {
            Ok(output) if output.success() => parse_version(&output.stdout)
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            Ok(_) | Err(_) => UNKNOWN_VERSION.to_string(),
        }
    }

    /// Run `torero get <plural> --raw` and decode every record of kind `T`.
    pub async fn get_resources<T: Resource>(&self) -> crate::Result<Vec<T>> {
        let args = ["get", T::KIND.plural(), "--raw"];
        let command = display_command(&self.binary, &args);
        tracing::debug!(command = %command, "executing torero command");

        let output = self
            .runner
            .run(&self.binary, &args, self.fetch_timeout)
            .await
            .inspect_err(|e| {
                tracing::error!(command = %command, error = %e, "torero invocation failed");
            })?;

        if !output.success() {
            let message = output.stderr.trim().to_string();
            tracing::error!(
                command = %command,
                exit_code = ?output.exit_code,
                stderr = %message,
                "torero command exited with error"
            );
            return Err(ToreroError::Execution {
                command,
                message,
                exit_code: output.exit_code,
            });
        }

        decode_records(&output.stdout)
    }

    /// Fetch every record of kind `T` and return the first named exactly `name`.
    ///
    /// `Ok(None)` when no record matches; fetch failures propagate unchanged.
    pub async fn get_resource_by_name<T: Resource>(&self, name: &str) -> crate::Result<Option<T>> {
        let records = self.get_resources::<T>().await?;
        Ok(records.into_iter().find(|record| record.name() == name))
    }

    pub async fn get_services(&self) -> crate::Result<Vec<Service>> {
        self.get_resources().await
    }

    pub async fn get_service_by_name(&self, name: &str) -> crate::Result<Option<Service>> {
        self.get_resource_by_name(name).await
    }

    pub async fn get_decorators(&self) -> crate::Result<Vec<Decorator>> {
        self.get_resources().await
    }

    pub async fn get_decorator_by_name(&self, name: &str) -> crate::Result<Option<Decorator>> {
        self.get_resource_by_name(name).await
    }

    pub async fn get_repositories(&self) -> crate::Result<Vec<Repository>> {
        self.get_resources().await
    }

    pub async fn get_repository_by_name(&self, name: &str) -> crate::Result<Option<Repository>> {
        self.get_resource_by_name(name).await
    }

    pub async fn get_secrets(&self) -> crate::Result<Vec<Secret>> {
        self.get_resources().await
    }

    pub async fn get_secret_by_name(&self, name: &str) -> crate::Result<Option<Secret>> {
        self.get_resource_by_name(name).await
    }
}

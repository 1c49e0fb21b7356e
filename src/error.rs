//! Error types for torero CLI translation.

use thiserror::Error;

use crate::models::ResourceKind;

/// Main error type for torero-api operations
#[derive(Error, Debug)]
pub enum ToreroError {
    /// torero exited non-zero, or could not be spawned at all
    #[error("torero error: {message}")]
    Execution {
        command: String,
        message: String,
        exit_code: Option<i32>,
    },

    /// torero did not finish within its allotted time
    #[error("torero command timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    /// stdout was not valid JSON
    #[error("Invalid JSON from torero: {0}")]
    Parse(String),

    /// JSON parsed, but a record failed its field contract
    #[error("invalid {kind} data from torero: {message}")]
    Validation { kind: ResourceKind, message: String },

    /// Configuration rejected by validation
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl ToreroError {
    /// Short machine-readable label, used as the `error` field in HTTP bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ToreroError::Execution { .. } => "execution_failed",
            ToreroError::Timeout { .. } => "timeout",
            ToreroError::Parse(_) => "parse_failed",
            ToreroError::Validation { .. } => "validation_failed",
            ToreroError::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Result type alias for torero-api operations
pub type Result<T> = std::result::Result<T, ToreroError>;

//! Health reporting for the API process.
//!
//! The API itself has no state to be unhealthy about; its health is whether
//! torero answers. The report is built from a single `ToreroExecutor::probe`.

use serde::Serialize;

use crate::cli::executor::ToreroStatus;

/// Two-state health model: torero either answers `torero version` or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthState,
    pub torero_available: bool,
    pub torero_version: String,
    pub message: String,
    pub api_version: &'static str,
}

impl HealthReport {
    pub fn from_status(status: ToreroStatus) -> Self {
        let state = if status.available {
            HealthState::Healthy
        } else {
            HealthState::Unhealthy
        };
        Self {
            status: state,
            torero_available: status.available,
            torero_version: status.version,
            message: status.message,
            api_version: env!("CARGO_PKG_VERSION"),
        }
    }
}

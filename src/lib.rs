//! torero-api — REST facade over the torero CLI.
//!
//! Shells out to `torero get <kind> --raw`, validates the JSON it prints into
//! typed records (services, decorators, repositories, secrets), and serves
//! them over HTTP. No state survives a request: every call is one bounded
//! subprocess invocation.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

pub use cli::executor::{
    decode_records, parse_version, Availability, ToreroExecutor, ToreroStatus, UNKNOWN_VERSION,
};
pub use cli::runner::{CommandOutput, CommandRunner, TokioCommandRunner};
pub use config::{ServerConfig, ToreroApiConfig, ToreroConfig};
pub use error::{Result, ToreroError};
pub use models::{Decorator, Repository, Resource, ResourceKind, Secret, Service};
pub use server::health::{HealthReport, HealthState};
pub use server::{router, ApiError, AppState};

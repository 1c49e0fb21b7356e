//! HTTP layer for torero-api.
//!
//! Exposes a list endpoint and a get-by-name endpoint per resource kind, plus
//! `/health`. Handlers are thin: they call the executor and serialize its
//! result. `ApiError` maps executor failures onto HTTP status codes.

pub mod health;
pub mod routes;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::cli::executor::ToreroExecutor;
use crate::error::ToreroError;
use crate::models::{Decorator, Repository, ResourceKind, Secret, Service};

/// State shared by every handler. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub executor: ToreroExecutor,
}

/// Failure of a single API request.
#[derive(Debug)]
pub enum ApiError {
    /// Name lookup completed without a match.
    NotFound { kind: ResourceKind, name: String },
    /// The query asked for something the resource kind cannot answer.
    BadRequest(String),
    /// torero could not be run or its output could not be translated.
    Torero(ToreroError),
}

impl From<ToreroError> for ApiError {
    fn from(err: ToreroError) -> Self {
        ApiError::Torero(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Torero(ToreroError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Torero(ToreroError::InvalidConfig(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Torero(
                ToreroError::Execution { .. }
                | ToreroError::Parse(_)
                | ToreroError::Validation { .. },
            ) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, detail) = match &self {
            ApiError::NotFound { kind, name } => {
                ("not_found", format!("{} '{}' not found", kind, name))
            }
            ApiError::BadRequest(detail) => ("bad_request", detail.clone()),
            ApiError::Torero(err) => (err.kind(), err.to_string()),
        };
        let body = Json(serde_json::json!({ "error": error, "detail": detail }));
        (status, body).into_response()
    }
}

/// Build the API router around `executor`.
pub fn router(executor: ToreroExecutor) -> Router {
    let state = AppState { executor };

    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/v1/services", get(routes::list_resources::<Service>))
        .route("/v1/service-types", get(routes::service_types))
        .route("/v1/services/:name", get(routes::get_resource::<Service>))
        .route("/v1/decorators", get(routes::list_resources::<Decorator>))
        .route("/v1/decorators/:name", get(routes::get_resource::<Decorator>))
        .route("/v1/repositories", get(routes::list_resources::<Repository>))
        .route(
            "/v1/repositories/:name",
            get(routes::get_resource::<Repository>),
        )
        .route("/v1/secrets", get(routes::list_resources::<Secret>))
        .route("/v1/secrets/:name", get(routes::get_resource::<Secret>))
        .with_state(state)
}

//! Request handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::{
    distinct_types, filter_by_tag, filter_by_type, Resource, ResourceKind, Service,
};
use crate::server::health::HealthReport;
use crate::server::{ApiError, AppState};

/// Optional `?type=` / `?tag=` filters on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub tag: Option<String>,
}

pub async fn index() -> Json<Value> {
    let endpoints: Vec<String> = ResourceKind::ALL
        .iter()
        .map(|kind| format!("/v1/{}", kind.plural()))
        .collect();
    Json(json!({
        "name": "torero-api",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::from_status(state.executor.probe().await))
}

pub async fn list_resources<T: Resource>(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<T>>, ApiError> {
    if query.tag.is_some() && !T::HAS_TAGS {
        return Err(ApiError::BadRequest(format!(
            "{} records have no tags; the tag filter is not supported",
            T::KIND
        )));
    }
    let mut records = state.executor.get_resources::<T>().await?;
    if let Some(resource_type) = &query.resource_type {
        records = filter_by_type(records, resource_type);
    }
    if let Some(tag) = &query.tag {
        records = filter_by_tag(records, tag);
    }
    Ok(Json(records))
}

pub async fn get_resource<T: Resource>(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<T>, ApiError> {
    match state.executor.get_resource_by_name::<T>(&name).await? {
        Some(record) => Ok(Json(record)),
        None => {
            tracing::debug!(kind = %T::KIND, name = %name, "resource not found");
            Err(ApiError::NotFound {
                kind: T::KIND,
                name,
            })
        }
    }
}

pub async fn service_types(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let services = state.executor.get_resources::<Service>().await?;
    Ok(Json(distinct_types(&services)))
}

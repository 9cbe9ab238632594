//! HTTP handlers for checking unsaved connector configurations.

use axum::{extract::State, Json};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::{CheckConnectionRead, DestinationCoreConfig, SourceCoreConfig};
use crate::router::ApiState;

/// Check a source configuration before it is saved.
#[utoipa::path(
    post,
    path = "/scheduler/sources/check_connection",
    tag = "Scheduler",
    request_body = SourceCoreConfig,
    responses(
        (status = 200, description = "Check result", body = CheckConnectionRead),
        (status = 404, description = "Source definition not found"),
        (status = 501, description = "Scheduler not configured")
    )
)]
pub async fn execute_source_check_connection(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<SourceCoreConfig>,
) -> Result<Json<CheckConnectionRead>> {
    let result = state
        .scheduler()?
        .check_source_connection_from_source_create(request)
        .await?;
    Ok(Json(result))
}

/// Check a destination configuration before it is saved.
#[utoipa::path(
    post,
    path = "/scheduler/destinations/check_connection",
    tag = "Scheduler",
    request_body = DestinationCoreConfig,
    responses(
        (status = 200, description = "Check result", body = CheckConnectionRead),
        (status = 404, description = "Destination definition not found"),
        (status = 501, description = "Scheduler not configured")
    )
)]
pub async fn execute_destination_check_connection(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationCoreConfig>,
) -> Result<Json<CheckConnectionRead>> {
    let result = state
        .scheduler()?
        .check_destination_connection_from_destination_create(request)
        .await?;
    Ok(Json(result))
}

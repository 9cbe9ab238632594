//! HTTP handlers for destinations.

use axum::{extract::State, http::StatusCode, Json};

use crate::error::Result;
use crate::extract::ApiJson;
use crate::models::{
    CheckConnectionRead, DestinationCloneRequestBody, DestinationCreate, DestinationIdRequestBody,
    DestinationRead, DestinationReadList, DestinationSearch, DestinationUpdate,
    WorkspaceIdRequestBody,
};
use crate::router::ApiState;

/// Create a destination.
#[utoipa::path(
    post,
    path = "/destinations/create",
    tag = "Destinations",
    request_body = DestinationCreate,
    responses(
        (status = 200, description = "Destination created", body = DestinationRead),
        (status = 400, description = "Invalid request or definition not usable"),
        (status = 404, description = "Workspace or definition not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_destination(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationCreate>,
) -> Result<Json<DestinationRead>> {
    let destination = state.destinations.create_destination(request).await?;
    Ok(Json(destination))
}

/// Get a destination.
#[utoipa::path(
    post,
    path = "/destinations/get",
    tag = "Destinations",
    request_body = DestinationIdRequestBody,
    responses(
        (status = 200, description = "Destination details", body = DestinationRead),
        (status = 404, description = "Destination not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_destination(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationIdRequestBody>,
) -> Result<Json<DestinationRead>> {
    let destination = state.destinations.get_destination(request).await?;
    Ok(Json(destination))
}

/// List the destinations of a workspace.
#[utoipa::path(
    post,
    path = "/destinations/list",
    tag = "Destinations",
    request_body = WorkspaceIdRequestBody,
    responses(
        (status = 200, description = "List of destinations", body = DestinationReadList),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_destinations_for_workspace(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<WorkspaceIdRequestBody>,
) -> Result<Json<DestinationReadList>> {
    let destinations = state
        .destinations
        .list_destinations_for_workspace(request)
        .await?;
    Ok(Json(destinations))
}

/// Search destinations by example.
#[utoipa::path(
    post,
    path = "/destinations/search",
    tag = "Destinations",
    request_body = DestinationSearch,
    responses(
        (status = 200, description = "Matching destinations", body = DestinationReadList),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn search_destinations(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationSearch>,
) -> Result<Json<DestinationReadList>> {
    let destinations = state.destinations.search_destinations(request).await?;
    Ok(Json(destinations))
}

/// Update a destination.
#[utoipa::path(
    post,
    path = "/destinations/update",
    tag = "Destinations",
    request_body = DestinationUpdate,
    responses(
        (status = 200, description = "Destination updated", body = DestinationRead),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Destination not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_destination(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationUpdate>,
) -> Result<Json<DestinationRead>> {
    let destination = state.destinations.update_destination(request).await?;
    Ok(Json(destination))
}

/// Clone a destination.
#[utoipa::path(
    post,
    path = "/destinations/clone",
    tag = "Destinations",
    request_body = DestinationCloneRequestBody,
    responses(
        (status = 200, description = "Destination cloned", body = DestinationRead),
        (status = 404, description = "Destination not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn clone_destination(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationCloneRequestBody>,
) -> Result<Json<DestinationRead>> {
    let destination = state.destinations.clone_destination(request).await?;
    Ok(Json(destination))
}

/// Delete a destination and deprecate its connections.
#[utoipa::path(
    post,
    path = "/destinations/delete",
    tag = "Destinations",
    request_body = DestinationIdRequestBody,
    responses(
        (status = 204, description = "Destination deleted"),
        (status = 404, description = "Destination not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_destination(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationIdRequestBody>,
) -> Result<StatusCode> {
    state.destinations.delete_destination(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a destination to its definition's default version.
#[utoipa::path(
    post,
    path = "/destinations/upgrade_version",
    tag = "Destinations",
    request_body = DestinationIdRequestBody,
    responses(
        (status = 204, description = "Destination upgraded"),
        (status = 404, description = "Destination not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn upgrade_destination_version(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationIdRequestBody>,
) -> Result<StatusCode> {
    state.destinations.upgrade_destination_version(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Check the stored configuration of a destination.
#[utoipa::path(
    post,
    path = "/destinations/check_connection",
    tag = "Destinations",
    request_body = DestinationIdRequestBody,
    responses(
        (status = 200, description = "Check result", body = CheckConnectionRead),
        (status = 404, description = "Destination not found"),
        (status = 501, description = "Scheduler not configured")
    )
)]
pub async fn check_connection_to_destination(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationIdRequestBody>,
) -> Result<Json<CheckConnectionRead>> {
    let result = state
        .scheduler()?
        .check_destination_connection_from_destination_id(request)
        .await?;
    Ok(Json(result))
}

/// Check a destination with a pending update applied.
#[utoipa::path(
    post,
    path = "/destinations/check_connection_for_update",
    tag = "Destinations",
    request_body = DestinationUpdate,
    responses(
        (status = 200, description = "Check result", body = CheckConnectionRead),
        (status = 404, description = "Destination not found"),
        (status = 501, description = "Scheduler not configured")
    )
)]
pub async fn check_connection_to_destination_for_update(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<DestinationUpdate>,
) -> Result<Json<CheckConnectionRead>> {
    let result = state
        .scheduler()?
        .check_destination_connection_for_update(request)
        .await?;
    Ok(Json(result))
}
